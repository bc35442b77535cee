//! Weekly checkup history as CSV.
//!
//! Header row required. `submitted_at` plus one column per weekly question,
//! in any order; unknown columns are ignored:
//!
//! submitted_at,heating_usage,appliance_usage,daily_transport,weekly_travel,
//! vehicle_type,energy_source,water_usage,waste_generation,weekly_consumption

use anyhow::{bail, Context, Result};
use ecotrack_core::{AnswerSet, WEEKLY_WEIGHTS};
use std::fs::OpenOptions;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{info, warn};

use crate::types::{CheckupSubmission, SubmittedAt};

pub const SUBMITTED_AT: &str = "submitted_at";

/// Parse a checkup CSV file, in file order.
pub fn parse_checkups_csv(path: impl AsRef<Path>) -> Result<Vec<CheckupSubmission>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let checkups = read_checkups(file).with_context(|| format!("parsing {}", path.display()))?;
    info!(count = checkups.len(), path = %path.display(), "parsed checkup history");
    Ok(checkups)
}

pub fn read_checkups<R: Read>(reader: R) -> Result<Vec<CheckupSubmission>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let Some(time_col) = headers.iter().position(|h| h == SUBMITTED_AT) else {
        bail!("missing '{SUBMITTED_AT}' column");
    };
    let answer_cols: Vec<(usize, &str)> = WEEKLY_WEIGHTS
        .question_keys()
        .filter_map(|key| headers.iter().position(|h| h == key).map(|i| (i, key)))
        .collect();
    let unknown: Vec<&str> = headers
        .iter()
        .filter(|h| *h != SUBMITTED_AT && WEEKLY_WEIGHTS.question(h).is_none())
        .collect();
    if !unknown.is_empty() {
        warn!(columns = ?unknown, "ignoring unknown checkup columns");
    }

    let mut out = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        // Line 1 is the header
        let line = i + 2;

        let time = record.get(time_col).unwrap_or("");
        if time.is_empty() && record.iter().all(str::is_empty) {
            continue;
        }
        let submitted_at = SubmittedAt::parse(time).with_context(|| format!("line {line}"))?;

        let mut answers = AnswerSet::new();
        for (col, key) in &answer_cols {
            if let Some(code) = record.get(*col).filter(|c| !c.is_empty()) {
                answers.insert(*key, code);
            }
        }

        out.push(CheckupSubmission {
            submitted_at,
            answers,
        });
    }

    Ok(out)
}

/// Columns of an existing history file, or `None` when the file is new or empty.
fn existing_header(path: &Path) -> Result<Option<csv::StringRecord>> {
    if !path.exists() || std::fs::metadata(path)?.len() == 0 {
        return Ok(None);
    }
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;
    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?
        .clone();
    Ok(Some(headers))
}

fn ends_with_newline(path: &Path) -> Result<bool> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(bytes.last().is_none_or(|b| *b == b'\n'))
}

/// Append one checkup to a history file.
///
/// A new file gets the canonical header. An existing file keeps its own
/// column order; it must carry `submitted_at` and every weekly question.
pub fn append_checkup(path: impl AsRef<Path>, checkup: &CheckupSubmission) -> Result<()> {
    let path = path.as_ref();

    let header = existing_header(path)?;
    let columns: Vec<String> = match &header {
        Some(h) => {
            let missing: Vec<&str> = std::iter::once(SUBMITTED_AT)
                .chain(WEEKLY_WEIGHTS.question_keys())
                .filter(|key| !h.iter().any(|col| col == *key))
                .collect();
            if !missing.is_empty() {
                bail!(
                    "{} is missing column(s): {}",
                    path.display(),
                    missing.join(", ")
                );
            }
            h.iter().map(str::to_string).collect()
        }
        None => std::iter::once(SUBMITTED_AT)
            .chain(WEEKLY_WEIGHTS.question_keys())
            .map(str::to_string)
            .collect(),
    };
    let needs_newline = header.is_some() && !ends_with_newline(path)?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {}", path.display()))?;
    if needs_newline {
        file.write_all(b"\n")?;
    }
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(file);

    if header.is_none() {
        wtr.write_record(&columns)?;
    }

    let row: Vec<String> = columns
        .iter()
        .map(|col| {
            if col == SUBMITTED_AT {
                checkup.submitted_at.to_string()
            } else {
                checkup.answers.get(col).unwrap_or("").to_string()
            }
        })
        .collect();
    wtr.write_record(&row)?;
    wtr.flush().with_context(|| format!("write {}", path.display()))?;
    Ok(())
}
