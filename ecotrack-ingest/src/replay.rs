//! Replay a checkup history through the weekly scorer.
//!
//! Checkups are ordered by local submission date, then submission instant,
//! and scored oldest first, each one compared with the adjusted total of
//! the checkup before it.

use anyhow::{anyhow, Context, Result};
use chrono_tz::Tz;
use ecotrack_core::{score_weekly, ScoreResult, WeeklyRecord};
use tracing::{debug, info};

use crate::types::CheckupSubmission;

/// Parse an IANA timezone name such as "America/Chicago".
pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| anyhow!("invalid timezone: {name}"))
}

/// Checkups in replay order. Stable: true ties keep file order.
fn ordered(checkups: &[CheckupSubmission], tz: Tz) -> Vec<&CheckupSubmission> {
    let mut out: Vec<_> = checkups.iter().collect();
    out.sort_by_key(|c| c.submitted_at.order_key(tz));
    out
}

/// Score every checkup, oldest first.
///
/// Fails on the first checkup the scorer rejects; the scoring error is kept
/// as the root cause.
pub fn replay_checkups(
    checkups: &[CheckupSubmission],
    household_size: i64,
    tz: Tz,
) -> Result<Vec<WeeklyRecord>> {
    let mut previous = None;
    let mut records = Vec::with_capacity(checkups.len());
    for checkup in ordered(checkups, tz) {
        let date = checkup.submitted_at.local_date(tz);
        let result = score_weekly(&checkup.answers, previous, household_size)
            .with_context(|| format!("scoring checkup of {}", checkup.submitted_at))?;
        debug!(%date, adjusted_total = result.adjusted_total, "replayed checkup");
        previous = Some(result.adjusted_total);
        records.push(WeeklyRecord::new(date, result));
    }

    info!(count = records.len(), "replayed checkup history");
    Ok(records)
}

/// Score a new checkup against the history it will join.
///
/// The previous total is the last history checkup at or before the new
/// one in replay order, so a back-dated checkup compares with the week it
/// actually follows.
pub fn score_checkup(
    history: &[CheckupSubmission],
    checkup: &CheckupSubmission,
    household_size: i64,
    tz: Tz,
) -> Result<ScoreResult> {
    let records = replay_checkups(history, household_size, tz)?;
    let key = checkup.submitted_at.order_key(tz);
    let previous = ordered(history, tz)
        .into_iter()
        .zip(&records)
        .take_while(|(c, _)| c.submitted_at.order_key(tz) <= key)
        .last()
        .map(|(_, r)| r.result.adjusted_total);

    let result = score_weekly(&checkup.answers, previous, household_size)
        .with_context(|| format!("scoring checkup of {}", checkup.submitted_at))?;
    Ok(result)
}
