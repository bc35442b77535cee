//! Answer files: a flat JSON object of question-key → option code.
//!
//! ```json
//! { "home_type": "APT", "primary_heating": "ELEC", "renewable_pct": 50 }
//! ```

use anyhow::{Context, Result};
use ecotrack_core::AnswerSet;
use std::fs;
use std::path::Path;

pub fn parse_answers(json: &str) -> Result<AnswerSet> {
    serde_json::from_str(json).context("answers must be a JSON object of question -> option")
}

pub fn load_answers(path: impl AsRef<Path>) -> Result<AnswerSet> {
    let path = path.as_ref();
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_answers(&s).with_context(|| format!("parsing {}", path.display()))
}
