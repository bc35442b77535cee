use anyhow::{bail, Result};
use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use ecotrack_core::AnswerSet;
use serde::{Deserialize, Serialize};
use std::fmt;

/// When a checkup was submitted: a full timestamp, or just a calendar date
/// (hand-written history files).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubmittedAt {
    At(DateTime<Utc>),
    On(NaiveDate),
}

impl SubmittedAt {
    /// Accepts RFC 3339 (`2026-03-01T18:30:00Z`) or `YYYY-MM-DD`.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(SubmittedAt::At(dt.with_timezone(&Utc)));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Ok(SubmittedAt::On(d));
        }
        bail!("invalid submission time '{s}' (expected RFC 3339 or YYYY-MM-DD)")
    }

    /// Calendar date of the submission in the household's timezone.
    pub fn local_date(&self, tz: Tz) -> NaiveDate {
        match self {
            SubmittedAt::At(dt) => dt.with_timezone(&tz).date_naive(),
            SubmittedAt::On(d) => *d,
        }
    }

    /// Replay order: local date, then instant. A bare date sorts at the
    /// start of its day, ahead of any timestamped checkup on that date.
    pub fn order_key(&self, tz: Tz) -> (NaiveDate, Option<DateTime<Utc>>) {
        match self {
            SubmittedAt::At(dt) => (self.local_date(tz), Some(*dt)),
            SubmittedAt::On(d) => (*d, None),
        }
    }
}

impl fmt::Display for SubmittedAt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmittedAt::At(dt) => write!(f, "{}", dt.to_rfc3339()),
            SubmittedAt::On(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// One weekly checkup as read from the history file, not yet scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckupSubmission {
    pub submitted_at: SubmittedAt,
    pub answers: AnswerSet,
}
