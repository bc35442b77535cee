//! ecotrack-ingest: answer files, checkup history CSV, and history replay through the scorer.

pub mod answers_json;
pub mod checkup_csv;
pub mod replay;
pub mod types;

pub use answers_json::{load_answers, parse_answers};
pub use checkup_csv::{append_checkup, parse_checkups_csv, read_checkups};
pub use replay::{parse_timezone, replay_checkups, score_checkup};
pub use types::{CheckupSubmission, SubmittedAt};
