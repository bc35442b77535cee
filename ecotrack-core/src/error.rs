//! Scoring failures. Both kinds are validation failures on the caller's input.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScoringError {
    /// The answer set picked an option the weight table does not know about.
    /// A question that was not answered at all carries an empty option code.
    #[error("unknown option '{option_code}' for question '{question_key}'")]
    UnknownOption {
        question_key: String,
        option_code: String,
    },
    #[error("invalid household size: {0} (must be at least 1)")]
    InvalidHousehold(i64),
}

impl ScoringError {
    pub fn unknown_option(question_key: impl Into<String>, option_code: impl Into<String>) -> Self {
        Self::UnknownOption {
            question_key: question_key.into(),
            option_code: option_code.into(),
        }
    }
}

/// Divisor for per-person figures.
pub(crate) fn household_divisor(household_size: i64) -> Result<f64, ScoringError> {
    if household_size < 1 {
        return Err(ScoringError::InvalidHousehold(household_size));
    }
    Ok(household_size as f64)
}
