//! ecotrack-core: carbon scoring and goal progress engine

pub mod answers;
pub mod error;
pub mod progress;
pub mod score;
pub mod scoring;
pub mod trend;
pub mod weights;

pub use answers::{AnswerSet, OptionCode};
pub use error::ScoringError;
pub use progress::{goal_progress, progress_state, Goal, ProgressState};
pub use score::ScoreResult;
pub use scoring::{
    score_baseline, score_baseline_with, score_weekly, score_weekly_series, score_weekly_with,
    WEEKS_PER_MONTH,
};
pub use trend::{
    checkup_history, checkup_reminder, monthly_trend, monthly_trend_limited, percent_change, recent_series,
    CheckupReminder, HistoryRow, TrendPoint, WeeklyRecord, WeeklySeries, CHECKUP_INTERVAL_DAYS,
    TREND_MONTHS,
};
pub use weights::{
    keys, weight, Question, Scope, WeightTable, MONTHLY_WEIGHTS, WEEKLY_WEIGHTS, WEIGHTS_VERSION,
};
