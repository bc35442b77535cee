//! Goal progress: how much of the reduction from baseline to target the
//! current estimate has achieved.
//!
//! Progress is always derived from the three figures on read; nothing here
//! is meant to be stored.

use serde::{Deserialize, Serialize};

use crate::score::ScoreResult;

/// Where the current estimate sits relative to baseline and target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProgressState {
    /// No baseline, a non-positive target, or a target that is not below
    /// the baseline.
    #[serde(rename = "invalid_goal")]
    InvalidGoal,
    /// Current estimate at or above the baseline.
    #[serde(rename = "no_improvement")]
    NoImprovement,
    /// Current estimate at or below the target.
    #[serde(rename = "goal_met")]
    GoalMet,
    /// Between target and baseline; carries the percentage.
    #[serde(rename = "in_progress")]
    InProgress(f64),
}

impl ProgressState {
    pub fn percent(&self) -> f64 {
        match self {
            ProgressState::InvalidGoal | ProgressState::NoImprovement => 0.0,
            ProgressState::GoalMet => 100.0,
            ProgressState::InProgress(pct) => *pct,
        }
    }
}

/// Classify `current` against `baseline` and `target`.
pub fn progress_state(baseline: Option<f64>, target: f64, current: f64) -> ProgressState {
    let Some(baseline) = baseline else {
        return ProgressState::InvalidGoal;
    };
    if !(baseline.is_finite() && target.is_finite() && current.is_finite()) {
        return ProgressState::InvalidGoal;
    }
    if target <= 0.0 || target >= baseline {
        return ProgressState::InvalidGoal;
    }

    if current >= baseline {
        ProgressState::NoImprovement
    } else if current <= target {
        ProgressState::GoalMet
    } else {
        let pct = (baseline - current) / (baseline - target) * 100.0;
        ProgressState::InProgress(pct.clamp(0.0, 100.0))
    }
}

/// Goal progress in percent, always within `[0, 100]`.
pub fn goal_progress(baseline: Option<f64>, target: f64, current: f64) -> f64 {
    progress_state(baseline, target, current).percent()
}

/// A monthly reduction goal with the figures progress is measured from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    /// kg CO₂e per month
    pub target_amount: f64,
    /// Adjusted total of the baseline survey
    pub baseline: Option<f64>,
    /// Most recent monthly estimate
    pub current_amount: f64,
}

impl Goal {
    pub fn new(target_amount: f64, baseline: Option<f64>, current_amount: f64) -> Self {
        Self {
            target_amount,
            baseline,
            current_amount,
        }
    }

    /// Build a goal from stored scores.
    ///
    /// Without a weekly checkup yet, the current amount is the baseline
    /// itself, so progress starts at zero.
    pub fn from_scores(
        target_amount: f64,
        baseline: Option<&ScoreResult>,
        latest_weekly: Option<&ScoreResult>,
    ) -> Self {
        let baseline = baseline.map(ScoreResult::monthly_footprint);
        let current_amount = latest_weekly
            .map(ScoreResult::monthly_footprint)
            .or(baseline)
            .unwrap_or(0.0);
        Self::new(target_amount, baseline, current_amount)
    }

    pub fn state(&self) -> ProgressState {
        progress_state(self.baseline, self.target_amount, self.current_amount)
    }

    pub fn progress(&self) -> f64 {
        self.state().percent()
    }

    /// Reduction still needed to reach the target, never negative.
    pub fn remaining_reduction(&self) -> f64 {
        (self.current_amount - self.target_amount).max(0.0)
    }
}
