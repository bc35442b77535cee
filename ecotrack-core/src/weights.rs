//! Weight tables: categorical answer → kg CO₂e contribution.
//!
//! Two tables exist, one per survey scope. They are `static` data; there is
//! no way to mutate them at runtime. Callers that need a different table
//! (tests, what-if tooling) build their own `WeightTable` and pass it to the
//! `*_with` scoring functions.
//!
//! Units: monthly weights are kg CO₂e per month, weekly weights are kg CO₂e
//! per week.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::answers::AnswerSet;
use crate::error::ScoringError;

/// Version of the canonical weight tables below. Bump on any weight change.
pub const WEIGHTS_VERSION: &str = "2024.2";

/// Which survey an answer set (and its table) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    /// Onboarding / baseline survey.
    #[serde(rename = "monthly")]
    Monthly,
    /// Recurring weekly checkup.
    #[serde(rename = "weekly")]
    Weekly,
}

impl Scope {
    pub fn table(&self) -> &'static WeightTable {
        match self {
            Scope::Monthly => &MONTHLY_WEIGHTS,
            Scope::Weekly => &WEEKLY_WEIGHTS,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Monthly => f.write_str("monthly"),
            Scope::Weekly => f.write_str("weekly"),
        }
    }
}

/// Question keys and the option codes the scorer branches on.
pub mod keys {
    // Monthly (baseline) survey
    pub const HOME_TYPE: &str = "home_type";
    pub const PRIMARY_HEATING: &str = "primary_heating";
    pub const APPLIANCE_USE: &str = "appliance_use";
    pub const LIGHTING_TYPE: &str = "lighting_type";
    pub const AIR_CONDITIONING: &str = "air_conditioning";
    pub const CAR_TYPE: &str = "car_type";
    pub const DEVICE_TIME: &str = "device_time";
    pub const RENEWABLE_PCT: &str = "renewable_pct";
    pub const FLIGHTS_PER_YEAR: &str = "flights_per_year";
    pub const PUBLIC_TRANSPORT: &str = "public_transport";
    pub const COMPOST_WASTE: &str = "compost_waste";
    pub const CLOTHES_DRYING: &str = "clothes_drying";
    pub const BUY_SECONDHAND: &str = "buy_secondhand";

    // Weekly checkup
    pub const HEATING_USAGE: &str = "heating_usage";
    pub const APPLIANCE_USAGE: &str = "appliance_usage";
    pub const DAILY_TRANSPORT: &str = "daily_transport";
    pub const WEEKLY_TRAVEL: &str = "weekly_travel";
    pub const VEHICLE_TYPE: &str = "vehicle_type";
    pub const ENERGY_SOURCE: &str = "energy_source";
    pub const WATER_USAGE: &str = "water_usage";
    pub const WASTE_GENERATION: &str = "waste_generation";
    pub const WEEKLY_CONSUMPTION: &str = "weekly_consumption";

    // Option codes with scoring side effects
    pub const HEATING_ELECTRIC: &str = "ELEC";
    pub const VEHICLE_ELECTRIC: &str = "ELECTRIC";
    pub const ENERGY_FULL_GREEN: &str = "FULL_GREEN";
    pub const ENERGY_PARTIAL: &str = "PARTIAL";
    pub const ENERGY_GREEN_PLAN: &str = "GREEN_OPT";
    pub const ENERGY_STANDARD: &str = "STANDARD";
}

/// One question and its option weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Question {
    pub key: &'static str,
    pub options: &'static [(&'static str, f64)],
}

impl Question {
    pub fn weight(&self, option_code: &str) -> Option<f64> {
        self.options
            .iter()
            .find(|(code, _)| *code == option_code)
            .map(|(_, w)| *w)
    }

    pub fn option_codes(&self) -> impl Iterator<Item = &'static str> {
        self.options.iter().map(|(code, _)| *code)
    }
}

/// An immutable question → option → weight table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeightTable {
    pub scope: Scope,
    pub version: &'static str,
    questions: &'static [Question],
}

impl WeightTable {
    pub const fn new(scope: Scope, version: &'static str, questions: &'static [Question]) -> Self {
        Self {
            scope,
            version,
            questions,
        }
    }

    pub fn monthly() -> &'static WeightTable {
        &MONTHLY_WEIGHTS
    }

    pub fn weekly() -> &'static WeightTable {
        &WEEKLY_WEIGHTS
    }

    pub fn questions(&self) -> &'static [Question] {
        self.questions
    }

    pub fn question(&self, question_key: &str) -> Option<&'static Question> {
        self.questions.iter().find(|q| q.key == question_key)
    }

    pub fn question_keys(&self) -> impl Iterator<Item = &'static str> {
        self.questions.iter().map(|q| q.key)
    }

    /// Weight of `option_code` for `question_key`.
    ///
    /// Never defaults: an option (or question) the table does not list is an
    /// `UnknownOption` error.
    pub fn weight(&self, question_key: &str, option_code: &str) -> Result<f64, ScoringError> {
        self.question(question_key)
            .and_then(|q| q.weight(option_code))
            .ok_or_else(|| ScoringError::unknown_option(question_key, option_code))
    }

    /// Weight of the option `answers` picked for `question_key`.
    pub fn answer_weight(&self, answers: &AnswerSet, question_key: &str) -> Result<f64, ScoringError> {
        let option = answers.get(question_key).unwrap_or("");
        self.weight(question_key, option)
    }

    /// Check that every question in this table is answered with a known option.
    pub fn validate(&self, answers: &AnswerSet) -> Result<(), ScoringError> {
        for key in self.question_keys() {
            self.answer_weight(answers, key)?;
        }
        Ok(())
    }
}

/// `weight(scope, question_key, option_code)` against the canonical tables.
pub fn weight(scope: Scope, question_key: &str, option_code: &str) -> Result<f64, ScoringError> {
    scope.table().weight(question_key, option_code)
}

/// Baseline survey weights (kg CO₂e per month).
pub static MONTHLY_WEIGHTS: WeightTable = WeightTable::new(
    Scope::Monthly,
    WEIGHTS_VERSION,
    &[
        Question {
            key: keys::HOME_TYPE,
            options: &[("APT", 100.0), ("SMALL", 150.0), ("LARGE", 200.0)],
        },
        Question {
            key: keys::PRIMARY_HEATING,
            options: &[("ELEC", 150.0), ("GAS", 250.0), ("OIL", 350.0), ("NONE", 0.0)],
        },
        Question {
            key: keys::APPLIANCE_USE,
            options: &[("DAILY", 50.0), ("WEEKLY", 20.0), ("OCCAS", 10.0), ("NEVER", 0.0)],
        },
        Question {
            key: keys::LIGHTING_TYPE,
            options: &[("LED", 5.0), ("CFL", 15.0), ("INC", 40.0), ("MIX", 25.0)],
        },
        Question {
            key: keys::AIR_CONDITIONING,
            options: &[("YES", 80.0), ("NO", 0.0)],
        },
        Question {
            key: keys::CAR_TYPE,
            options: &[
                ("NONE", 0.0),
                ("PETROL", 300.0),
                ("DIESEL", 320.0),
                ("HYBRID", 150.0),
                ("ELEC", 60.0),
            ],
        },
        Question {
            key: keys::DEVICE_TIME,
            options: &[("LT2", 10.0), ("2-4", 20.0), ("4-8", 40.0), ("GT8", 60.0)],
        },
        // Carries no weight of its own; the chosen share drives the renewable discount.
        Question {
            key: keys::RENEWABLE_PCT,
            options: &[("0", 0.0), ("25", 0.0), ("50", 0.0), ("75", 0.0), ("100", 0.0)],
        },
        Question {
            key: keys::FLIGHTS_PER_YEAR,
            options: &[
                ("NONE", 0.0),
                ("1SHORT", 100.0),
                ("2-4SHORT", 200.0),
                ("1LONG", 600.0),
                ("MULTLONG", 1200.0),
            ],
        },
        Question {
            key: keys::PUBLIC_TRANSPORT,
            options: &[("NEVER", 0.0), ("OCCAS", -20.0), ("WEEKLY", -50.0), ("DAILY", -80.0)],
        },
        Question {
            key: keys::COMPOST_WASTE,
            options: &[("YES", -10.0), ("NO", 0.0)],
        },
        Question {
            key: keys::CLOTHES_DRYING,
            options: &[("LINE", -15.0), ("MIXED", -5.0), ("DRYER", 0.0)],
        },
        Question {
            key: keys::BUY_SECONDHAND,
            options: &[("OFTEN", -20.0), ("SOME", -10.0), ("RARELY", -5.0), ("NEVER", 0.0)],
        },
    ],
);

/// Weekly checkup weights (kg CO₂e per week).
pub static WEEKLY_WEIGHTS: WeightTable = WeightTable::new(
    Scope::Weekly,
    WEIGHTS_VERSION,
    &[
        Question {
            key: keys::HEATING_USAGE,
            options: &[("OFF", 0.0), ("ECO", 10.0), ("SOME", 25.0), ("MOST", 45.0)],
        },
        Question {
            key: keys::APPLIANCE_USAGE,
            options: &[("OPT", 5.0), ("REG", 12.0), ("FREQ", 20.0), ("HEAVY", 30.0)],
        },
        Question {
            key: keys::DAILY_TRANSPORT,
            options: &[("ACTIVE", 0.0), ("PUBLIC", 10.0), ("MIXED", 35.0), ("CAR", 60.0)],
        },
        Question {
            key: keys::WEEKLY_TRAVEL,
            options: &[("LOCAL", 0.0), ("REGION", 20.0), ("LONG", 50.0), ("FLIGHT", 150.0)],
        },
        Question {
            key: keys::VEHICLE_TYPE,
            options: &[
                ("NONE", 0.0),
                ("ELECTRIC", 5.0),
                ("HYBRID", 15.0),
                ("STANDARD", 30.0),
                ("LARGE", 45.0),
            ],
        },
        Question {
            key: keys::ENERGY_SOURCE,
            options: &[("FULL_GREEN", 0.0), ("PARTIAL", 8.0), ("GREEN_OPT", 12.0), ("STANDARD", 20.0)],
        },
        Question {
            key: keys::WATER_USAGE,
            options: &[("MINIMAL", 2.0), ("MODERATE", 5.0), ("TYPICAL", 8.0), ("HIGH", 12.0)],
        },
        Question {
            key: keys::WASTE_GENERATION,
            options: &[("MINIMAL", -5.0), ("LOW", 0.0), ("MEDIUM", 5.0), ("HIGH", 10.0)],
        },
        Question {
            key: keys::WEEKLY_CONSUMPTION,
            options: &[("NONE", -5.0), ("ESSENTIAL", 0.0), ("MODERATE", 10.0), ("HIGH", 30.0)],
        },
    ],
);
