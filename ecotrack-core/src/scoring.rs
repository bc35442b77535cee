//! Scoring engine: folds an answer set through a weight table.
//!
//! Baseline (monthly) survey:
//! - raw total = every monthly weight
//! - renewable discount = home-electric subtotal × renewable share
//! - adjusted total = raw total − renewable discount
//!
//! Weekly checkup:
//! - raw total = every weekly weight
//! - green energy cuts the whole total (×0.8 full, ×0.9 partial)
//! - an electric vehicle then removes 15% of the transport weights
//! - the renewable discount is reported but already folded into the total

use tracing::debug;

use crate::answers::AnswerSet;
use crate::error::{household_divisor, ScoringError};
use crate::score::ScoreResult;
use crate::trend::percent_change;
use crate::weights::{keys, Scope, WeightTable, MONTHLY_WEIGHTS, WEEKLY_WEIGHTS};

/// Weekly totals are scaled to a month by this factor.
pub const WEEKS_PER_MONTH: f64 = 4.0;

/// Share of the electric vehicle's transport weights removed from the weekly total.
pub const ELECTRIC_VEHICLE_TRANSPORT_CUT: f64 = 0.15;

/// Home-electric categories of the baseline survey. Primary heating joins
/// them only when it is electric.
const MONTHLY_ELECTRIC_KEYS: [&str; 4] = [
    keys::APPLIANCE_USE,
    keys::LIGHTING_TYPE,
    keys::AIR_CONDITIONING,
    keys::DEVICE_TIME,
];

const WEEKLY_ELECTRIC_KEYS: [&str; 4] = [
    keys::HEATING_USAGE,
    keys::APPLIANCE_USAGE,
    keys::ENERGY_SOURCE,
    keys::WATER_USAGE,
];

/// Multiplier applied to the weekly total for the chosen energy source.
fn energy_multiplier(energy_source: &str) -> f64 {
    match energy_source {
        keys::ENERGY_FULL_GREEN => 0.8,
        keys::ENERGY_PARTIAL => 0.9,
        _ => 1.0,
    }
}

/// Share of the weekly electric subtotal reported as renewable discount.
fn weekly_renewable_share(energy_source: &str) -> f64 {
    match energy_source {
        keys::ENERGY_FULL_GREEN => 0.8,
        keys::ENERGY_PARTIAL => 0.4,
        keys::ENERGY_GREEN_PLAN => 0.2,
        _ => 0.0,
    }
}

fn sum_weights<'a>(
    table: &WeightTable,
    answers: &AnswerSet,
    question_keys: impl IntoIterator<Item = &'a str>,
) -> Result<f64, ScoringError> {
    let mut total = 0.0;
    for key in question_keys {
        total += table.answer_weight(answers, key)?;
    }
    Ok(total)
}

/// Score the onboarding survey against the canonical monthly table.
pub fn score_baseline(answers: &AnswerSet, household_size: i64) -> Result<ScoreResult, ScoringError> {
    score_baseline_with(&MONTHLY_WEIGHTS, answers, household_size)
}

pub fn score_baseline_with(
    table: &WeightTable,
    answers: &AnswerSet,
    household_size: i64,
) -> Result<ScoreResult, ScoringError> {
    table.validate(answers)?;

    let raw_total = sum_weights(table, answers, table.question_keys())?;

    let mut electric_subtotal = sum_weights(table, answers, MONTHLY_ELECTRIC_KEYS)?;
    if answers.get(keys::PRIMARY_HEATING) == Some(keys::HEATING_ELECTRIC) {
        electric_subtotal += table.answer_weight(answers, keys::PRIMARY_HEATING)?;
    }

    let renewable_pct = renewable_pct(answers)?;
    let renewable_discount = electric_subtotal * (renewable_pct / 100.0);
    let adjusted_total = raw_total - renewable_discount;
    let per_person = adjusted_total / household_divisor(household_size)?;

    debug!(
        raw_total,
        electric_subtotal,
        renewable_discount,
        adjusted_total,
        "scored baseline survey"
    );

    Ok(ScoreResult {
        scope: Scope::Monthly,
        weights_version: table.version.to_string(),
        raw_total,
        electric_subtotal,
        renewable_discount,
        adjusted_total,
        per_person: Some(per_person),
        percent_change_from_previous: None,
        monthly_estimate: None,
        monthly_estimate_per_person: None,
    })
}

/// Renewable electricity share in percent. The code was already checked
/// against the table, so only a non-numeric custom code can fail here.
fn renewable_pct(answers: &AnswerSet) -> Result<f64, ScoringError> {
    let code = answers.get(keys::RENEWABLE_PCT).unwrap_or("");
    code.parse::<f64>()
        .map_err(|_| ScoringError::unknown_option(keys::RENEWABLE_PCT, code))
}

/// Score a weekly checkup against the canonical weekly table.
///
/// `previous_adjusted_total` is the adjusted total of the week before, if any.
pub fn score_weekly(
    answers: &AnswerSet,
    previous_adjusted_total: Option<f64>,
    household_size: i64,
) -> Result<ScoreResult, ScoringError> {
    score_weekly_with(&WEEKLY_WEIGHTS, answers, previous_adjusted_total, household_size)
}

pub fn score_weekly_with(
    table: &WeightTable,
    answers: &AnswerSet,
    previous_adjusted_total: Option<f64>,
    household_size: i64,
) -> Result<ScoreResult, ScoringError> {
    table.validate(answers)?;

    let raw_total = sum_weights(table, answers, table.question_keys())?;
    let energy_source = answers.get(keys::ENERGY_SOURCE).unwrap_or("");

    // Energy multiplier first, then the electric-vehicle transport cut.
    let mut adjusted_total = raw_total * energy_multiplier(energy_source);
    if answers.get(keys::VEHICLE_TYPE) == Some(keys::VEHICLE_ELECTRIC) {
        let transport = sum_weights(table, answers, [keys::DAILY_TRANSPORT, keys::WEEKLY_TRAVEL])?;
        adjusted_total -= transport * ELECTRIC_VEHICLE_TRANSPORT_CUT;
    }

    let electric_subtotal = sum_weights(table, answers, WEEKLY_ELECTRIC_KEYS)?;
    let renewable_discount = electric_subtotal * weekly_renewable_share(energy_source);

    let divisor = household_divisor(household_size)?;
    let monthly_estimate = adjusted_total * WEEKS_PER_MONTH;
    let percent_change_from_previous = percent_change(adjusted_total, previous_adjusted_total);

    debug!(
        raw_total,
        adjusted_total,
        monthly_estimate,
        ?percent_change_from_previous,
        "scored weekly checkup"
    );

    Ok(ScoreResult {
        scope: Scope::Weekly,
        weights_version: table.version.to_string(),
        raw_total,
        electric_subtotal,
        renewable_discount,
        adjusted_total,
        per_person: None,
        percent_change_from_previous,
        monthly_estimate: Some(monthly_estimate),
        monthly_estimate_per_person: Some(monthly_estimate / divisor),
    })
}

/// Score consecutive weekly checkups, oldest first, chaining each week's
/// adjusted total into the next week's percentage change.
pub fn score_weekly_series(
    answer_sets: &[AnswerSet],
    household_size: i64,
) -> Result<Vec<ScoreResult>, ScoringError> {
    let mut previous = None;
    let mut out = Vec::with_capacity(answer_sets.len());
    for answers in answer_sets {
        let result = score_weekly(answers, previous, household_size)?;
        previous = Some(result.adjusted_total);
        out.push(result);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    fn gas_household() -> AnswerSet {
        AnswerSet::new()
            .with("home_type", "SMALL")
            .with("primary_heating", "GAS")
            .with("appliance_use", "DAILY")
            .with("lighting_type", "LED")
            .with("air_conditioning", "NO")
            .with("car_type", "PETROL")
            .with("device_time", "4-8")
            .with("renewable_pct", 0u32)
            .with("flights_per_year", "NONE")
            .with("public_transport", "NEVER")
            .with("compost_waste", "NO")
            .with("clothes_drying", "DRYER")
            .with("buy_secondhand", "NEVER")
    }

    fn electric_household(renewable_pct: u32) -> AnswerSet {
        AnswerSet::new()
            .with("home_type", "APT")
            .with("primary_heating", "ELEC")
            .with("appliance_use", "WEEKLY")
            .with("lighting_type", "LED")
            .with("air_conditioning", "NO")
            .with("car_type", "ELEC")
            .with("device_time", "LT2")
            .with("renewable_pct", renewable_pct)
            .with("flights_per_year", "NONE")
            .with("public_transport", "DAILY")
            .with("compost_waste", "YES")
            .with("clothes_drying", "LINE")
            .with("buy_secondhand", "OFTEN")
    }

    fn typical_week() -> AnswerSet {
        AnswerSet::new()
            .with("heating_usage", "SOME")
            .with("appliance_usage", "REG")
            .with("daily_transport", "MIXED")
            .with("weekly_travel", "LOCAL")
            .with("vehicle_type", "STANDARD")
            .with("energy_source", "STANDARD")
            .with("water_usage", "MODERATE")
            .with("waste_generation", "MEDIUM")
            .with("weekly_consumption", "MODERATE")
    }

    fn car_week(vehicle: &str, energy: &str) -> AnswerSet {
        typical_week()
            .with("daily_transport", "CAR")
            .with("weekly_travel", "LONG")
            .with("vehicle_type", vehicle)
            .with("energy_source", energy)
    }

    #[test]
    fn test_baseline_without_renewables() {
        let r = score_baseline(&gas_household(), 2).unwrap();
        assert_eq!(r.scope, Scope::Monthly);
        assert_eq!(r.raw_total, 795.0);
        // Gas heating stays out of the electric subtotal
        assert_eq!(r.electric_subtotal, 95.0);
        assert_eq!(r.renewable_discount, 0.0);
        assert_eq!(r.adjusted_total, 795.0);
        assert_eq!(r.per_person, Some(397.5));
        assert_eq!(r.monthly_estimate, None);
    }

    #[test]
    fn test_baseline_full_renewables_discounts_whole_electric_subtotal() {
        let r = score_baseline(&electric_household(100), 1).unwrap();
        assert_eq!(r.raw_total, 220.0);
        assert_eq!(r.electric_subtotal, 185.0);
        assert_eq!(r.renewable_discount, 185.0);
        assert_eq!(r.adjusted_total, 35.0);
    }

    #[test]
    fn test_baseline_adjusted_is_raw_minus_discount() {
        for pct in [0u32, 25, 50, 75, 100] {
            let r = score_baseline(&electric_household(pct), 3).unwrap();
            assert_eq!(r.adjusted_total, r.raw_total - r.renewable_discount);
        }
        let half = score_baseline(&electric_household(50), 1).unwrap();
        assert_eq!(half.renewable_discount, 92.5);
        assert_eq!(half.adjusted_total, 127.5);
    }

    #[test]
    fn test_renewable_discount_monotonic() {
        let discounts: Vec<f64> = [0u32, 25, 50, 75, 100]
            .into_iter()
            .map(|pct| score_baseline(&electric_household(pct), 1).unwrap().renewable_discount)
            .collect();
        assert!(discounts.windows(2).all(|w| w[0] <= w[1]), "{discounts:?}");
    }

    #[test]
    fn test_baseline_can_go_negative() {
        let answers = electric_household(0)
            .with("primary_heating", "NONE")
            .with("appliance_use", "NEVER")
            .with("car_type", "NONE");
        let r = score_baseline(&answers, 1).unwrap();
        assert_eq!(r.raw_total, -10.0);
        assert_eq!(r.adjusted_total, -10.0);
    }

    #[test]
    fn test_baseline_rejects_unknown_renewable_share() {
        let answers = gas_household().with("renewable_pct", 30u32);
        let err = score_baseline(&answers, 1).unwrap_err();
        assert_eq!(err, ScoringError::unknown_option("renewable_pct", "30"));
    }

    #[test]
    fn test_baseline_invalid_household() {
        let err = score_baseline(&gas_household(), 0).unwrap_err();
        assert_eq!(err, ScoringError::InvalidHousehold(0));
    }

    #[test]
    fn test_baseline_unknown_option_wins_over_household() {
        let answers = gas_household().with("home_type", "CASTLE");
        let err = score_baseline(&answers, 0).unwrap_err();
        assert_eq!(err, ScoringError::unknown_option("home_type", "CASTLE"));
    }

    #[test]
    fn test_weekly_standard_week() {
        let r = score_weekly(&typical_week(), None, 2).unwrap();
        assert_eq!(r.scope, Scope::Weekly);
        assert_eq!(r.raw_total, 142.0);
        assert_eq!(r.adjusted_total, 142.0);
        assert_eq!(r.electric_subtotal, 62.0);
        assert_eq!(r.renewable_discount, 0.0);
        assert_eq!(r.percent_change_from_previous, None);
        assert_eq!(r.monthly_estimate, Some(568.0));
        assert_eq!(r.monthly_estimate_per_person, Some(284.0));
        assert_eq!(r.per_person, None);
    }

    #[test]
    fn test_weekly_percent_change() {
        let r = score_weekly(&typical_week(), Some(100.0), 1).unwrap();
        assert_close(r.percent_change_from_previous.unwrap(), 42.0);

        let zero = score_weekly(&typical_week(), Some(0.0), 1).unwrap();
        assert_eq!(zero.percent_change_from_previous, None);
    }

    #[test]
    fn test_weekly_full_green_cuts_total_and_reports_discount() {
        let answers = AnswerSet::new()
            .with("heating_usage", "OFF")
            .with("appliance_usage", "OPT")
            .with("daily_transport", "ACTIVE")
            .with("weekly_travel", "LOCAL")
            .with("vehicle_type", "ELECTRIC")
            .with("energy_source", "FULL_GREEN")
            .with("water_usage", "MINIMAL")
            .with("waste_generation", "MINIMAL")
            .with("weekly_consumption", "NONE");
        let r = score_weekly(&answers, None, 1).unwrap();
        assert_eq!(r.raw_total, 2.0);
        assert_close(r.adjusted_total, 1.6);
        assert_eq!(r.electric_subtotal, 7.0);
        assert_close(r.renewable_discount, 5.6);
    }

    #[test]
    fn test_weekly_renewable_discount_is_not_double_applied() {
        let r = score_weekly(&typical_week().with("energy_source", "PARTIAL"), None, 1).unwrap();
        assert_eq!(r.raw_total, 130.0);
        assert_close(r.adjusted_total, 117.0);
        assert_close(r.renewable_discount, 50.0 * 0.4);
    }

    #[test]
    fn test_weekly_green_plan_reports_discount_without_cut() {
        let r = score_weekly(&typical_week().with("energy_source", "GREEN_OPT"), None, 1).unwrap();
        assert_eq!(r.adjusted_total, r.raw_total);
        assert_close(r.renewable_discount, 54.0 * 0.2);
    }

    #[test]
    fn test_electric_vehicle_cut_independent_of_energy_source() {
        let electric = score_weekly(&car_week("ELECTRIC", "STANDARD"), None, 1).unwrap();
        let standard = score_weekly(&car_week("STANDARD", "STANDARD"), None, 1).unwrap();
        assert!(electric.adjusted_total < standard.adjusted_total);
        assert_eq!(electric.raw_total, 192.0);
        assert_close(electric.adjusted_total, 192.0 - 0.15 * 110.0);
    }

    #[test]
    fn test_electric_vehicle_cut_applies_after_energy_multiplier() {
        let r = score_weekly(&car_week("ELECTRIC", "PARTIAL"), None, 1).unwrap();
        assert_eq!(r.raw_total, 180.0);
        assert_close(r.adjusted_total, 180.0 * 0.9 - 16.5);
    }

    #[test]
    fn test_weekly_negative_total_monthly_estimate() {
        let answers = AnswerSet::new()
            .with("heating_usage", "OFF")
            .with("appliance_usage", "OPT")
            .with("daily_transport", "ACTIVE")
            .with("weekly_travel", "LOCAL")
            .with("vehicle_type", "NONE")
            .with("energy_source", "FULL_GREEN")
            .with("water_usage", "MINIMAL")
            .with("waste_generation", "MINIMAL")
            .with("weekly_consumption", "NONE");
        let r = score_weekly(&answers, Some(10.0), 1).unwrap();
        assert!(r.adjusted_total < 0.0);
        assert_eq!(r.monthly_estimate, Some(r.adjusted_total * 4.0));
    }

    #[test]
    fn test_weekly_unknown_option_and_missing_answer() {
        let bad = typical_week().with("water_usage", "FIREHOSE");
        assert_eq!(
            score_weekly(&bad, None, 1).unwrap_err(),
            ScoringError::unknown_option("water_usage", "FIREHOSE")
        );

        let mut partial = AnswerSet::new();
        for (k, v) in typical_week().iter().filter(|(k, _)| *k != "vehicle_type") {
            partial.insert(k, v);
        }
        assert_eq!(
            score_weekly(&partial, None, 1).unwrap_err(),
            ScoringError::unknown_option("vehicle_type", "")
        );
    }

    #[test]
    fn test_weekly_invalid_household() {
        assert_eq!(
            score_weekly(&typical_week(), None, -1).unwrap_err(),
            ScoringError::InvalidHousehold(-1)
        );
    }

    #[test]
    fn test_scoring_is_idempotent() {
        let a = score_weekly(&car_week("ELECTRIC", "FULL_GREEN"), Some(77.0), 3).unwrap();
        let b = score_weekly(&car_week("ELECTRIC", "FULL_GREEN"), Some(77.0), 3).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.adjusted_total.to_bits(), b.adjusted_total.to_bits());

        let c = score_baseline(&electric_household(75), 2).unwrap();
        let d = score_baseline(&electric_household(75), 2).unwrap();
        assert_eq!(c, d);
    }

    #[test]
    fn test_weekly_series_chains_previous_totals() {
        let weeks = vec![typical_week(), car_week("STANDARD", "STANDARD"), typical_week()];
        let results = score_weekly_series(&weeks, 1).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].percent_change_from_previous, None);
        assert_close(
            results[1].percent_change_from_previous.unwrap(),
            (217.0 - 142.0) / 142.0 * 100.0,
        );
        assert_close(
            results[2].percent_change_from_previous.unwrap(),
            (142.0 - 217.0) / 217.0 * 100.0,
        );
    }

    #[test]
    fn test_custom_table_injection() {
        use crate::weights::Question;

        static FLAT: WeightTable = WeightTable::new(
            Scope::Weekly,
            "flat-1",
            &[
                Question { key: "heating_usage", options: &[("X", 1.0)] },
                Question { key: "appliance_usage", options: &[("X", 1.0)] },
                Question { key: "daily_transport", options: &[("X", 1.0)] },
                Question { key: "weekly_travel", options: &[("X", 1.0)] },
                Question { key: "vehicle_type", options: &[("ELECTRIC", 1.0)] },
                Question { key: "energy_source", options: &[("STANDARD", 1.0)] },
                Question { key: "water_usage", options: &[("X", 1.0)] },
                Question { key: "waste_generation", options: &[("X", 1.0)] },
                Question { key: "weekly_consumption", options: &[("X", 1.0)] },
            ],
        );
        let answers: AnswerSet = FLAT
            .questions()
            .iter()
            .map(|q| (q.key, q.options[0].0))
            .collect();

        let r = score_weekly_with(&FLAT, &answers, None, 1).unwrap();
        assert_eq!(r.weights_version, "flat-1");
        assert_eq!(r.raw_total, 9.0);
        assert_close(r.adjusted_total, 9.0 - 0.15 * 2.0);
        assert_eq!(r.electric_subtotal, 4.0);

        // The canonical table does not know these codes
        assert!(score_weekly(&answers, None, 1).is_err());
    }
}
