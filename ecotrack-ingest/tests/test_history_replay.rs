use chrono::NaiveDate;
use chrono_tz::Tz;
use ecotrack_core::{checkup_history, monthly_trend, recent_series, score_baseline, Goal, ProgressState};
use ecotrack_ingest::{append_checkup, load_answers, parse_checkups_csv, replay_checkups};
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-9, "expected {expected}, got {actual}");
}

/// Fixture history: three months of checkups, trend averages per month.
#[test]
fn test_monthly_trend_from_fixture() {
    let checkups = parse_checkups_csv(fixture("checkups.csv")).unwrap();
    assert_eq!(checkups.len(), 9);

    let records = replay_checkups(&checkups, 1, Tz::UTC).unwrap();
    let trend = monthly_trend(&records);

    let labels: Vec<_> = trend.iter().map(|p| p.label.as_str()).collect();
    assert_eq!(labels, vec!["Jan 2026", "Feb 2026", "Mar 2026"]);
    assert_close(trend[0].average_estimate, (142.0 + 217.0 + 31.5 + 142.0) * 4.0 / 4.0);
    assert_close(trend[1].average_estimate, (1.6 + 175.5 + 142.0) * 4.0 / 3.0);
    assert_close(trend[2].average_estimate, (142.0 + 87.0) * 4.0 / 2.0);
    assert_eq!(trend[1].weeks, 3);
}

/// Every replayed week satisfies monthly_estimate == adjusted_total * 4.
#[test]
fn test_replayed_monthly_estimates() {
    let checkups = parse_checkups_csv(fixture("checkups.csv")).unwrap();
    let records = replay_checkups(&checkups, 2, Tz::UTC).unwrap();
    for r in &records {
        assert_eq!(r.result.monthly_estimate, Some(r.result.adjusted_total * 4.0));
        assert_eq!(
            r.result.monthly_estimate_per_person,
            Some(r.result.adjusted_total * 4.0 / 2.0)
        );
    }
    assert_eq!(records[0].result.percent_change_from_previous, None);
    assert!(records[1..].iter().all(|r| r.result.percent_change_from_previous.is_some()));
}

#[test]
fn test_history_table_and_series() {
    let checkups = parse_checkups_csv(fixture("checkups.csv")).unwrap();
    let records = replay_checkups(&checkups, 1, Tz::UTC).unwrap();

    let rows = checkup_history(&records);
    assert_eq!(rows[0].submitted_on, NaiveDate::from_ymd_opt(2026, 3, 8).unwrap());
    assert_close(rows[0].percent_change.unwrap(), (87.0 - 142.0) / 142.0 * 100.0);
    assert_eq!(rows.last().unwrap().percent_change, None);

    let series = recent_series(&records, 7);
    assert_eq!(series.labels.first().map(String::as_str), Some("Jan 18"));
    assert_eq!(series.labels.last().map(String::as_str), Some("Mar 08"));
}

/// Baseline survey + latest checkup + target: the dashboard's progress figure.
#[test]
fn test_goal_progress_from_fixture() {
    let survey = load_answers(fixture("survey.json")).unwrap();
    let baseline = score_baseline(&survey, 2).unwrap();
    assert_eq!(baseline.adjusted_total, 795.0);

    let checkups = parse_checkups_csv(fixture("checkups.csv")).unwrap();
    let records = replay_checkups(&checkups, 1, Tz::UTC).unwrap();
    let latest = &records.last().unwrap().result;

    let goal = Goal::from_scores(300.0, Some(&baseline), Some(latest));
    assert_close(goal.current_amount, 348.0);
    assert_close(goal.progress(), (795.0 - 348.0) / (795.0 - 300.0) * 100.0);

    let met = Goal::from_scores(400.0, Some(&baseline), Some(latest));
    assert_eq!(met.state(), ProgressState::GoalMet);

    let invalid = Goal::from_scores(900.0, Some(&baseline), Some(latest));
    assert_eq!(invalid.progress(), 0.0);
}

/// Timestamps late in the evening UTC fall on the previous local day.
#[test]
fn test_timezone_shifts_trend_month() {
    let csv = "\
submitted_at,heating_usage,appliance_usage,daily_transport,weekly_travel,vehicle_type,energy_source,water_usage,waste_generation,weekly_consumption
2026-03-01T03:00:00Z,SOME,REG,MIXED,LOCAL,STANDARD,STANDARD,MODERATE,MEDIUM,MODERATE
";
    let checkups = ecotrack_ingest::read_checkups(csv.as_bytes()).unwrap();
    let la: Tz = "America/Los_Angeles".parse().unwrap();
    let records = replay_checkups(&checkups, 1, la).unwrap();
    assert_eq!(monthly_trend(&records)[0].label, "Feb 2026");
}

#[test]
fn test_append_then_parse() {
    let dir = std::env::temp_dir().join(format!("ecotrack-append-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("checkups.csv");
    let _ = std::fs::remove_file(&path);

    let checkups = parse_checkups_csv(fixture("checkups.csv")).unwrap();
    for c in &checkups[..3] {
        append_checkup(&path, c).unwrap();
    }

    let back = parse_checkups_csv(&path).unwrap();
    assert_eq!(back, checkups[..3].to_vec());
    std::fs::remove_dir_all(&dir).unwrap();
}
