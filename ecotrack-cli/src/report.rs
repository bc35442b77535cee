//! Plain-text rendering of engine output.

use ecotrack_core::{CheckupReminder, Goal, HistoryRow, ProgressState, ScoreResult, Scope, TrendPoint, WeeklySeries, WeightTable};

pub fn format_pct_change(pct: Option<f64>) -> String {
    match pct {
        Some(p) if p > 0.0 => format!("+{p:.1}%"),
        Some(p) => format!("{p:.1}%"),
        None => "n/a".to_string(),
    }
}

pub fn print_score(result: &ScoreResult) {
    let label = match result.scope {
        Scope::Monthly => "Baseline survey (kg CO2e / month)",
        Scope::Weekly => "Weekly checkup (kg CO2e / week)",
    };
    println!("{label}  [weights {}]", result.weights_version);
    println!("  raw total            {:>10.2}", result.raw_total);
    println!("  electric subtotal    {:>10.2}", result.electric_subtotal);
    println!("  renewable discount   {:>10.2}", result.renewable_discount);
    println!("  adjusted total       {:>10.2}", result.adjusted_total);
    if let Some(pp) = result.per_person {
        println!("  per person           {:>10.2}", pp);
    }
    if result.scope == Scope::Weekly {
        println!(
            "  change vs last week  {:>10}",
            format_pct_change(result.percent_change_from_previous)
        );
    }
    if let Some(m) = result.monthly_estimate {
        println!("  monthly estimate     {:>10.2}", m);
    }
    if let Some(m) = result.monthly_estimate_per_person {
        println!("  monthly per person   {:>10.2}", m);
    }
}

pub fn print_weights(table: &WeightTable) {
    println!("{} weights  [version {}]", table.scope, table.version);
    for q in table.questions() {
        let options: Vec<String> = q
            .options
            .iter()
            .map(|(code, w)| format!("{code}={w}"))
            .collect();
        println!("  {:<20} {}", q.key, options.join("  "));
    }
}

pub fn print_history(rows: &[HistoryRow]) {
    println!("{:<12} {:>10} {:>10} {:>12}", "date", "total", "change", "monthly est");
    for row in rows {
        println!(
            "{:<12} {:>10.2} {:>10} {:>12.2}",
            row.submitted_on.format("%Y-%m-%d"),
            row.adjusted_total,
            format_pct_change(row.percent_change),
            row.monthly_estimate
        );
    }
}

pub fn print_trend(trend: &[TrendPoint]) {
    println!("{:<10} {:>14} {:>6}", "month", "avg estimate", "weeks");
    for point in trend {
        println!(
            "{:<10} {:>14.2} {:>6}",
            point.label, point.average_estimate, point.weeks
        );
    }
}

pub fn print_series(series: &WeeklySeries) {
    for ((label, total), monthly) in series
        .labels
        .iter()
        .zip(&series.weekly_totals)
        .zip(&series.monthly_estimates)
    {
        println!("  {label}  {total:>8.2}  ({monthly:.2} / month)");
    }
}

pub fn describe_state(state: ProgressState) -> &'static str {
    match state {
        ProgressState::InvalidGoal => "goal is not below the baseline (or no baseline yet)",
        ProgressState::NoImprovement => "no reduction below the baseline yet",
        ProgressState::GoalMet => "goal met",
        ProgressState::InProgress(_) => "on the way",
    }
}

pub fn print_progress(goal: &Goal) {
    let state = goal.state();
    match goal.baseline {
        Some(b) => println!("baseline        {:>10.2} kg CO2e / month", b),
        None => println!("baseline               n/a"),
    }
    println!("target          {:>10.2} kg CO2e / month", goal.target_amount);
    println!("current         {:>10.2} kg CO2e / month", goal.current_amount);
    println!("progress        {:>9.1}%  ({})", state.percent(), describe_state(state));
    if state != ProgressState::InvalidGoal && goal.remaining_reduction() > 0.0 {
        println!("still to cut    {:>10.2} kg CO2e / month", goal.remaining_reduction());
    }
}

pub fn describe_reminder(reminder: &CheckupReminder) -> String {
    match (reminder.days_since_last, reminder.days_until_next) {
        (None, _) => "no checkups yet; take your first weekly checkup".to_string(),
        (Some(since), 0) => format!("last checkup {since} day(s) ago; next checkup is due now"),
        (Some(since), until) => format!("last checkup {since} day(s) ago; next checkup in {until} day(s)"),
    }
}

pub fn print_reminder(reminder: &CheckupReminder) {
    println!("{}", describe_reminder(reminder));
}
