use anyhow::{bail, Context, Result};
use ecotrack_core::{keys, MONTHLY_WEIGHTS};
use ecotrack_ingest::parse_timezone;
use std::io::{self, Write};

use crate::state::{profile_path, read_profile, write_profile, Profile};

fn prompt(label: &str) -> Result<String> {
    print!("{}: ", label);
    io::stdout().flush().ok();
    let mut s = String::new();
    io::stdin().read_line(&mut s)?;
    Ok(s.trim().to_string())
}

/// Prompt with a default shown in brackets; blank input keeps the default.
fn prompt_or(label: &str, default: &str) -> Result<String> {
    let s = prompt(&format!("{label} [{default}]"))?;
    Ok(if s.is_empty() { default.to_string() } else { s })
}

pub fn parse_household_size(s: &str) -> Result<i64> {
    let n: i64 = s
        .trim()
        .parse()
        .with_context(|| format!("household size must be a whole number, got '{s}'"))?;
    if n < 1 {
        bail!("household size must be at least 1");
    }
    Ok(n)
}

pub fn parse_house_type(s: &str) -> Result<String> {
    let code = s.trim().to_uppercase();
    MONTHLY_WEIGHTS.weight(keys::HOME_TYPE, &code)?;
    Ok(code)
}

/// Blank means "no goal yet".
pub fn parse_goal(s: &str) -> Result<Option<f64>> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(None);
    }
    let goal: f64 = s
        .parse()
        .with_context(|| format!("goal must be a number of kg CO2e per month, got '{s}'"))?;
    if goal <= 0.0 {
        bail!("goal must be greater than zero");
    }
    Ok(Some(goal))
}

pub fn run_setup() -> Result<()> {
    println!("EcoTrack setup\n");
    let current = read_profile()?;

    let display_name = prompt_or("Display name (optional)", &current.display_name)?;
    let household_size =
        parse_household_size(&prompt_or("People in your household", &current.household_size.to_string())?)?;

    let house_options: Vec<&str> = MONTHLY_WEIGHTS
        .question(keys::HOME_TYPE)
        .map(|q| q.option_codes().collect())
        .unwrap_or_default();
    let house_type = parse_house_type(&prompt_or(
        &format!("Home type ({})", house_options.join("/")),
        &current.house_type,
    )?)?;

    let goal_default = current.carbon_goal.map(|g| g.to_string()).unwrap_or_default();
    let carbon_goal = parse_goal(&prompt_or("Monthly goal in kg CO2e (blank to skip)", &goal_default)?)?;

    let timezone = prompt_or("Timezone (IANA name)", &current.timezone)?;
    parse_timezone(&timezone)?;

    let profile = Profile {
        created_at_utc: current
            .created_at_utc
            .or_else(|| Some(chrono::Utc::now().to_rfc3339())),
        display_name,
        household_size,
        house_type,
        carbon_goal,
        timezone,
    };
    write_profile(&profile)?;

    println!("\nWrote {}", profile_path()?.display());
    println!("\nNext recommended steps:");
    println!("- ecotrack baseline --answers survey.json");
    println!("- ecotrack checkup --answers week.json   (once a week)");
    println!("- ecotrack progress");

    Ok(())
}
