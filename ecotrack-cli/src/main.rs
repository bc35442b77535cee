use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::{Parser, Subcommand, ValueEnum};
use ecotrack_core::{
    checkup_history, checkup_reminder, keys, monthly_trend_limited, recent_series, score_baseline,
    score_weekly, CheckupReminder, Goal, Scope, WeeklyRecord,
};
use ecotrack_ingest::{
    append_checkup, load_answers, parse_checkups_csv, parse_timezone, replay_checkups,
    score_checkup, CheckupSubmission, SubmittedAt,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod config;
mod report;
mod setup;
mod state;
mod telemetry;

use config::Config;
use state::{BaselineRecord, Profile};

#[derive(Parser, Debug)]
#[command(name = "ecotrack", version, about = "Household carbon footprint tracker")]
struct Cli {
    /// Print JSON instead of text (also `display.json` in config.toml)
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive setup: household, goal and timezone, written to ~/.ecotrack/profile.json
    Setup,

    /// Config file commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// List the weight tables
    Weights {
        /// Only this table
        #[arg(long, value_enum)]
        scope: Option<ScopeArg>,
    },

    /// Score and store the one-time baseline survey
    Baseline {
        /// Answers JSON: {"question_key": "OPTION", ...}
        #[arg(long)]
        answers: PathBuf,
    },

    /// Score a weekly checkup and append it to the history
    Checkup {
        /// Answers JSON: {"question_key": "OPTION", ...}
        #[arg(long)]
        answers: PathBuf,

        /// Submission time, RFC 3339 or YYYY-MM-DD (default: now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Checkup history, monthly trend and recent weeks
    History {
        /// Read this checkup CSV instead of the stored history
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// Progress toward the monthly goal
    Progress {
        /// Baseline monthly footprint (default: stored baseline)
        #[arg(long)]
        baseline: Option<f64>,

        /// Monthly target (default: profile goal)
        #[arg(long)]
        target: Option<f64>,

        /// Current monthly footprint (default: latest checkup estimate)
        #[arg(long)]
        current: Option<f64>,
    },

    /// Score a baseline survey without storing it
    ScoreBaseline {
        #[arg(long)]
        answers: PathBuf,

        /// Household size (default: profile)
        #[arg(long)]
        household: Option<i64>,
    },

    /// Score a weekly checkup without storing it
    ScoreWeekly {
        #[arg(long)]
        answers: PathBuf,

        /// Adjusted total of the previous week
        #[arg(long)]
        previous: Option<f64>,

        /// Household size (default: profile)
        #[arg(long)]
        household: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ScopeArg {
    Monthly,
    Weekly,
}

impl From<ScopeArg> for Scope {
    fn from(arg: ScopeArg) -> Self {
        match arg {
            ScopeArg::Monthly => Scope::Monthly,
            ScopeArg::Weekly => Scope::Weekly,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load_config()?;
    telemetry::init(&cfg.log)?;

    let json = cli.json || cfg.display.json;

    match cli.command {
        Command::Setup => {
            setup::run_setup()?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
        },

        Command::Weights { scope } => {
            let scopes = match scope {
                Some(s) => vec![Scope::from(s)],
                None => vec![Scope::Monthly, Scope::Weekly],
            };
            for (i, scope) in scopes.into_iter().enumerate() {
                let table = scope.table();
                if json {
                    print_json(table)?;
                } else {
                    if i > 0 {
                        println!();
                    }
                    report::print_weights(table);
                }
            }
        }

        Command::Baseline { answers } => {
            run_baseline(&answers, json)?;
        }

        Command::Checkup { answers, at } => {
            run_checkup(&answers, at.as_deref(), json)?;
        }

        Command::History { csv } => {
            run_history(csv, &cfg, json)?;
        }

        Command::Progress {
            baseline,
            target,
            current,
        } => {
            run_progress(baseline, target, current, json)?;
        }

        Command::ScoreBaseline { answers, household } => {
            let household = household_or_profile(household)?;
            let answers = load_answers(&answers)?;
            let result = score_baseline(&answers, household)?;
            if json {
                print_json(&result)?;
            } else {
                report::print_score(&result);
            }
        }

        Command::ScoreWeekly {
            answers,
            previous,
            household,
        } => {
            let household = household_or_profile(household)?;
            let answers = load_answers(&answers)?;
            let result = score_weekly(&answers, previous, household)?;
            if json {
                print_json(&result)?;
            } else {
                report::print_score(&result);
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn household_or_profile(household: Option<i64>) -> Result<i64> {
    match household {
        Some(n) => Ok(n),
        None => Ok(state::read_profile()?.household_size),
    }
}

fn run_baseline(answers_path: &Path, json: bool) -> Result<()> {
    let profile = state::read_profile()?;
    if state::read_baseline()?.is_some() {
        bail!(
            "baseline survey already submitted ({})",
            state::baseline_path()?.display()
        );
    }

    let mut answers = load_answers(answers_path)?;
    if !answers.contains(keys::HOME_TYPE) {
        answers.insert(keys::HOME_TYPE, profile.house_type.as_str());
    }

    let result = score_baseline(&answers, profile.household_size)?;
    let record = BaselineRecord {
        submitted_at: Utc::now(),
        answers,
        result,
    };
    let path = state::write_baseline(&record)?;
    info!(path = %path.display(), adjusted_total = record.result.adjusted_total, "stored baseline");

    if json {
        print_json(&record.result)?;
    } else {
        report::print_score(&record.result);
        println!("\nSaved {}", path.display());
    }
    Ok(())
}

fn load_checkups(path: &Path) -> Result<Vec<CheckupSubmission>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    parse_checkups_csv(path).with_context(|| format!("parsing {}", path.display()))
}

fn load_history(path: &Path, profile: &Profile) -> Result<Vec<WeeklyRecord>> {
    let tz = parse_timezone(&profile.timezone)?;
    replay_checkups(&load_checkups(path)?, profile.household_size, tz)
}

fn today_in(tz: Tz) -> NaiveDate {
    Utc::now().with_timezone(&tz).date_naive()
}

fn reminder_for(records: &[WeeklyRecord], tz: Tz) -> CheckupReminder {
    let last = records.iter().map(|r| r.submitted_on).max();
    checkup_reminder(last, today_in(tz))
}

fn run_checkup(answers_path: &Path, at: Option<&str>, json: bool) -> Result<()> {
    let profile = state::read_profile()?;
    let tz = parse_timezone(&profile.timezone)?;
    let submitted_at = match at {
        Some(s) => SubmittedAt::parse(s)?,
        None => SubmittedAt::At(Utc::now()),
    };
    let checkup = CheckupSubmission {
        submitted_at,
        answers: load_answers(answers_path)?,
    };

    let path = state::checkups_path()?;
    let history = load_checkups(&path)?;
    let submitted_on = submitted_at.local_date(tz);
    if history
        .iter()
        .any(|c| c.submitted_at.local_date(tz) == submitted_on)
    {
        warn!(%submitted_on, "a checkup already exists for this day");
    }

    let result = score_checkup(&history, &checkup, profile.household_size, tz)?;
    append_checkup(&path, &checkup)?;
    info!(path = %path.display(), %submitted_on, "appended checkup");

    if json {
        print_json(&result)?;
    } else {
        report::print_score(&result);
        println!("\nAppended to {}", path.display());
    }
    Ok(())
}

#[derive(Serialize)]
struct HistoryReport {
    rows: Vec<ecotrack_core::HistoryRow>,
    trend: Vec<ecotrack_core::TrendPoint>,
    recent: ecotrack_core::WeeklySeries,
    reminder: CheckupReminder,
}

fn run_history(csv: Option<PathBuf>, cfg: &Config, json: bool) -> Result<()> {
    let profile = state::read_profile()?;
    let path = match csv {
        Some(p) => {
            if !p.exists() {
                bail!("CSV not found: {}", p.display());
            }
            p
        }
        None => state::checkups_path()?,
    };
    let records = load_history(&path, &profile)?;

    let report = HistoryReport {
        rows: checkup_history(&records),
        trend: monthly_trend_limited(&records, cfg.display.trend_months()),
        recent: recent_series(&records, cfg.display.series_len),
        reminder: reminder_for(&records, parse_timezone(&profile.timezone)?),
    };

    if json {
        return print_json(&report);
    }
    if report.rows.is_empty() {
        println!("No checkups yet. Run: ecotrack checkup --answers <week.json>");
        return Ok(());
    }

    println!("# Checkups ({})\n", path.display());
    report::print_history(&report.rows);
    println!("\n# Monthly trend\n");
    report::print_trend(&report.trend);
    println!("\n# Last {} weeks\n", report.recent.labels.len());
    report::print_series(&report.recent);
    println!();
    report::print_reminder(&report.reminder);
    Ok(())
}

fn run_progress(
    baseline: Option<f64>,
    target: Option<f64>,
    current: Option<f64>,
    json: bool,
) -> Result<()> {
    let profile = state::read_profile()?;
    let target = match target.or(profile.carbon_goal) {
        Some(t) => t,
        None => bail!("No goal set. Run: ecotrack setup (or pass --target)"),
    };

    let stored_baseline = state::read_baseline()?;
    let history = load_history(&state::checkups_path()?, &profile)?;
    let reminder = reminder_for(&history, parse_timezone(&profile.timezone)?);
    let mut goal = Goal::from_scores(
        target,
        stored_baseline.as_ref().map(|b| &b.result),
        history.last().map(|r| &r.result),
    );
    if let Some(b) = baseline {
        goal.baseline = Some(b);
        if current.is_none() && history.is_empty() {
            goal.current_amount = b;
        }
    }
    if let Some(c) = current {
        goal.current_amount = c;
    }

    if json {
        #[derive(Serialize)]
        struct ProgressReport<'a> {
            #[serde(flatten)]
            goal: &'a Goal,
            progress: f64,
            remaining_reduction: f64,
            reminder: CheckupReminder,
        }
        return print_json(&ProgressReport {
            goal: &goal,
            progress: goal.progress(),
            remaining_reduction: goal.remaining_reduction(),
            reminder,
        });
    }
    report::print_progress(&goal);
    println!();
    report::print_reminder(&reminder);
    Ok(())
}
