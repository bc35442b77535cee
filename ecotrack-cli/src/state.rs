use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use ecotrack_core::{AnswerSet, ScoreResult};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// `$ECOTRACK_HOME`, or `~/.ecotrack`.
pub fn ecotrack_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("ECOTRACK_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".ecotrack"))
}

pub fn ensure_ecotrack_home() -> Result<PathBuf> {
    let dir = ecotrack_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub created_at_utc: Option<String>,
    #[serde(default)]
    pub display_name: String,
    #[serde(default = "default_household_size")]
    pub household_size: i64,
    /// Answer to the baseline survey's `home_type` question
    #[serde(default = "default_house_type")]
    pub house_type: String,
    /// Monthly goal in kg CO₂e
    pub carbon_goal: Option<f64>,
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            created_at_utc: None,
            display_name: String::new(),
            household_size: default_household_size(),
            house_type: default_house_type(),
            carbon_goal: None,
            timezone: default_timezone(),
        }
    }
}

fn default_household_size() -> i64 {
    1
}

fn default_house_type() -> String {
    "APT".to_string()
}

fn default_timezone() -> String {
    "UTC".to_string()
}

/// The onboarding survey, scored once and never replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaselineRecord {
    pub submitted_at: DateTime<Utc>,
    pub answers: AnswerSet,
    pub result: ScoreResult,
}

pub fn profile_path() -> Result<PathBuf> {
    Ok(ensure_ecotrack_home()?.join("profile.json"))
}

pub fn baseline_path() -> Result<PathBuf> {
    Ok(ensure_ecotrack_home()?.join("baseline.json"))
}

pub fn checkups_path() -> Result<PathBuf> {
    Ok(ensure_ecotrack_home()?.join("checkups.csv"))
}

pub fn write_profile(profile: &Profile) -> Result<()> {
    let p = profile_path()?;
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(&p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn read_profile() -> Result<Profile> {
    let p = profile_path()?;
    if !p.exists() {
        return Ok(Profile::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn read_baseline() -> Result<Option<BaselineRecord>> {
    read_baseline_from(&baseline_path()?)
}

fn read_baseline_from(p: &Path) -> Result<Option<BaselineRecord>> {
    if !p.exists() {
        return Ok(None);
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let record = serde_json::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    Ok(Some(record))
}

/// Store the baseline. A second submission is rejected.
pub fn write_baseline(record: &BaselineRecord) -> Result<PathBuf> {
    let p = baseline_path()?;
    write_baseline_to(&p, record)?;
    Ok(p)
}

fn write_baseline_to(p: &Path, record: &BaselineRecord) -> Result<()> {
    if p.exists() {
        bail!("baseline survey already submitted ({})", p.display());
    }
    let json = serde_json::to_string_pretty(record)?;
    fs::write(p, json).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}
