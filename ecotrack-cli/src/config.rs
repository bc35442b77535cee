use anyhow::{Context, Result};
use ecotrack_core::TREND_MONTHS;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::state::ensure_ecotrack_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogSection {
    /// tracing EnvFilter directive; `RUST_LOG` wins when set
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplaySection {
    /// Print JSON instead of text tables
    #[serde(default)]
    pub json: bool,
    /// Months shown in the trend (at most 6)
    #[serde(default = "default_trend_months")]
    pub trend_months: usize,
    /// Checkups shown in the recent series
    #[serde(default = "default_series_len")]
    pub series_len: usize,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            json: false,
            trend_months: default_trend_months(),
            series_len: default_series_len(),
        }
    }
}

impl DisplaySection {
    /// Months shown in the trend, within `1..=TREND_MONTHS`.
    pub fn trend_months(&self) -> usize {
        let months = self.trend_months.clamp(1, TREND_MONTHS);
        if months != self.trend_months {
            warn!(configured = self.trend_months, using = months, "display.trend_months out of range");
        }
        months
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_trend_months() -> usize {
    TREND_MONTHS
}

fn default_series_len() -> usize {
    7
}

impl Config {
    /// Missing file means defaults; missing keys fall back per section.
    pub fn load_from(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(s) => toml::from_str(&s).with_context(|| format!("parse {}", path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self).context("serialize config")?;
        fs::write(path, s).with_context(|| format!("write {}", path.display()))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_ecotrack_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    Config::load_from(&config_path()?)
}

/// Write the default config unless one exists. Returns whether a file was written.
fn init_config_at(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    Config::default().save_to(path)?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if init_config_at(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}
