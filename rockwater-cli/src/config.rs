use anyhow::{Context, Result, bail};
use rockwater_core::DurationLimits;
use rockwater_core::time::parse_tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::ensure_rockwater_home;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// IANA zone used to read `--now` and print clock times.
    pub timezone: String,
    /// Minutes. Floor for any rescale.
    pub min_duration: i32,
    /// Minutes. Optional cap for any rescale.
    pub max_duration: Option<i32>,
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            timezone: "America/Chicago".to_string(),
            min_duration: rockwater_core::MIN_DURATION_MINUTES,
            max_duration: None,
        }
    }
}

impl ScheduleSection {
    pub fn limits(&self) -> DurationLimits {
        DurationLimits::new(self.min_duration, self.max_duration)
    }

    /// Reject settings that would only fail later, mid-plan.
    pub fn validate(&self) -> Result<()> {
        parse_tz(&self.timezone).context("schedule.timezone")?;
        if self.min_duration < 0 {
            bail!("schedule.min_duration must be >= 0, got {}", self.min_duration);
        }
        if let Some(max) = self.max_duration {
            if max < self.min_duration {
                bail!(
                    "schedule.max_duration ({max}) is below schedule.min_duration ({})",
                    self.min_duration
                );
            }
        }
        Ok(())
    }
}

/// Parse and validate a config.toml body. Missing keys take defaults.
pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s).context("parse config.toml")?;
    cfg.schedule.validate()?;
    Ok(cfg)
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_rockwater_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// Defaults when `path` does not exist yet.
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_config(&s).with_context(|| format!("load {}", path.display()))
}

/// Write the default config to `path` unless one is already there.
/// Returns whether anything was written.
pub fn write_default_config(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    let s = toml::to_string_pretty(&Config::default()).context("serialize config")?;
    fs::write(path, s).with_context(|| format!("write {}", path.display()))?;
    Ok(true)
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if write_default_config(&p)? {
        println!("Wrote {}", p.display());
    } else {
        println!("Config already exists: {}", p.display());
    }
    Ok(())
}
