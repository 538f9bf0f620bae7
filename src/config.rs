//! Calendar configuration: the viewing window and layout policy.
//!
//! Defaults match the clinic grid (08:00-18:00, 30-minute slots). A config can
//! be read from JSON and then overridden from the environment:
//!
//! - `EASYAPPOINT_START_HOUR`
//! - `EASYAPPOINT_END_HOUR`
//! - `EASYAPPOINT_SLOT_MINUTES`
//! - `EASYAPPOINT_OVERLAP_POLICY` (`local` or `clustered`)

use crate::error::{Result, ScheduleError};
use crate::layout::OverlapPolicy;
use chrono::Weekday;
use serde::{Deserialize, Serialize};

pub const DEFAULT_START_HOUR: u32 = 8;
pub const DEFAULT_END_HOUR: u32 = 18;
pub const DEFAULT_SLOT_MINUTES: u32 = 30;

/// The fixed daily time range layouts are computed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewWindow {
    pub start_hour: u32,
    pub end_hour: u32,
    pub slot_minutes: u32,
}

impl Default for ViewWindow {
    fn default() -> Self {
        ViewWindow {
            start_hour: DEFAULT_START_HOUR,
            end_hour: DEFAULT_END_HOUR,
            slot_minutes: DEFAULT_SLOT_MINUTES,
        }
    }
}

impl ViewWindow {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        ViewWindow {
            start_hour,
            end_hour,
            ..ViewWindow::default()
        }
    }

    /// Minutes covered by the window; zero for a degenerate window.
    pub fn total_minutes(&self) -> u32 {
        self.end_hour.saturating_sub(self.start_hour) * 60
    }

    pub fn start_minute(&self) -> u32 {
        self.start_hour * 60
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub window: ViewWindow,
    pub overlap_policy: OverlapPolicy,
    pub week_start: Weekday,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        ScheduleConfig {
            window: ViewWindow::default(),
            overlap_policy: OverlapPolicy::default(),
            week_start: Weekday::Mon,
        }
    }
}

impl ScheduleConfig {
    /// Parse a JSON config. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ScheduleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults overridden by `EASYAPPOINT_*` environment variables.
    pub fn from_env() -> Result<Self> {
        ScheduleConfig::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary key lookup, then validate.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("EASYAPPOINT_START_HOUR") {
            self.window.start_hour = parse_number("EASYAPPOINT_START_HOUR", &value)?;
        }
        if let Some(value) = lookup("EASYAPPOINT_END_HOUR") {
            self.window.end_hour = parse_number("EASYAPPOINT_END_HOUR", &value)?;
        }
        if let Some(value) = lookup("EASYAPPOINT_SLOT_MINUTES") {
            self.window.slot_minutes = parse_number("EASYAPPOINT_SLOT_MINUTES", &value)?;
        }
        if let Some(value) = lookup("EASYAPPOINT_OVERLAP_POLICY") {
            self.overlap_policy =
                OverlapPolicy::from_string(&value).map_err(ScheduleError::InvalidConfig)?;
        }

        self.validate()?;
        tracing::debug!(config = ?self, "schedule config resolved");
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        let window = &self.window;
        if window.end_hour <= window.start_hour {
            return Err(ScheduleError::InvalidConfig(format!(
                "end hour {} must be after start hour {}",
                window.end_hour, window.start_hour
            )));
        }
        if window.end_hour > 24 {
            return Err(ScheduleError::InvalidConfig(format!(
                "end hour {} is past midnight",
                window.end_hour
            )));
        }
        if window.slot_minutes == 0 {
            return Err(ScheduleError::InvalidConfig(
                "slot length must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| {
            ScheduleError::InvalidConfig(format!(
                "{} must be a whole number, got '{}'",
                key, value
            ))
        })
}
