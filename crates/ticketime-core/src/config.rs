use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use crate::calendar::{
    BusinessCalendar, DEFAULT_HOLIDAYS, DEFAULT_UTC_OFFSET_MINUTES, offset_from_minutes,
};
use crate::error::ErrorCode;

/// Directory holding project state, relative to the project root.
pub const STATE_DIR: &str = ".ticketime";

/// Configuration load and validation failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid holiday '{raw}': expected YYYY-MM-DD")]
    InvalidHoliday { raw: String },

    #[error("invalid time of day '{raw}': expected HH:MM")]
    InvalidTime { raw: String },

    #[error("working window {start}..{end} is empty")]
    InvalidHours { start: NaiveTime, end: NaiveTime },

    #[error("utc offset of {minutes} minutes is out of range")]
    InvalidOffset { minutes: i32 },
}

impl ConfigError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Io { .. } | Self::Parse { .. } => ErrorCode::ConfigParseError,
            Self::InvalidHoliday { .. } => ErrorCode::InvalidHoliday,
            Self::InvalidTime { .. } | Self::InvalidHours { .. } | Self::InvalidOffset { .. } => {
                ErrorCode::InvalidCalendar
            }
        }
    }
}

/// Project-level configuration (`.ticketime/config.toml`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

/// Raw business-calendar settings as written in TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
    #[serde(default = "default_day_start")]
    pub day_start: String,
    #[serde(default = "default_day_end")]
    pub day_end: String,
    #[serde(default = "default_holidays")]
    pub holidays: Vec<String>,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
            day_start: default_day_start(),
            day_end: default_day_end(),
            holidays: default_holidays(),
        }
    }
}

impl CalendarConfig {
    /// Validate into a [`BusinessCalendar`].
    ///
    /// Every holiday must be a real `YYYY-MM-DD` date; nothing is guessed.
    pub fn to_calendar(&self) -> Result<BusinessCalendar, ConfigError> {
        let offset = offset_from_minutes(self.utc_offset_minutes).ok_or(
            ConfigError::InvalidOffset {
                minutes: self.utc_offset_minutes,
            },
        )?;
        let day_start = parse_time_of_day(&self.day_start)?;
        let day_end = parse_time_of_day(&self.day_end)?;
        let holidays = self
            .holidays
            .iter()
            .map(|raw| parse_holiday(raw))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(BusinessCalendar::new(offset, day_start, day_end)?.with_holidays(holidays))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Overrides the zone name shown next to instants. Derived from
    /// `calendar.utc_offset_minutes` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timezone_label: Option<String>,
}

/// Per-user settings (`~/.config/ticketime/config.toml`).
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

/// Project and user config merged with environment overrides.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub calendar: BusinessCalendar,
    pub user: UserConfig,
    pub resolved_output: String,
}

impl EffectiveConfig {
    /// Zone name for human output: the configured label, or `UTC±HH:MM` of
    /// the calendar offset.
    #[must_use]
    pub fn zone_label(&self) -> String {
        self.project
            .display
            .timezone_label
            .clone()
            .unwrap_or_else(|| self.calendar.zone_label())
    }
}

pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig, ConfigError> {
    let path = project_root.join(STATE_DIR).join("config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    toml::from_str::<ProjectConfig>(&content).map_err(|source| ConfigError::Parse { path, source })
}

pub fn load_user_config() -> Result<UserConfig, ConfigError> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("ticketime/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Io {
        path: path.clone(),
        source,
    })?;

    toml::from_str::<UserConfig>(&content).map_err(|source| ConfigError::Parse { path, source })
}

pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig, ConfigError> {
    let project = load_project_config(project_root)?;
    resolve_with_project(project, cli_json)
}

/// Like [`resolve_config`], but with `project` in place of
/// `.ticketime/config.toml`. Used when that file is about to be rewritten.
pub fn resolve_with_project(
    project: ProjectConfig,
    cli_json: bool,
) -> Result<EffectiveConfig, ConfigError> {
    let calendar = project.calendar.to_calendar()?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.as_deref(), env_format.as_deref());

    Ok(EffectiveConfig {
        project,
        calendar,
        user,
        resolved_output,
    })
}

fn resolve_output(cli_json: bool, user_output: Option<&str>, env_format: Option<&str>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "table" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

/// Render a default config file for `tkt init`.
pub fn default_config_toml() -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&ProjectConfig::default())
}

fn parse_holiday(raw: &str) -> Result<NaiveDate, ConfigError> {
    let trimmed = raw.trim();
    // chrono accepts unpadded fields; holidays must be canonical.
    if trimmed.len() != 10 {
        return Err(ConfigError::InvalidHoliday {
            raw: raw.to_string(),
        });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ConfigError::InvalidHoliday {
        raw: raw.to_string(),
    })
}

fn parse_time_of_day(raw: &str) -> Result<NaiveTime, ConfigError> {
    let trimmed = raw.trim();
    NaiveTime::parse_from_str(trimmed, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M:%S"))
        .map_err(|_| ConfigError::InvalidTime {
            raw: raw.to_string(),
        })
}

const fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}

fn default_day_start() -> String {
    "08:00".to_string()
}

fn default_day_end() -> String {
    "17:00".to_string()
}

fn default_holidays() -> Vec<String> {
    DEFAULT_HOLIDAYS.iter().map(ToString::to_string).collect()
}
