use std::fs;
use std::path::{Path, PathBuf};

use chrono::{FixedOffset, NaiveDate};
use serde::Deserialize;
use studyquest_core::core_api::{
    DEFAULT_ESSAY_TARGET, DEFAULT_MAX_HP, DEFAULT_ZHONGHUI_TARGET, StateDefaults,
};
use studyquest_render::{DEFAULT_BAR_WIDTH, DEFAULT_UTC_OFFSET, MAX_BAR_WIDTH, parse_utc_offset};
use thiserror::Error;

const APP_DIR: &str = "studyquest";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file '{path}': {source}")]
    ParseError {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config validation failed: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WeeklyTargets {
    pub zhonghui_target: u32,
    pub essay_target: u32,
}

impl Default for WeeklyTargets {
    fn default() -> Self {
        Self {
            zhonghui_target: DEFAULT_ZHONGHUI_TARGET,
            essay_target: DEFAULT_ESSAY_TARGET,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub title: String,
    pub player: String,
    /// Fixed offset used for every displayed timestamp, e.g. `+08:00`.
    pub utc_offset: String,
    /// When set, the title carries a `D-n` countdown to this date.
    pub exam_date: Option<NaiveDate>,
    /// Literal label that wins over the computed countdown.
    pub countdown_label: Option<String>,
    pub export_prefix: String,
    pub export_dir: Option<PathBuf>,
    pub state_path: Option<PathBuf>,
    pub bar_width: usize,
    pub starting_level: u32,
    pub max_hp: u32,
    pub weekly: WeeklyTargets,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title: "StudyQuest".to_string(),
            player: "Player".to_string(),
            utc_offset: DEFAULT_UTC_OFFSET.to_string(),
            exam_date: None,
            countdown_label: None,
            export_prefix: "StudyQuest_Permanent_Save".to_string(),
            export_dir: None,
            state_path: None,
            bar_width: DEFAULT_BAR_WIDTH,
            starting_level: 1,
            max_hp: DEFAULT_MAX_HP,
            weekly: WeeklyTargets::default(),
        }
    }
}

impl Config {
    /// `~/.config/studyquest/config.toml` on Linux, the platform equivalent
    /// elsewhere, or the current directory when none is known.
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        config_dir.join(APP_DIR).join("config.toml")
    }

    pub fn default_state_path() -> PathBuf {
        let data_dir = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        data_dir.join(APP_DIR).join("state.json")
    }

    /// Missing file means defaults; anything unreadable or invalid is an
    /// error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            log::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_utc_offset(&self.utc_offset)
            .map_err(|message| ConfigError::ValidationError { message })?;

        if self.bar_width == 0 || self.bar_width > MAX_BAR_WIDTH {
            return Err(ConfigError::ValidationError {
                message: format!("bar_width must be between 1 and {MAX_BAR_WIDTH}"),
            });
        }
        if self.max_hp == 0 {
            return Err(ConfigError::ValidationError {
                message: "max_hp must be positive".to_string(),
            });
        }
        if self.starting_level == 0 {
            return Err(ConfigError::ValidationError {
                message: "starting_level must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    pub fn offset(&self) -> FixedOffset {
        parse_utc_offset(&self.utc_offset).unwrap_or_else(|_| {
            parse_utc_offset(DEFAULT_UTC_OFFSET).expect("default offset is well formed")
        })
    }

    pub fn state_defaults(&self) -> StateDefaults {
        StateDefaults {
            starting_level: self.starting_level,
            max_hp: self.max_hp,
            zhonghui_target: self.weekly.zhonghui_target,
            essay_target: self.weekly.essay_target,
        }
    }
}
