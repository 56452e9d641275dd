// Sender configuration
// Built-in defaults, overridden by an optional RON file, overridden by the environment

use crate::sequencer::note::NoteDefaults;
use crate::sequencer::timing::{DelayError, SettleDelays};
use crate::messaging::command::GENERATED_TRACK_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const HOST_VAR: &str = "ABLETON_HOST";
pub const PORT_VAR: &str = "ABLETON_PORT";
pub const DRY_RUN_VAR: &str = "LIVE_CLIP_SENDER_DRY_RUN";
pub const CONFIG_PATH_VAR: &str = "LIVE_CLIP_SENDER_CONFIG";

const CONFIG_DIR_NAME: &str = "live_clip_sender";
const CONFIG_FILE_NAME: &str = "config.ron";

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Ron {
        path: PathBuf,
        source: ron::error::SpannedError,
    },

    #[error("Invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("Invalid settle delays: {0}")]
    InvalidDelays(#[from] DelayError),
}

/// Everything the sender needs besides the request itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderConfig {
    /// Host running the AbletonOSC listener
    pub host: String,
    pub port: u16,
    /// Name given to target tracks
    pub track_name: String,
    pub delays: SettleDelays,
    pub notes: NoteDefaults,
    /// Log commands instead of sending them
    pub dry_run: bool,
}

impl Default for SenderConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 11000,
            track_name: GENERATED_TRACK_NAME.to_string(),
            delays: SettleDelays::default(),
            notes: NoteDefaults::default(),
            dry_run: false,
        }
    }
}

impl SenderConfig {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(|var| std::env::var(var).ok())
    }

    /// Load using `env` to look up variables
    pub fn load_with(env: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let path = match env(CONFIG_PATH_VAR) {
            Some(path) if !path.trim().is_empty() => Some(PathBuf::from(path)),
            _ => default_config_path().filter(|p| p.is_file()),
        };

        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        config.apply_env(&env)?;
        config.delays.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ron(&text).map_err(|source| ConfigError::Ron {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_ron(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    fn apply_env(&mut self, env: &impl Fn(&str) -> Option<String>) -> Result<(), ConfigError> {
        if let Some(host) = env(HOST_VAR).filter(|h| !h.trim().is_empty()) {
            self.host = host.trim().to_string();
        }
        if let Some(port) = env(PORT_VAR) {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv {
                    var: PORT_VAR,
                    value: port.clone(),
                })?;
        }
        if let Some(flag) = env(DRY_RUN_VAR) {
            self.dry_run = parse_flag(&flag).ok_or(ConfigError::InvalidEnv {
                var: DRY_RUN_VAR,
                value: flag.clone(),
            })?;
        }
        Ok(())
    }
}

/// `<config_dir>/live_clip_sender/config.ron`
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "" | "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
