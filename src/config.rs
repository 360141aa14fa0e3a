//! Configuration file parser for `~/.config/websync/config.toml`.
//!
//! The file is optional: a missing or blank file yields `Config::default()`.
//! Unknown keys are accepted but logged, since they are usually typos.
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file is too large ({0})")]
    TooLarge(String),
}

// ============================================================================
// Configuration
// ============================================================================

/// Top-level application configuration. Every key is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default theme ("dark" or "light"). A theme chosen in the app wins.
    pub theme: String,

    /// Ask before deleting categories/websites and before resetting.
    pub confirm_destructive: bool,

    /// Directory for the JSON storage files. Defaults to the config directory.
    pub data_dir: Option<PathBuf>,

    /// Keybinding overrides: action name -> key string.
    pub keybindings: HashMap<String, String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: "dark".to_string(),
            confirm_destructive: true,
            data_dir: None,
            keybindings: HashMap::new(),
        }
    }
}

impl Config {
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 4] = ["theme", "confirm_destructive", "data_dir", "keybindings"];

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file gives the defaults. Files over 1 MiB, invalid
    /// TOML and wrongly typed values are errors.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let file = match std::fs::File::open(path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        // Read one byte past the limit to detect oversized files
        let mut content = String::new();
        file.take(Self::MAX_FILE_SIZE + 1)
            .read_to_string(&mut content)?;
        if content.len() as u64 > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "more than {} bytes",
                Self::MAX_FILE_SIZE
            )));
        }

        Self::parse(&content, path)
    }

    fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let table: toml::Table = content.parse()?;
        table
            .keys()
            .filter(|key| !Self::KNOWN_KEYS.contains(&key.as_str()))
            .for_each(|key| tracing::warn!(key = %key, path = %path.display(), "Ignoring unknown config key"));

        let config: Config = toml::Value::Table(table).try_into()?;
        tracing::info!(
            path = %path.display(),
            theme = %config.theme,
            confirm_destructive = config.confirm_destructive,
            overrides = config.keybindings.len(),
            "Loaded configuration"
        );
        Ok(config)
    }
}
