//! CLI configuration.
//!
//! All settings live in a single `config.toml` file at
//! `~/.config/calsnap/config.toml` by default. Every setting has a
//! command-line or environment override; the file only pins defaults.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the calsnap CLI.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Model alias to use (`google` or `qwen`).
    pub model: Option<String>,

    /// Override for the completions endpoint URL.
    pub base_url: Option<String>,

    /// API key for the completion service. Prefer the
    /// `OPENROUTER_API_KEY` environment variable over storing it here.
    pub api_key: Option<String>,

    /// Where extracted events are stored between commands.
    pub events_path: Option<PathBuf>,
}

impl CliConfig {
    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, String> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loads configuration from a specific path.
    pub fn load_from(path: &PathBuf) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("failed to read config: {}", e))?;
        toml::from_str(&content).map_err(|e| format!("failed to parse config: {}", e))
    }

    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        Self::default_config_dir().join("config.toml")
    }

    /// Returns the default configuration directory.
    pub fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("calsnap")
    }

    /// Returns the path of the stored-events file.
    pub fn events_path(&self) -> PathBuf {
        self.events_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("calsnap")
                .join("events.json")
        })
    }
}
