// File: ./src/config.rs
// Handles configuration loading, saving, and defaults.
use crate::paths::AppPaths;
use anyhow::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;

fn default_agent_bin() -> String {
    "openclaw".to_string()
}
fn default_agent_timeout() -> u64 {
    90
}
fn default_session_prefix() -> String {
    "planera_extract".to_string()
}
fn default_timezone() -> String {
    "Europe/Moscow".to_string()
}
fn default_locale() -> String {
    "ru".to_string()
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct Config {
    /// Binary invoked for delegated extraction. Resolved through PATH when relative.
    #[serde(default = "default_agent_bin")]
    pub agent_bin: String,
    /// Extra arguments appended after the standard `agent` invocation.
    #[serde(default)]
    pub agent_args: Vec<String>,
    #[serde(default = "default_agent_timeout")]
    pub agent_timeout_secs: u64,
    /// Session id prefix; the chat id is appended per call.
    #[serde(default = "default_session_prefix")]
    pub agent_session_prefix: String,
    /// IANA timezone name used when a chat has no timezone of its own.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
    #[serde(default = "default_locale")]
    pub default_locale: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            agent_bin: default_agent_bin(),
            agent_args: Vec::new(),
            agent_timeout_secs: default_agent_timeout(),
            agent_session_prefix: default_session_prefix(),
            default_timezone: default_timezone(),
            default_locale: default_locale(),
        }
    }
}

impl Config {
    /// Load the configuration from disk.
    /// Returns a contextualized error if reading or parsing fails.
    pub fn load() -> Result<Self> {
        let path = AppPaths::get_config_file_path()?;

        // Explicitly detect missing file so callers can fall back to defaults.
        if !path.exists() {
            return Err(anyhow::anyhow!("Config file not found"));
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            anyhow::anyhow!("Failed to read config file '{}': {}", path.display(), e)
        })?;

        let config: Config = toml::from_str(&contents).map_err(|e| {
            anyhow::anyhow!("Failed to parse config file '{}': {}", path.display(), e)
        })?;

        Ok(config)
    }

    /// Helper to detect whether an anyhow::Error indicates a missing config file.
    pub fn is_missing_config_error(err: &Error) -> bool {
        if err.to_string().contains("Config file not found") {
            return true;
        }

        for cause in err.chain() {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>()
                && io_err.kind() == std::io::ErrorKind::NotFound
            {
                return true;
            }
        }

        false
    }

    pub fn save(&self) -> Result<()> {
        let path = AppPaths::get_config_file_path()?;
        let toml_str = toml::to_string_pretty(self)?;
        fs::write(&path, toml_str).map_err(|e| {
            anyhow::anyhow!("Failed to write config file '{}': {}", path.display(), e)
        })?;
        Ok(())
    }
}
