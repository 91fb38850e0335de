//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/notepulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/notepulse/` (~/.config/notepulse/)
//! - State/Logs: `$XDG_STATE_HOME/notepulse/` (~/.local/state/notepulse/)

use crate::error::{Error, Result};
use crate::stats::{parse_interval, StatsRequest, Strategy};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Chart defaults (periods, strategy, modes)
    #[serde(default)]
    pub chart: ChartConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Default chart parameters used when the host does not override them.
#[derive(Debug, Deserialize, Clone)]
pub struct ChartConfig {
    /// `(bucket width, offset from now)` pairs for the variable strategy.
    /// Offsets decrease with the index; the last pair is the window
    /// touching "now".
    #[serde(default = "default_periods")]
    pub periods: Vec<(String, String)>,

    #[serde(default = "default_strategy")]
    pub strategy: Strategy,

    #[serde(default = "default_cumulative")]
    pub cumulative: bool,

    #[serde(default)]
    pub relative_to_recent: bool,

    /// How far back to chart, as an interval string; "0min" disables the
    /// cutoff entirely.
    #[serde(default = "default_recent_window")]
    pub recent_window: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            periods: default_periods(),
            strategy: default_strategy(),
            cumulative: default_cumulative(),
            relative_to_recent: false,
            recent_window: default_recent_window(),
        }
    }
}

impl ChartConfig {
    /// Resolve this config into a [`StatsRequest`], computing the cutoff
    /// from the recent window relative to `now_ms`.
    pub fn to_request(&self, now_ms: i64) -> Result<StatsRequest> {
        let window_ms = parse_interval(&self.recent_window)?;
        let cutoff_ms = if window_ms == 0 { 0 } else { now_ms - window_ms };
        Ok(StatsRequest {
            periods: self.periods.clone(),
            cumulative: self.cumulative,
            relative_to_recent: self.relative_to_recent,
            strategy: self.strategy,
            cutoff_ms,
        })
    }
}

fn default_periods() -> Vec<(String, String)> {
    // Daily buckets up to a week ago, hourly buckets for the last week.
    vec![
        ("1day".to_string(), "1week".to_string()),
        ("1hour".to_string(), "0min".to_string()),
    ]
}

fn default_strategy() -> Strategy {
    Strategy::Variable
}

fn default_cumulative() -> bool {
    true
}

fn default_recent_window() -> String {
    "0min".to_string()
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/notepulse/config.toml` (~/.config/notepulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("notepulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/notepulse/` (~/.local/state/notepulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("notepulse")
    }

    /// Returns the log file path
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("notepulse.log")
    }
}
