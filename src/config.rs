//! # Spooler Configuration
//!
//! Loaded from a TOML file (`printer.toml` by default). Every section is
//! optional and falls back to its defaults.
//!
//! ## Example
//!
//! ```toml
//! [printer]
//! name = "office"
//! ink = 3
//!
//! [output]
//! format = "json"
//!
//! [logging]
//! level = "debug"
//! ```
//!
//! `ink` must be a non-negative integer. A float or string fails to decode,
//! a negative value fails [`Config::validate`].

// src/config.rs - Printer, output and logging settings from TOML
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid configuration: {0}")]
    Validation(String),
    #[error(transparent)]
    Ink(#[from] crate::printer::PrinterError),
}

/// Main configuration struct for the printer, output and logging.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub printer: PrinterConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Printer-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrinterConfig {
    #[serde(default = "default_printer_name")]
    pub name: String,
    /// Initial ink units. Kept signed so a negative value in the file is
    /// reported as a validation error instead of a decode error.
    #[serde(default = "default_ink")]
    pub ink: i64,
}

impl Default for PrinterConfig {
    fn default() -> Self {
        Self {
            name: default_printer_name(),
            ink: default_ink(),
        }
    }
}

impl PrinterConfig {
    pub fn validate(&self) -> Result<u64, ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Validation("Printer name cannot be empty".to_string()));
        }
        u64::try_from(self.ink).map_err(|_| {
            ConfigError::Validation(format!("Ink must be a non-negative integer, got {}", self.ink))
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One printed page per line.
    #[default]
    Plain,
    /// Printed pages followed by a JSON status line.
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
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

impl LoggingConfig {
    pub fn max_level(&self) -> Result<tracing::Level, ConfigError> {
        parse_log_level(&self.level)
    }
}

pub fn parse_log_level(level: &str) -> Result<tracing::Level, ConfigError> {
    tracing::Level::from_str(level.trim())
        .map_err(|_| ConfigError::Validation(format!("Unknown log level '{}'", level)))
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.printer.validate()?;
        self.logging.max_level()?;
        Ok(())
    }
}

// Default value functions
fn default_printer_name() -> String { "printer".to_string() }
fn default_ink() -> i64 { 0 }
fn default_log_level() -> String { "info".to_string() }

pub fn parse_config(contents: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(contents)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &str) -> Result<Config, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => match parse_config(&contents) {
            Ok(config) => {
                tracing::info!("Loaded configuration from {}", path);
                Ok(config)
            }
            Err(e) => {
                tracing::error!("Failed to load config '{}': {}", path, e);
                Err(e)
            }
        },
        Err(e) => {
            tracing::error!("Failed to read config file '{}': {}", path, e);
            Err(ConfigError::Io(e))
        }
    }
}
