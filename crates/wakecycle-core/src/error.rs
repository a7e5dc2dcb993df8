//! Core error types for wakecycle-core.
//!
//! Calendar failures are the only errors the engine itself can produce;
//! everything else comes from loading and saving configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wakecycle-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Region-pinned calendar composition failed
    #[error("Calendar error: {0}")]
    Calendar(#[from] CalendarError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Failures while composing an absolute instant in the fixed region.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// The region calendar has no "next day" for the given date
    #[error("cannot resolve the day after {date} in {zone}")]
    UnresolvableDate { date: chrono::NaiveDate, zone: String },

    /// Wall-clock fields are out of range
    #[error("invalid time of day {hour:02}:{minute:02}")]
    InvalidTimeOfDay { hour: u32, minute: u32 },

    /// The local time falls into a gap (e.g. a DST transition) in the region
    #[error("local time {local} does not exist in {zone}")]
    NonexistentLocalTime {
        local: chrono::NaiveDateTime,
        zone: String,
    },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
