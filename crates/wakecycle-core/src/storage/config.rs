//! TOML-based application configuration.
//!
//! Stores:
//! - Engine constants (default offset, sleep cycle, tolerance, wheel step)
//! - Confirm behaviour
//! - The fixed calendar region
//! - Picker label language
//!
//! Configuration is stored at `~/.config/wakecycle/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::cycle::{CyclePolicy, DEFAULT_CYCLE_SECS, DEFAULT_TOLERANCE_SECS, ONE_DAY_SECS};
use crate::error::{ConfigError, Result};
use crate::region::{CalendarRegion, DEFAULT_TIME_ZONE};
use crate::rounding::DEFAULT_WHEEL_STEP_MINUTES;
use crate::state::{ConfirmBehavior, EngineSettings, DEFAULT_OFFSET_SECS};
use crate::wheel::PickerLanguage;

/// Engine constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_offset_secs")]
    pub default_offset_secs: i64,
    #[serde(default = "default_cycle_secs")]
    pub cycle_secs: i64,
    #[serde(default = "default_tolerance_secs")]
    pub tolerance_secs: i64,
    #[serde(default = "default_wheel_step_minutes")]
    pub wheel_step_minutes: u32,
    #[serde(default = "default_one_day_secs")]
    pub one_day_secs: i64,
    #[serde(default)]
    pub confirm: ConfirmBehavior,
}

/// Calendar region configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionConfig {
    #[serde(default = "default_time_zone")]
    pub time_zone: String,
}

/// Picker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickerConfig {
    #[serde(default)]
    pub language: PickerLanguage,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/wakecycle/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub region: RegionConfig,
    #[serde(default)]
    pub picker: PickerConfig,
}

// Default functions
fn default_offset_secs() -> i64 {
    DEFAULT_OFFSET_SECS
}
fn default_cycle_secs() -> i64 {
    DEFAULT_CYCLE_SECS
}
fn default_tolerance_secs() -> i64 {
    DEFAULT_TOLERANCE_SECS
}
fn default_wheel_step_minutes() -> u32 {
    DEFAULT_WHEEL_STEP_MINUTES
}
fn default_one_day_secs() -> i64 {
    ONE_DAY_SECS
}
fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.into()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_offset_secs: default_offset_secs(),
            cycle_secs: default_cycle_secs(),
            tolerance_secs: default_tolerance_secs(),
            wheel_step_minutes: default_wheel_step_minutes(),
            one_day_secs: default_one_day_secs(),
            confirm: ConfirmBehavior::default(),
        }
    }
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            time_zone: default_time_zone(),
        }
    }
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.into(),
        message: message.into(),
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(key, e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => value
                        .parse::<i64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(key, format!("cannot parse '{value}' as integer")))?,
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, writing defaults");
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by key without saving. The result must validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value cannot be parsed
    /// or fails validation.
    pub fn update(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let next: Config = serde_json::from_value(json)
            .map_err(|e| invalid(key, e.to_string()))?;
        next.validate()?;
        *self = next;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.update(key, value)?;
        self.save()
    }

    /// Check engine constants and the region name.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let e = &self.engine;
        if e.cycle_secs <= 0 {
            return Err(invalid("engine.cycle_secs", "must be positive"));
        }
        if e.tolerance_secs < 0 || e.tolerance_secs > e.cycle_secs / 2 {
            return Err(invalid(
                "engine.tolerance_secs",
                format!("must be within 0..={}", e.cycle_secs / 2),
            ));
        }
        if e.wheel_step_minutes == 0 || 60 % e.wheel_step_minutes != 0 {
            return Err(invalid("engine.wheel_step_minutes", "must divide 60"));
        }
        if e.one_day_secs <= 0 {
            return Err(invalid("engine.one_day_secs", "must be positive"));
        }
        if e.default_offset_secs < 0 {
            return Err(invalid("engine.default_offset_secs", "must not be negative"));
        }
        CalendarRegion::from_name(&self.region.time_zone)?;
        Ok(())
    }

    /// Resolve validated engine settings.
    pub fn engine_settings(&self) -> Result<EngineSettings, ConfigError> {
        self.validate()?;
        Ok(EngineSettings {
            default_offset_secs: self.engine.default_offset_secs,
            one_day_secs: self.engine.one_day_secs,
            cycle: CyclePolicy {
                cycle_secs: self.engine.cycle_secs,
                tolerance_secs: self.engine.tolerance_secs,
            },
            wheel_step_minutes: self.engine.wheel_step_minutes,
            confirm: self.engine.confirm,
            region: CalendarRegion::from_name(&self.region.time_zone)?,
        })
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.engine.cycle_secs, 5400);
        assert_eq!(parsed.region.time_zone, "Asia/Seoul");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let cfg: Config = toml::from_str("[engine]\ncycle_secs = 6000\n").unwrap();
        assert_eq!(cfg.engine.cycle_secs, 6000);
        assert_eq!(cfg.engine.tolerance_secs, 600);
        assert_eq!(cfg.picker.language, PickerLanguage::En);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("engine.default_offset_secs").as_deref(), Some("21600"));
        assert_eq!(cfg.get("engine.confirm").as_deref(), Some("commit_selection"));
        assert_eq!(cfg.get("picker.language").as_deref(), Some("en"));
        assert!(cfg.get("engine.missing_key").is_none());
    }

    #[test]
    fn update_changes_nested_values() {
        let mut cfg = Config::default();
        cfg.update("engine.tolerance_secs", "300").unwrap();
        cfg.update("engine.confirm", "reset_to_default").unwrap();
        cfg.update("picker.language", "ko").unwrap();
        assert_eq!(cfg.engine.tolerance_secs, 300);
        assert_eq!(cfg.engine.confirm, ConfirmBehavior::ResetToDefault);
        assert_eq!(cfg.picker.language, PickerLanguage::Ko);
    }

    #[test]
    fn update_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(cfg.update("engine.nonexistent", "1").is_err());
        assert!(cfg.update("", "1").is_err());
    }

    #[test]
    fn update_rejects_invalid_values() {
        let mut cfg = Config::default();
        assert!(cfg.update("engine.cycle_secs", "ninety").is_err());
        assert!(cfg.update("engine.wheel_step_minutes", "7").is_err());
        assert!(cfg.update("engine.tolerance_secs", "4000").is_err());
        assert!(cfg.update("engine.confirm", "maybe").is_err());
        assert!(cfg.update("region.time_zone", "Nowhere/Land").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn engine_settings_follow_config() {
        let mut cfg = Config::default();
        cfg.update("region.time_zone", "Europe/Berlin").unwrap();
        cfg.update("engine.wheel_step_minutes", "15").unwrap();
        let settings = cfg.engine_settings().unwrap();
        assert_eq!(settings.region.name(), "Europe/Berlin");
        assert_eq!(settings.wheel_step_minutes, 15);
        assert_eq!(settings.cycle, CyclePolicy::default());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let mut changed = cfg.clone();
        changed.update("engine.default_offset_secs", "27000").unwrap();
        changed.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), changed);
    }

    #[test]
    fn load_from_reports_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "engine = 3").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
