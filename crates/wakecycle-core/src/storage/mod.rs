mod config;

pub use config::{Config, EngineConfig, PickerConfig, RegionConfig};

use std::path::PathBuf;

/// Returns `~/.config/wakecycle[-dev]/` based on WAKECYCLE_ENV.
///
/// Set WAKECYCLE_ENV=dev to use development data directory.
/// Set WAKECYCLE_HOME to use an explicit directory instead.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("WAKECYCLE_HOME") {
        Some(home) => PathBuf::from(home),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("WAKECYCLE_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("wakecycle-dev")
            } else {
                base_dir.join("wakecycle")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
