use clap::Subcommand;
use wakecycle_core::storage::data_dir;
use wakecycle_core::{Config, ConfigError};

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one value by dotted key
    Get {
        /// e.g. "engine.cycle_secs", "region.time_zone", "picker.language"
        key: String,
    },
    /// Validate and store one value by dotted key
    Set {
        key: String,
        value: String,
    },
    /// Print the whole config as JSON
    List,
    /// Overwrite the config file with defaults
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Get { key } => {
            let value = Config::load()?
                .get(&key)
                .ok_or(ConfigError::UnknownKey(key))?;
            println!("{value}");
        }
        ConfigAction::Set { key, value } => {
            Config::load()?.set(&key, &value)?;
            tracing::info!(%key, %value, "config updated");
            println!("ok");
        }
        ConfigAction::List => {
            println!("{}", serde_json::to_string_pretty(&Config::load()?)?);
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("reset {}", data_dir()?.join("config.toml").display());
        }
    }
    Ok(())
}
