//! Application service — configuration use-cases.

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::config::DeployConfig;

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the store cannot read or parse the file.
pub fn load_config(store: &impl ConfigStore) -> Result<DeployConfig> {
    store.load()
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the store cannot write the file.
pub fn save_config(store: &impl ConfigStore, config: &DeployConfig) -> Result<()> {
    store.save(config)
}

/// Validate and apply `key = value`, then persist the result.
///
/// The file is left untouched when validation fails.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or the save fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<DeployConfig> {
    let mut config = store.load()?;
    config.set(key, value)?;
    store.save(&config)?;
    Ok(config)
}
