//! Generic configuration I/O utilities
//!
//! Provides YAML loading and saving that works with any serializable type.
//! `load_config` is lenient (settings files), `read_yaml` is strict (data files).

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Load configuration from a YAML file
///
/// If the file doesn't exist, returns default config.
/// If the file exists but is invalid, logs a warning and returns default config.
///
/// ```ignore
/// let config: PacerConfig = load_config(&Path::new("pacer.yaml"));
/// ```
pub fn load_config<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    log::info!("load_config: Loading from {:?}", path);

    match read_yaml::<T>(path) {
        Ok(Some(config)) => {
            log::info!("load_config: Successfully loaded config from {:?}", path);
            config
        }
        Ok(None) => {
            log::info!("load_config: Config file doesn't exist, using defaults");
            T::default()
        }
        Err(e) => {
            log::warn!("load_config: {:#}, using defaults", e);
            T::default()
        }
    }
}

/// Read a YAML file, failing on unreadable or malformed content
///
/// Returns `Ok(None)` if the file doesn't exist or is empty.
pub fn read_yaml<T>(path: &Path) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    if !path.exists() {
        return Ok(None);
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {:?}", path))?;
    if contents.trim().is_empty() {
        return Ok(None);
    }

    let value = serde_yaml::from_str::<T>(&contents)
        .with_context(|| format!("Failed to parse YAML: {:?}", path))?;
    Ok(Some(value))
}

/// Save configuration to a YAML file
///
/// Creates parent directories if they don't exist.
///
/// ```ignore
/// save_config(&config, &Path::new("pacer.yaml"))?;
/// ```
pub fn save_config<T>(config: &T, path: &Path) -> Result<()>
where
    T: Serialize,
{
    log::debug!("save_config: Saving to {:?}", path);

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let yaml = serde_yaml::to_string(config).context("Failed to serialize to YAML")?;

    std::fs::write(path, yaml).with_context(|| format!("Failed to write file: {:?}", path))?;

    log::debug!("save_config: Saved {:?}", path);
    Ok(())
}
