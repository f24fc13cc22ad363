//! Path utilities for paternologia data files
//!
//! Provides the standard location of the data directory holding
//! `devices.yaml`, `pacer.yaml` and the `songs/` folder.

use std::path::PathBuf;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "PATERNOLOGIA_DATA_DIR";

/// Get the default data directory
///
/// Returns `$PATERNOLOGIA_DATA_DIR` when set, otherwise
/// `<platform data dir>/paternologia` (e.g. `~/.local/share/paternologia`).
pub fn default_data_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paternologia")
}

/// Get the default path of a config file in the data directory
///
/// # Arguments
/// * `filename` - Config file name (e.g., "pacer.yaml")
pub fn default_config_path(filename: &str) -> PathBuf {
    default_data_dir().join(filename)
}
