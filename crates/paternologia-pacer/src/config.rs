//! Pacer transport configuration schema and loader
//!
//! Stored as YAML next to the song data.
//! Default location: `<data dir>/pacer.yaml`

use crate::protocol::ProtocolConfig;
use anyhow::Context;
use paternologia_core::config::{default_config_path, load_config, read_yaml, save_config};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Allowed range for the amidi timeout in seconds
pub const TIMEOUT_RANGE: std::ops::RangeInclusive<u64> = 1..=30;

/// Error type for invalid Pacer configuration values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PacerConfigError {
    #[error("amidi_timeout_seconds must be 1-30, got: {0}")]
    InvalidTimeout(u64),

    #[error("device_name must not be empty")]
    EmptyDeviceName,

    #[error("protocol.{field} must be 0-127, got: {value}")]
    InvalidLedColor { field: &'static str, value: u8 },
}

/// Root Pacer configuration (`pacer.yaml`)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PacerConfig {
    /// Port name substring used to find the pedal (case-insensitive)
    pub device_name: String,

    /// Explicit amidi port (e.g. "hw:2,0,0"); discovered from `device_name` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amidi_port: Option<String>,

    /// Upper bound for one amidi run
    pub amidi_timeout_seconds: u64,

    /// Delay between SysEx messages; the pedal drops messages sent faster
    pub sysex_interval_ms: u64,

    /// Protocol variant and LED colors
    pub protocol: ProtocolConfig,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            device_name: "PACER".to_string(),
            amidi_port: None,
            amidi_timeout_seconds: 5,
            sysex_interval_ms: 20,
            protocol: ProtocolConfig::default(),
        }
    }
}

impl PacerConfig {
    pub fn validate(&self) -> Result<(), PacerConfigError> {
        if !TIMEOUT_RANGE.contains(&self.amidi_timeout_seconds) {
            return Err(PacerConfigError::InvalidTimeout(self.amidi_timeout_seconds));
        }
        if self.device_name.trim().is_empty() {
            return Err(PacerConfigError::EmptyDeviceName);
        }

        // Colors go into SysEx data bytes verbatim
        let protocol = &self.protocol;
        let colors = [
            ("assigned_leds.active", protocol.assigned_leds.active),
            ("assigned_leds.inactive", protocol.assigned_leds.inactive),
            ("empty_leds.active", protocol.empty_leds.active),
            ("empty_leds.inactive", protocol.empty_leds.inactive),
        ];
        for (field, value) in colors {
            if value > 0x7F {
                return Err(PacerConfigError::InvalidLedColor { field, value });
            }
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.amidi_timeout_seconds)
    }

    pub fn sysex_interval(&self) -> Duration {
        Duration::from_millis(self.sysex_interval_ms)
    }
}

/// Get the default Pacer config file path
pub fn default_pacer_config_path() -> PathBuf {
    default_config_path("pacer.yaml")
}

/// Load Pacer configuration from a YAML file
///
/// Missing or unparseable files give the default config. A file that parses
/// but holds invalid values is reported and replaced by defaults as well.
pub fn load_pacer_config(path: &Path) -> PacerConfig {
    let config: PacerConfig = load_config(path);
    match config.validate() {
        Ok(()) => {
            log::info!(
                "load_pacer_config: device '{}', port {:?}, interval {} ms",
                config.device_name,
                config.amidi_port,
                config.sysex_interval_ms
            );
            config
        }
        Err(e) => {
            log::warn!("load_pacer_config: {}, using defaults", e);
            PacerConfig::default()
        }
    }
}

/// Read Pacer configuration strictly
///
/// Returns `Ok(None)` if the file doesn't exist. Unparseable files and
/// invalid values are errors, so nothing reaches the pedal on a guess.
pub fn read_pacer_config(path: &Path) -> anyhow::Result<Option<PacerConfig>> {
    let Some(config) = read_yaml::<PacerConfig>(path)? else {
        return Ok(None);
    };
    config
        .validate()
        .with_context(|| format!("Invalid Pacer config in {:?}", path))?;
    Ok(Some(config))
}

/// Save Pacer configuration to a YAML file
pub fn save_pacer_config(config: &PacerConfig, path: &Path) -> anyhow::Result<()> {
    config.validate()?;
    save_config(config, path)
}
