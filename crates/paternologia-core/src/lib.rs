//! Paternologia Core - song and device model shared by the Pacer exporter and the CLI
//!
//! This crate provides:
//! - The declarative song model (songs, Pacer buttons, MIDI actions, devices)
//! - Validation rules mirroring what the pedal can actually store
//! - YAML-backed storage for devices and songs, plus generic YAML config I/O
//! - Preset slot naming for the pedal's onboard memory

pub mod config;
pub mod models;
pub mod slots;
pub mod storage;

pub use models::{
    Action, ActionType, ActionValue, Device, DevicesConfig, ModelError, PacerButton,
    PacerExportSettings, Song, SongMetadata,
};
pub use slots::{preset_index, BUTTON_COUNT, PRESET_SLOTS, STEP_COUNT};
pub use storage::Storage;
