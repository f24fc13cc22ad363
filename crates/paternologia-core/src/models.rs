//! Song and device model
//!
//! Songs are stored one per YAML file; devices live in a single `devices.yaml`.
//! Each song carries up to six Pacer buttons, each button up to six actions
//! addressed at a device by id.

use crate::slots::{preset_index, BUTTON_COUNT, STEP_COUNT};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Validation error for songs and devices
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ModelError {
    #[error("Device '{device}': MIDI channel {channel} out of range (0-15)")]
    InvalidMidiChannel { device: String, channel: u8 },

    #[error("CC action on '{device}' requires a value (0-127)")]
    MissingCcValue { device: String },

    #[error("CC action on '{device}' value must be 0-127, got: {value}")]
    InvalidCcValue { device: String, value: String },

    #[error("Field '{field}' must be 0-127, got: {value}")]
    OutOfRange { field: &'static str, value: u8 },

    #[error("Button '{button}' has {count} actions (max {max})")]
    TooManyActions {
        button: String,
        count: usize,
        max: usize,
    },

    #[error("Song has {count} buttons (max {max})")]
    TooManyButtons { count: usize, max: usize },

    #[error("Invalid target_preset: {0}. Valid: CURRENT, A1-D6")]
    InvalidPreset(String),
}

/// Kind of MIDI action a Pacer step performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    /// Program change selecting a device preset
    Preset,
    /// Program change selecting a sequencer pattern (e.g. "A01")
    Pattern,
    /// Control change
    Cc,
    /// Note on with velocity
    Note,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preset => "preset",
            Self::Pattern => "pattern",
            Self::Cc => "cc",
            Self::Note => "note",
        };
        f.write_str(name)
    }
}

/// Integer or device-specific string value (`5`, `"A01"`, `"C#4"`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionValue {
    Int(i64),
    Text(String),
}

impl ActionValue {
    /// Integer payload, if this is an integer value
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for ActionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(v) => write!(f, "{}", v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ActionValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<&str> for ActionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// MIDI device definition with supported action types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Unique device identifier, referenced by actions
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Action kinds this device understands
    #[serde(default)]
    pub action_types: Vec<ActionType>,
    /// MIDI channel (0-15)
    #[serde(default)]
    pub midi_channel: u8,
}

impl Device {
    /// Create a device with no description and no declared action types
    pub fn new(id: &str, name: &str, midi_channel: u8) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: String::new(),
            action_types: Vec::new(),
            midi_channel,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.midi_channel > 15 {
            return Err(ModelError::InvalidMidiChannel {
                device: self.id.clone(),
                channel: self.midi_channel,
            });
        }
        Ok(())
    }
}

/// Root structure of `devices.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    pub devices: Vec<Device>,
}

/// Single MIDI action performed by a Pacer button step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Target device id
    pub device: String,

    /// Action kind
    #[serde(rename = "type")]
    pub kind: ActionType,

    /// Preset/program number, pattern id ("A01") or CC value depending on kind
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<ActionValue>,

    /// CC number (cc kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cc: Option<u8>,

    /// Note name or number (note kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<ActionValue>,

    /// Note velocity (note kind)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub velocity: Option<u8>,

    /// Optional display label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Bank select LSB (CC 32), used by bank-select program changes
    #[serde(default)]
    pub bank_lsb: u8,

    /// Bank select MSB (CC 0), used by bank-select program changes
    #[serde(default)]
    pub bank_msb: u8,
}

impl Action {
    fn bare(device: &str, kind: ActionType) -> Self {
        Self {
            device: device.to_string(),
            kind,
            value: None,
            cc: None,
            note: None,
            velocity: None,
            label: None,
            bank_lsb: 0,
            bank_msb: 0,
        }
    }

    /// Preset (program change) action
    pub fn preset(device: &str, program: i64) -> Self {
        Self {
            value: Some(ActionValue::Int(program)),
            ..Self::bare(device, ActionType::Preset)
        }
    }

    /// Pattern action; `pattern` is an id like "A01" or a plain number
    pub fn pattern(device: &str, pattern: impl Into<ActionValue>) -> Self {
        Self {
            value: Some(pattern.into()),
            ..Self::bare(device, ActionType::Pattern)
        }
    }

    /// Control change action
    pub fn cc(device: &str, cc: u8, value: i64) -> Self {
        Self {
            cc: Some(cc),
            value: Some(ActionValue::Int(value)),
            ..Self::bare(device, ActionType::Cc)
        }
    }

    /// Note action; `note` is a name like "C4" or a MIDI note number
    pub fn note(device: &str, note: impl Into<ActionValue>, velocity: Option<u8>) -> Self {
        Self {
            note: Some(note.into()),
            velocity,
            ..Self::bare(device, ActionType::Note)
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.kind == ActionType::Cc {
            match &self.value {
                None => {
                    return Err(ModelError::MissingCcValue {
                        device: self.device.clone(),
                    })
                }
                Some(ActionValue::Int(v)) if (0..=127).contains(v) => {}
                Some(other) => {
                    return Err(ModelError::InvalidCcValue {
                        device: self.device.clone(),
                        value: other.to_string(),
                    })
                }
            }
        }

        let seven_bit = [
            ("bank_lsb", Some(self.bank_lsb)),
            ("bank_msb", Some(self.bank_msb)),
            ("cc", self.cc),
            ("velocity", self.velocity),
        ];
        for (field, value) in seven_bit {
            if let Some(value) = value {
                if value > 127 {
                    return Err(ModelError::OutOfRange { field, value });
                }
            }
        }
        Ok(())
    }
}

/// Pacer footswitch configuration with up to six actions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PacerButton {
    /// Button display name
    pub name: String,
    /// Actions fired by this button, one per step
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl PacerButton {
    pub fn new(name: &str, actions: Vec<Action>) -> Self {
        Self {
            name: name.to_string(),
            actions,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.actions.len() > STEP_COUNT {
            return Err(ModelError::TooManyActions {
                button: self.name.clone(),
                count: self.actions.len(),
                max: STEP_COUNT,
            });
        }
        self.actions.iter().try_for_each(Action::validate)
    }
}

/// Per-song export defaults
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacerExportSettings {
    /// Preset slot the song is written to (CURRENT, A1-D6)
    #[serde(default = "default_target_preset")]
    pub target_preset: String,
}

fn default_target_preset() -> String {
    "A1".to_string()
}

impl Default for PacerExportSettings {
    fn default() -> Self {
        Self {
            target_preset: default_target_preset(),
        }
    }
}

impl PacerExportSettings {
    pub fn validate(&self) -> Result<(), ModelError> {
        if preset_index(&self.target_preset).is_none() {
            return Err(ModelError::InvalidPreset(self.target_preset.clone()));
        }
        Ok(())
    }
}

/// Song metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SongMetadata {
    /// Unique song identifier (file name without extension)
    pub id: String,
    /// Display name, also used as the Pacer preset name
    pub name: String,
    #[serde(default)]
    pub author: String,
    #[serde(default = "today")]
    pub created: NaiveDate,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub pacer_export: PacerExportSettings,
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl SongMetadata {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            author: String::new(),
            created: today(),
            notes: String::new(),
            pacer_export: PacerExportSettings::default(),
        }
    }
}

/// Complete song configuration with Pacer buttons
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub song: SongMetadata,
    #[serde(default)]
    pub pacer: Vec<PacerButton>,
}

impl Song {
    pub fn new(id: &str, name: &str, pacer: Vec<PacerButton>) -> Self {
        Self {
            song: SongMetadata::new(id, name),
            pacer,
        }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        if self.pacer.len() > BUTTON_COUNT {
            return Err(ModelError::TooManyButtons {
                count: self.pacer.len(),
                max: BUTTON_COUNT,
            });
        }
        self.song.pacer_export.validate()?;
        self.pacer.iter().try_for_each(PacerButton::validate)
    }
}
