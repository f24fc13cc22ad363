//! Protocol variant selection
//!
//! Pacer firmware accepts two incompatible encodings for program changes and
//! for CC steps. The variant is chosen once, in `ProtocolConfig`, and the
//! same config is handed by reference to the mapper and the exporter.

use crate::constants::{LED_AMBER, LED_BLUE, LED_OFF, MSG_SW_MIDI_CC, MSG_SW_MIDI_CC_TGGLE};
use serde::{Deserialize, Serialize};

/// How PRESET and PATTERN actions are encoded
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProgramChangeStyle {
    /// Program step with start = end = program: `(0, program, program)`
    #[default]
    StepRange,
    /// Program change with bank select: `(program, bank_lsb, bank_msb)`
    BankSelect,
}

/// How CC actions are encoded
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CcStyle {
    /// Value on press, 0 on release
    #[default]
    Trigger,
    /// Alternates between value and 0 on each press
    Toggle,
}

impl CcStyle {
    /// Step message type for this CC style
    pub fn msg_type(self) -> u8 {
        match self {
            Self::Trigger => MSG_SW_MIDI_CC,
            Self::Toggle => MSG_SW_MIDI_CC_TGGLE,
        }
    }
}

/// LED colors for a footswitch
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedColors {
    /// Color while the step is active
    pub active: u8,
    /// Color while the step is inactive
    pub inactive: u8,
}

impl LedColors {
    pub const OFF: LedColors = LedColors {
        active: LED_OFF,
        inactive: LED_OFF,
    };
}

/// Immutable protocol settings shared by mapper, builder and exporter
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProtocolConfig {
    pub program_change: ProgramChangeStyle,
    pub cc: CcStyle,
    /// Whether this firmware accepts NOTE steps
    pub notes: bool,
    /// Colors for buttons that carry at least one action
    pub assigned_leds: LedColors,
    /// Colors for buttons without actions
    pub empty_leds: LedColors,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            program_change: ProgramChangeStyle::default(),
            cc: CcStyle::default(),
            notes: true,
            assigned_leds: LedColors {
                active: LED_BLUE,
                inactive: LED_AMBER,
            },
            empty_leds: LedColors::OFF,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ProtocolConfig::default();
        assert_eq!(config.program_change, ProgramChangeStyle::StepRange);
        assert_eq!(config.cc, CcStyle::Trigger);
        assert!(config.notes);
        assert_eq!(config.empty_leds, LedColors::OFF);
    }

    #[test]
    fn test_yaml_partial_override() {
        let yaml = r#"
program_change: bank_select
cc: toggle
"#;
        let config: ProtocolConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.program_change, ProgramChangeStyle::BankSelect);
        assert_eq!(config.cc, CcStyle::Toggle);
        assert!(config.notes);
        assert_eq!(config.assigned_leds.active, LED_BLUE);
    }

    #[test]
    fn test_cc_style_message_types() {
        assert_eq!(CcStyle::Trigger.msg_type(), MSG_SW_MIDI_CC);
        assert_eq!(CcStyle::Toggle.msg_type(), MSG_SW_MIDI_CC_TGGLE);
    }
}
