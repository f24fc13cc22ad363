//! Nektar Pacer SysEx dialect
//!
//! Frame layout for every message written by this crate:
//!
//! ```text
//! F0 | 00 01 77 | 7F 01 01 <preset> <object> [element] | payload | checksum | F7
//! ```

pub use paternologia_core::slots::{preset_index, BUTTON_COUNT, PRESET_SLOTS, STEP_COUNT};

pub const SYSEX_START: u8 = 0xF0;
pub const SYSEX_END: u8 = 0xF7;

/// Nektar manufacturer id
pub const MANUFACTURER_ID: [u8; 3] = [0x00, 0x01, 0x77];
pub const DEVICE_ID: u8 = 0x7F;

pub const CMD_SET: u8 = 0x01;
pub const TARGET_PRESET: u8 = 0x01;

/// Object id of the preset name
pub const CONTROL_NAME: u8 = 0x01;

/// Object-type byte preceding every parameter value
pub const PARAM_OBJECT: u8 = 0x01;

/// Element id of a control's step-advance mode
pub const CONTROL_MODE_ELEMENT: u8 = 0x60;

/// Mode value: all steps fire at once on a single press
pub const CONTROL_MODE_ALL_STEPS: u8 = 0x00;

/// First LED element (step 1 MIDI ctrl); each step uses 4 elements
pub const LED_ELEMENT_BASE: u8 = 0x40;

/// Object id of footswitch SW1; SW2-SW6 follow consecutively
pub const STOMPSWITCH_BASE: u8 = 0x0D;

/// Control ids of SW1-SW6
pub const STOMPSWITCHES: [u8; BUTTON_COUNT] = [
    STOMPSWITCH_BASE,
    STOMPSWITCH_BASE + 1,
    STOMPSWITCH_BASE + 2,
    STOMPSWITCH_BASE + 3,
    STOMPSWITCH_BASE + 4,
    STOMPSWITCH_BASE + 5,
];

// Step message types
pub const MSG_SW_NOTE: u8 = 0x43;
pub const MSG_SW_PRG_BANK: u8 = 0x45;
pub const MSG_SW_PRG_STEP: u8 = 0x46;
pub const MSG_SW_MIDI_CC: u8 = 0x47;
pub const MSG_SW_MIDI_CC_TGGLE: u8 = 0x48;
/// Step disabled
pub const MSG_CTRL_OFF: u8 = 0x61;

// LED colors
pub const LED_OFF: u8 = 0x00;
pub const LED_RED: u8 = 0x03;
pub const LED_AMBER: u8 = 0x07;
pub const LED_GREEN: u8 = 0x0D;
pub const LED_BLUE: u8 = 0x11;

/// Longest preset name the pedal displays
pub const NAME_MAX_LEN: usize = 8;

/// Substitute for characters outside ASCII in preset names
pub const NAME_PLACEHOLDER: u8 = b'?';
