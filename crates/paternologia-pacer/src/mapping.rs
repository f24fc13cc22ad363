//! Action to Pacer step mapping
//!
//! Converts one declarative `Action` into the five raw fields of a Pacer
//! control step: message type, MIDI channel and three data bytes.

use crate::constants::{MSG_CTRL_OFF, MSG_SW_NOTE, MSG_SW_PRG_BANK, MSG_SW_PRG_STEP};
use crate::notes::{note_to_midi, InvalidNoteError};
use crate::protocol::{ProgramChangeStyle, ProtocolConfig};
use paternologia_core::{Action, ActionType, ActionValue, Device};
use std::collections::HashMap;

/// Note used when a NOTE action has no note
pub const DEFAULT_NOTE: u8 = 60;
/// Velocity used when a NOTE action has no velocity
pub const DEFAULT_VELOCITY: u8 = 100;
/// CC value sent on press when a CC action has no usable value
pub const DEFAULT_CC_DOWN: u8 = 127;

/// Highest MIDI channel (0-based)
const MAX_CHANNEL: u8 = 15;

/// Device id → MIDI channel lookup
pub type ChannelMap<'a> = HashMap<&'a str, u8>;

/// Error type for action mapping
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MappingError {
    #[error("Unsupported action type: {0}")]
    UnsupportedActionType(ActionType),

    #[error(transparent)]
    InvalidNote(#[from] InvalidNoteError),
}

/// Raw fields of one control step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MidiStep {
    pub msg_type: u8,
    pub channel: u8,
    pub data1: u8,
    pub data2: u8,
    pub data3: u8,
}

impl MidiStep {
    /// Cleared step: control off, all data zero
    pub const OFF: MidiStep = MidiStep {
        msg_type: MSG_CTRL_OFF,
        channel: 0,
        data1: 0,
        data2: 0,
        data3: 0,
    };

    fn new(msg_type: u8, channel: u8, data: [i64; 3]) -> Self {
        Self {
            msg_type,
            channel: channel.min(MAX_CHANNEL),
            data1: data_byte(data[0]),
            data2: data_byte(data[1]),
            data3: data_byte(data[2]),
        }
    }

    /// Fields in protocol order: (msg_type, channel, data1, data2, data3)
    pub fn as_tuple(&self) -> (u8, u8, u8, u8, u8) {
        (self.msg_type, self.channel, self.data1, self.data2, self.data3)
    }
}

/// Clamp into the 7-bit range every SysEx data byte must respect
fn data_byte(value: i64) -> u8 {
    value.clamp(0, 127) as u8
}

/// Build a device id → MIDI channel map
pub fn build_device_channel_map(devices: &[Device]) -> ChannelMap<'_> {
    devices
        .iter()
        .map(|device| (device.id.as_str(), device.midi_channel))
        .collect()
}

/// MIDI channel for a device, channel 0 if the device is unknown
pub fn get_device_channel(device_id: &str, channel_map: &ChannelMap<'_>) -> u8 {
    channel_map.get(device_id).copied().unwrap_or(0)
}

/// Convert a pattern id to a program change number
///
/// Elektron-style ids map bank A-F and pattern 1-16 onto programs 0-95:
/// "A01" → 0, "A16" → 15, "B01" → 16, "F16" → 95. Integers and numeric
/// strings pass through. Anything else maps to 0; this never fails.
pub fn pattern_to_program(value: Option<&ActionValue>) -> i64 {
    match value {
        Some(ActionValue::Int(program)) => *program,
        Some(ActionValue::Text(text)) => parse_pattern_id(text.trim()).unwrap_or(0),
        None => 0,
    }
}

fn parse_pattern_id(text: &str) -> Option<i64> {
    if let Ok(program) = text.parse::<i64>() {
        return Some(program);
    }

    let mut chars = text.chars();
    let letter = chars.next()?.to_ascii_uppercase();
    if !('A'..='F').contains(&letter) {
        return None;
    }
    let bank = (letter as u8 - b'A') as i64;

    let number: i64 = chars.as_str().parse().ok()?;
    let pattern = number - 1;
    if !(0..=15).contains(&pattern) {
        return None;
    }
    Some(bank * 16 + pattern)
}

fn program_change(
    style: ProgramChangeStyle,
    channel: u8,
    program: i64,
    bank: (u8, u8),
) -> MidiStep {
    match style {
        ProgramChangeStyle::StepRange => {
            MidiStep::new(MSG_SW_PRG_STEP, channel, [0, program, program])
        }
        ProgramChangeStyle::BankSelect => MidiStep::new(
            MSG_SW_PRG_BANK,
            channel,
            [program, bank.0 as i64, bank.1 as i64],
        ),
    }
}

/// Convert an action to Pacer control step fields
///
/// Missing or malformed values fall back to safe defaults; only an
/// unsupported action type or an invalid note is an error.
pub fn action_to_midi(
    action: &Action,
    channel_map: &ChannelMap<'_>,
    protocol: &ProtocolConfig,
) -> Result<MidiStep, MappingError> {
    let channel = get_device_channel(&action.device, channel_map);

    let step = match action.kind {
        ActionType::Preset => {
            let program = action.value.as_ref().and_then(ActionValue::as_int).unwrap_or(0);
            program_change(
                protocol.program_change,
                channel,
                program,
                (action.bank_lsb, action.bank_msb),
            )
        }
        ActionType::Pattern => {
            let program = pattern_to_program(action.value.as_ref());
            program_change(protocol.program_change, channel, program, (0, 0))
        }
        ActionType::Cc => {
            let cc = action.cc.unwrap_or(0) as i64;
            let down = action
                .value
                .as_ref()
                .and_then(ActionValue::as_int)
                .unwrap_or(DEFAULT_CC_DOWN as i64);
            MidiStep::new(protocol.cc.msg_type(), channel, [cc, down, 0])
        }
        ActionType::Note => {
            if !protocol.notes {
                return Err(MappingError::UnsupportedActionType(action.kind));
            }
            let note = match &action.note {
                Some(note) => note_to_midi(note)?,
                None => DEFAULT_NOTE,
            };
            let velocity = action.velocity.unwrap_or(DEFAULT_VELOCITY);
            MidiStep::new(MSG_SW_NOTE, channel, [note as i64, velocity as i64, 0])
        }
    };

    log::trace!(
        "action_to_midi: {} on '{}' -> {:02X?}",
        action.kind,
        action.device,
        step.as_tuple()
    );
    Ok(step)
}
