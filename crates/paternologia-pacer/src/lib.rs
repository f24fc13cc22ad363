//! Nektar Pacer support for paternologia songs
//!
//! This crate provides:
//! - Action → footswitch step mapping (program change, pattern, CC, note)
//! - SysEx frame building with the Pacer's checksum and parameter layout
//! - Whole-song export to a `.syx` stream (always 79 frames)
//! - Transport to the pedal via `amidi` (or midir with `direct-midi`)
//!
//! # Architecture
//!
//! ```text
//! Song + Devices → ButtonGrid → action_to_midi → PacerSysExBuilder → .syx bytes → SysexSender
//! ```
//!
//! Encoding is pure and synchronous. Only the transport touches the outside
//! world.

pub mod constants;

mod config;
mod export;
mod grid;
mod mapping;
mod notes;
mod protocol;
mod sysex;
mod transport;

pub use config::{
    default_pacer_config_path, load_pacer_config, read_pacer_config, save_pacer_config, PacerConfig,
    PacerConfigError, TIMEOUT_RANGE,
};
pub use export::{
    export_song, export_song_to_syx, split_frames, ExportError, SyxExport, FRAMES_PER_EXPORT,
};
pub use grid::{ButtonGrid, ButtonSlot};
pub use mapping::{
    action_to_midi, build_device_channel_map, get_device_channel, pattern_to_program,
    ChannelMap, MappingError, MidiStep,
};
pub use notes::{note_to_midi, InvalidNoteError};
pub use protocol::{CcStyle, LedColors, ProgramChangeStyle, ProtocolConfig};
pub use sysex::{checksum, LedStep, PacerSysExBuilder};
pub use transport::{
    find_port, list_amidi_ports, normalize_port_name, parse_amidi_ports, port_matches,
    AmidiPort, AmidiSender, SysexSender, TransportError,
};
#[cfg(feature = "direct-midi")]
pub use transport::{list_output_ports, DirectSender};
