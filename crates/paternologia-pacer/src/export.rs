//! Song to `.syx` export
//!
//! A song always exports to exactly 79 frames:
//! 1 preset name + 6 buttons × (1 mode + 6 steps + 6 LEDs).

use crate::constants::{preset_index, CONTROL_MODE_ALL_STEPS, STOMPSWITCHES, SYSEX_END};
use crate::grid::ButtonGrid;
use crate::mapping::{action_to_midi, build_device_channel_map, MappingError, MidiStep};
use crate::protocol::ProtocolConfig;
use crate::sysex::{LedStep, PacerSysExBuilder};
use paternologia_core::{Device, Song};

/// Number of frames in every export
pub const FRAMES_PER_EXPORT: usize = 1 + STOMPSWITCHES.len() * (1 + 6 + 6);

/// Error type for song export
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExportError {
    #[error("Unknown preset: {0}. Valid: CURRENT, A1-D6")]
    UnknownPreset(String),

    #[error("Button {button} step {step}: {source}")]
    Mapping {
        button: usize,
        step: usize,
        #[source]
        source: MappingError,
    },
}

/// Encoded song ready to be written or sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyxExport {
    /// Song id the export was made from
    pub song_id: String,
    /// Normalised (upper-case) target preset name
    pub preset: String,
    /// Concatenated SysEx frames
    pub data: Vec<u8>,
}

impl SyxExport {
    /// Suggested download file name: `<song_id>_<PRESET>.syx`
    pub fn file_name(&self) -> String {
        format!("{}_{}.syx", self.song_id, self.preset)
    }

    /// Iterate over the individual frames (each ending with F7)
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        split_frames(&self.data)
    }
}

/// Split a concatenated SysEx stream into frames at each F7
pub fn split_frames(data: &[u8]) -> impl Iterator<Item = &[u8]> {
    data.split_inclusive(|&b| b == SYSEX_END)
}

/// Export a song to a Pacer `.syx` byte stream
///
/// `target_preset` is a slot name (`CURRENT`, `A1`..`D6`, case-insensitive).
/// Devices only provide the id → MIDI channel mapping; actions on unknown
/// devices go out on channel 0.
pub fn export_song_to_syx(
    song: &Song,
    devices: &[Device],
    target_preset: &str,
    protocol: &ProtocolConfig,
) -> Result<Vec<u8>, ExportError> {
    let preset = preset_index(target_preset)
        .ok_or_else(|| ExportError::UnknownPreset(target_preset.to_string()))?;
    let builder = PacerSysExBuilder::new(preset);
    let channel_map = build_device_channel_map(devices);
    let grid = ButtonGrid::from_song(song);

    let mut frames: Vec<Vec<u8>> = Vec::with_capacity(FRAMES_PER_EXPORT);

    // 1. Preset name
    frames.push(builder.build_preset_name(&song.song.name));

    // 2. Footswitches SW1-SW6, always all six
    for (btn_idx, (button, &control_id)) in grid.buttons.iter().zip(&STOMPSWITCHES).enumerate() {
        // Mode must precede the steps
        frames.push(builder.build_control_mode(control_id, CONTROL_MODE_ALL_STEPS));

        // Unused steps are cleared explicitly so nothing stale survives on the pedal
        for (step_idx, action) in button.steps.iter().enumerate() {
            let step_number = (step_idx + 1) as u8;
            let frame = match action {
                Some(action) => {
                    let step = action_to_midi(action, &channel_map, protocol).map_err(
                        |source| ExportError::Mapping {
                            button: btn_idx + 1,
                            step: step_idx + 1,
                            source,
                        },
                    )?;
                    builder.build_control_step(control_id, step_number, &step, true)
                }
                None => builder.build_control_step(control_id, step_number, &MidiStep::OFF, false),
            };
            frames.push(frame);
        }

        let colors = if button.has_actions() {
            protocol.assigned_leds
        } else {
            protocol.empty_leds
        };
        let led = LedStep::new(colors);
        for step_idx in 0..button.steps.len() {
            frames.push(builder.build_control_led(control_id, (step_idx + 1) as u8, &led));
        }
    }

    debug_assert_eq!(frames.len(), FRAMES_PER_EXPORT);
    let data = frames.concat();
    log::debug!(
        "export_song_to_syx: '{}' -> preset {} ({}), {} frames, {} bytes",
        song.song.id,
        target_preset.to_uppercase(),
        preset,
        frames.len(),
        data.len()
    );
    Ok(data)
}

/// Export a song to the given preset, or to the song's own default preset
pub fn export_song(
    song: &Song,
    devices: &[Device],
    target_preset: Option<&str>,
    protocol: &ProtocolConfig,
) -> Result<SyxExport, ExportError> {
    let preset = target_preset
        .unwrap_or(&song.song.pacer_export.target_preset)
        .trim()
        .to_uppercase();
    let data = export_song_to_syx(song, devices, &preset, protocol)?;
    Ok(SyxExport {
        song_id: song.song.id.clone(),
        preset,
        data,
    })
}
