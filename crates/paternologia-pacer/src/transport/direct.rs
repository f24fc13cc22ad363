//! Direct MIDI output through midir
//!
//! Sends an export frame by frame with a pause in between, for systems
//! without `amidi` (macOS, Windows).

use super::{port_matches, SysexSender, TransportError};
use crate::config::PacerConfig;
use crate::export::split_frames;
use midir::{MidiOutput, MidiOutputConnection};
use std::time::Duration;

const CLIENT_NAME: &str = "paternologia-out";

/// List available MIDI output port names
pub fn list_output_ports() -> Result<Vec<String>, TransportError> {
    let midi_out =
        MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Output(e.to_string()))?;
    Ok(midi_out
        .ports()
        .iter()
        .filter_map(|p| midi_out.port_name(p).ok())
        .collect())
}

/// Open connection to the pedal
pub struct DirectSender {
    port_name: String,
    connection: MidiOutputConnection,
    sysex_interval: Duration,
}

impl DirectSender {
    /// Connect to the first output port whose name matches `device_name`
    pub fn connect(device_name: &str, sysex_interval: Duration) -> Result<Self, TransportError> {
        let midi_out =
            MidiOutput::new(CLIENT_NAME).map_err(|e| TransportError::Output(e.to_string()))?;

        let ports = midi_out.ports();
        let (port, port_name) = ports
            .iter()
            .find_map(|port| {
                let name = midi_out.port_name(port).ok()?;
                port_matches(&name, device_name).then_some((port, name))
            })
            .ok_or_else(|| TransportError::NoPort(device_name.to_string()))?;

        let connection = midi_out
            .connect(port, "paternologia-output")
            .map_err(|e| TransportError::Output(e.to_string()))?;

        log::info!("DirectSender: connected to {}", port_name);
        Ok(Self {
            port_name,
            connection,
            sysex_interval,
        })
    }

    pub fn from_config(config: &PacerConfig) -> Result<Self, TransportError> {
        Self::connect(&config.device_name, config.sysex_interval())
    }
}

impl SysexSender for DirectSender {
    fn destination(&self) -> &str {
        &self.port_name
    }

    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        let mut count = 0;
        for (i, frame) in split_frames(data).enumerate() {
            if i > 0 {
                std::thread::sleep(self.sysex_interval);
            }
            self.connection
                .send(frame)
                .map_err(|e| TransportError::Output(e.to_string()))?;
            count += 1;
        }
        log::info!(
            "DirectSender: sent {} frames ({} bytes) to {}",
            count,
            data.len(),
            self.port_name
        );
        Ok(())
    }
}
