//! Sending exported SysEx to the pedal
//!
//! The default transport shells out to ALSA's `amidi`, which handles the
//! inter-message throttling the Pacer needs (`--sysex-interval`). With the
//! `direct-midi` feature, frames can also be sent through midir.

mod amidi;
#[cfg(feature = "direct-midi")]
mod direct;

pub use amidi::{find_port, list_amidi_ports, parse_amidi_ports, AmidiPort, AmidiSender};
#[cfg(feature = "direct-midi")]
pub use direct::{list_output_ports, DirectSender};

/// Error type for transport operations
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("amidi not found - install the alsa-utils package")]
    AmidiNotFound,

    #[error("amidi timed out after {0} s")]
    Timeout(u64),

    #[error("amidi failed: {0}")]
    Failed(String),

    #[error("No MIDI port found matching: {0}")]
    NoPort(String),

    #[error("MIDI output error: {0}")]
    Output(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Something that can deliver a concatenated SysEx stream to the pedal
pub trait SysexSender {
    /// Human-readable destination (port name) for logs and reports
    fn destination(&self) -> &str;

    /// Send the stream, honouring the configured inter-message delay
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;
}

/// Normalize a MIDI port name by removing hardware-specific identifiers
///
/// Port names include IDs that change between systems/reconnections:
///
/// 1. Bracketed hardware IDs: `[hw:3,0,0]`
/// 2. ALSA sequencer client:port IDs: trailing `28:0` or `20:0`
///
/// Examples:
/// - "PACER MIDI 1 [hw:3,0,0]" -> "PACER MIDI 1"
/// - "PACER:PACER MIDI 1 28:0" -> "PACER:PACER MIDI 1"
pub fn normalize_port_name(name: &str) -> String {
    let mut result = name.trim();

    if let Some(bracket_pos) = result.rfind('[') {
        result = result[..bracket_pos].trim();
    }

    // Trailing "digits:digits"
    if let Some(last_space) = result.rfind(' ') {
        let suffix = &result[last_space + 1..];
        if let Some((client, port)) = suffix.split_once(':') {
            let is_id = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
            if is_id(client) && is_id(port) {
                result = result[..last_space].trim();
            }
        }
    }

    result.to_string()
}

/// Case-insensitive substring match of `device_name` against a port name
///
/// Both sides are normalized to ignore hardware ID differences.
pub fn port_matches(port_name: &str, device_name: &str) -> bool {
    let pattern = normalize_port_name(device_name).to_lowercase();
    !pattern.is_empty()
        && normalize_port_name(port_name)
            .to_lowercase()
            .contains(&pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_port_name() {
        assert_eq!(normalize_port_name("PACER MIDI 1 [hw:3,0,0]"), "PACER MIDI 1");
        assert_eq!(
            normalize_port_name("PACER:PACER MIDI 1 28:0"),
            "PACER:PACER MIDI 1"
        );
        assert_eq!(
            normalize_port_name("Midi Through:Midi Through Port-0 14:0"),
            "Midi Through:Midi Through Port-0"
        );
        assert_eq!(normalize_port_name("  Padded Name  "), "Padded Name");
        assert_eq!(normalize_port_name("Ratio 3:2"), "Ratio");
        assert_eq!(normalize_port_name("Mode a:2"), "Mode a:2");
        assert_eq!(normalize_port_name(""), "");
        assert_eq!(normalize_port_name("[only brackets]"), "");
    }

    #[test]
    fn test_port_matches() {
        assert!(port_matches("PACER MIDI 1", "PACER"));
        assert!(port_matches("Nektar Pacer:Nektar Pacer MIDI 1 20:0", "pacer"));
        assert!(port_matches("PACER MIDI 1 [hw:1,0,0]", "pacer midi 1"));
        assert!(!port_matches("Arturia MicroFreak", "PACER"));
        assert!(!port_matches("PACER MIDI 1", ""));
    }
}
