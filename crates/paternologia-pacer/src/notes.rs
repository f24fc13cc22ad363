//! Note name to MIDI note number conversion
//!
//! Accepts MIDI numbers (`60`, `"60"`) and scientific pitch notation
//! (`"C4"`, `"F#3"`, `"Bb-1"`), where C4 = 60. Unlike pattern ids this parser
//! is strict: anything outside 0-127 or unparseable is an error.

use paternologia_core::ActionValue;

/// Note value that cannot be turned into a MIDI note number
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid note '{input}': {reason}")]
pub struct InvalidNoteError {
    pub input: String,
    pub reason: &'static str,
}

impl InvalidNoteError {
    fn new(input: impl ToString, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

const MIN_OCTAVE: i64 = -1;
const MAX_OCTAVE: i64 = 9;

/// Semitone offset of a natural note within an octave
fn semitone(letter: char) -> Option<i64> {
    match letter.to_ascii_uppercase() {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

fn checked_note(input: impl ToString, number: i64) -> Result<u8, InvalidNoteError> {
    if (0..=127).contains(&number) {
        Ok(number as u8)
    } else {
        Err(InvalidNoteError::new(input, "out of MIDI range 0-127"))
    }
}

/// Convert a note number or note name to a MIDI note number (0-127)
pub fn note_to_midi(value: &ActionValue) -> Result<u8, InvalidNoteError> {
    match value {
        ActionValue::Int(number) => checked_note(number, *number),
        ActionValue::Text(text) => parse_note_name(text),
    }
}

fn parse_note_name(text: &str) -> Result<u8, InvalidNoteError> {
    let trimmed = text.trim();

    if let Ok(number) = trimmed.parse::<i64>() {
        return checked_note(text, number);
    }

    let mut chars = trimmed.chars();
    let base = chars
        .next()
        .and_then(semitone)
        .ok_or_else(|| InvalidNoteError::new(text, "expected note letter A-G"))?;

    let rest = chars.as_str();
    let (offset, octave) = if let Some(octave) = rest.strip_prefix('#') {
        (1, octave)
    } else if let Some(octave) = rest.strip_prefix('b') {
        (-1, octave)
    } else {
        (0, rest)
    };

    let octave: i64 = octave
        .parse()
        .map_err(|_| InvalidNoteError::new(text, "expected octave -1 to 9"))?;
    if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
        return Err(InvalidNoteError::new(text, "octave out of range -1 to 9"));
    }

    checked_note(text, (octave + 1) * 12 + base + offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Result<u8, InvalidNoteError> {
        note_to_midi(&ActionValue::from(text))
    }

    #[test]
    fn test_reference_pitches() {
        assert_eq!(note("C4"), Ok(60));
        assert_eq!(note("A4"), Ok(69));
        assert_eq!(note("C-1"), Ok(0));
        assert_eq!(note("G9"), Ok(127));
    }

    #[test]
    fn test_accidentals() {
        assert_eq!(note("C#4"), Ok(61));
        assert_eq!(note("F#3"), Ok(54));
        assert_eq!(note("G#5"), Ok(80));
        assert_eq!(note("Db4"), Ok(61));
        assert_eq!(note("Bb3"), Ok(58));
        assert_eq!(note("Eb5"), Ok(75));
    }

    #[test]
    fn test_lowercase() {
        assert_eq!(note("c4"), Ok(60));
        assert_eq!(note("f#3"), Ok(54));
        assert_eq!(note("bb3"), Ok(58));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(note_to_midi(&ActionValue::Int(60)), Ok(60));
        assert_eq!(note_to_midi(&ActionValue::Int(127)), Ok(127));
        assert_eq!(note("60"), Ok(60));
        assert_eq!(note("127"), Ok(127));
    }

    #[test]
    fn test_invalid_names() {
        assert!(note("X4").is_err());
        assert!(note("C").is_err());
        assert!(note("invalid").is_err());
        assert!(note("").is_err());
        assert!(note("C#").is_err());
    }

    #[test]
    fn test_out_of_range() {
        assert!(note("C10").is_err());
        assert!(note("G#9").is_err());
        assert!(note("Cb-1").is_err());
        assert!(note("128").is_err());
        assert!(note_to_midi(&ActionValue::Int(-1)).is_err());
        assert!(note_to_midi(&ActionValue::Int(128)).is_err());
    }

    #[test]
    fn test_error_mentions_input() {
        let err = note("H2").unwrap_err();
        assert_eq!(err.input, "H2");
        assert!(err.to_string().contains("H2"));
    }
}
