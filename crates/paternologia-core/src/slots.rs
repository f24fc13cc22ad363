//! Pacer memory layout: button/step counts and preset slot names
//!
//! The pedal stores 24 user presets in 4 banks (A-D) of 6, plus the
//! "CURRENT" working preset in RAM at index 0.

/// Number of footswitches (SW1-SW6) programmed per preset
pub const BUTTON_COUNT: usize = 6;

/// Number of steps (actions) per footswitch
pub const STEP_COUNT: usize = 6;

/// Preset slot names, in device index order.
///
/// The position in this table is the index sent to the pedal:
/// `CURRENT` = 0, then `row * 6 + col` for bank row A-D (0-3) and column 1-6.
pub const PRESET_SLOTS: [&str; 25] = [
    "CURRENT", //
    "A1", "A2", "A3", "A4", "A5", "A6", //
    "B1", "B2", "B3", "B4", "B5", "B6", //
    "C1", "C2", "C3", "C4", "C5", "C6", //
    "D1", "D2", "D3", "D4", "D5", "D6",
];

/// Resolve a preset slot name (case-insensitive) to its device index
///
/// Returns `None` for names outside `CURRENT`, `A1`..`D6`.
pub fn preset_index(name: &str) -> Option<u8> {
    let name = name.trim();
    PRESET_SLOTS
        .iter()
        .position(|slot| slot.eq_ignore_ascii_case(name))
        .map(|index| index as u8)
}
