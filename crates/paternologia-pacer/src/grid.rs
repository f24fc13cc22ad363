//! Fixed-size view of a song's buttons and steps
//!
//! The pedal always receives all six footswitches with all six steps, so the
//! exporter walks a `[ButtonSlot; 6]` of `[Option<&Action>; 6]` rather than
//! the song's variable-length lists.

use crate::constants::{BUTTON_COUNT, STEP_COUNT};
use paternologia_core::{Action, PacerButton, Song};

/// One footswitch: an action (or nothing) per step
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonSlot<'a> {
    pub steps: [Option<&'a Action>; STEP_COUNT],
}

impl<'a> ButtonSlot<'a> {
    fn from_button(button: &'a PacerButton) -> Self {
        if button.actions.len() > STEP_COUNT {
            log::warn!(
                "ButtonGrid: button '{}' has {} actions, only the first {} are exported",
                button.name,
                button.actions.len(),
                STEP_COUNT
            );
        }

        let mut steps = [None; STEP_COUNT];
        for (slot, action) in steps.iter_mut().zip(&button.actions) {
            *slot = Some(action);
        }
        Self { steps }
    }

    /// Whether any step carries an action
    pub fn has_actions(&self) -> bool {
        self.steps.iter().any(Option::is_some)
    }
}

/// All six footswitches of a song
#[derive(Debug, Clone, Copy, Default)]
pub struct ButtonGrid<'a> {
    pub buttons: [ButtonSlot<'a>; BUTTON_COUNT],
}

impl<'a> ButtonGrid<'a> {
    pub fn from_song(song: &'a Song) -> Self {
        if song.pacer.len() > BUTTON_COUNT {
            log::warn!(
                "ButtonGrid: song '{}' has {} buttons, only the first {} are exported",
                song.song.id,
                song.pacer.len(),
                BUTTON_COUNT
            );
        }

        let mut buttons = [ButtonSlot::default(); BUTTON_COUNT];
        for (slot, button) in buttons.iter_mut().zip(&song.pacer) {
            *slot = ButtonSlot::from_button(button);
        }
        Self { buttons }
    }
}
