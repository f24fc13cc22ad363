//! SysEx frame builder for the Pacer
//!
//! Every frame is `F0 | manufacturer id | header | payload | checksum | F7`.
//! Parameters inside the payload are written as `[element, 0x01, value, 0x00]`,
//! except the last parameter of a frame which has no trailing pad byte.

use crate::constants::{
    CMD_SET, CONTROL_MODE_ELEMENT, CONTROL_NAME, DEVICE_ID, LED_ELEMENT_BASE, MANUFACTURER_ID,
    NAME_MAX_LEN, NAME_PLACEHOLDER, PARAM_OBJECT, STEP_COUNT, SYSEX_END, SYSEX_START,
    TARGET_PRESET,
};
use crate::mapping::MidiStep;
use crate::protocol::LedColors;

/// Number of elements per control step (channel, type, data1-3, active)
const STEP_ELEMENTS: u8 = 6;
/// Number of elements per LED step (midi ctrl, active, inactive, led num)
const LED_ELEMENTS: u8 = 4;

/// Checksum over manufacturer id through end of payload (F0/F7 excluded)
///
/// Chosen so that data + checksum sums to a multiple of 128.
pub fn checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| b as u32).sum();
    ((128 - sum % 128) % 128) as u8
}

/// LED settings of one control step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedStep {
    /// CC for remote LED control (0 = disabled)
    pub midi_ctrl: u8,
    pub colors: LedColors,
    /// Which LED (0 = default, 1 = bottom, 2 = middle, 3 = top)
    pub led_num: u8,
}

impl LedStep {
    /// LED step with the given colors, each clamped to a 7-bit data byte
    pub fn new(colors: LedColors) -> Self {
        Self {
            midi_ctrl: 0,
            colors: LedColors {
                active: colors.active.min(0x7F),
                inactive: colors.inactive.min(0x7F),
            },
            led_num: 0,
        }
    }
}

/// Builds individual SysEx frames targeting one preset slot
#[derive(Debug, Clone, Copy)]
pub struct PacerSysExBuilder {
    preset_index: u8,
}

impl PacerSysExBuilder {
    pub fn new(preset_index: u8) -> Self {
        Self { preset_index }
    }

    pub fn preset_index(&self) -> u8 {
        self.preset_index
    }

    /// Wrap header and payload into a complete frame with checksum
    fn frame(&self, object: u8, body: &[u8]) -> Vec<u8> {
        let mut msg = Vec::with_capacity(MANUFACTURER_ID.len() + 5 + body.len() + 3);
        msg.push(SYSEX_START);
        msg.extend_from_slice(&MANUFACTURER_ID);
        msg.extend_from_slice(&[DEVICE_ID, CMD_SET, TARGET_PRESET, self.preset_index, object]);
        msg.extend_from_slice(body);
        msg.push(checksum(&msg[1..]));
        msg.push(SYSEX_END);
        msg
    }

    /// Set the preset name (ASCII, at most 8 characters)
    pub fn build_preset_name(&self, name: &str) -> Vec<u8> {
        let ascii: Vec<u8> = name
            .chars()
            .map(|c| if c.is_ascii() { c as u8 } else { NAME_PLACEHOLDER })
            .take(NAME_MAX_LEN)
            .collect();

        // Element 0, then [length, ascii...]
        let mut body = Vec::with_capacity(ascii.len() + 2);
        body.push(0x00);
        body.push(ascii.len() as u8);
        body.extend_from_slice(&ascii);
        self.frame(CONTROL_NAME, &body)
    }

    /// Configure one step (1-6) of a footswitch
    pub fn build_control_step(
        &self,
        control_id: u8,
        step_index: u8,
        step: &MidiStep,
        active: bool,
    ) -> Vec<u8> {
        debug_assert!((1..=STEP_COUNT as u8).contains(&step_index));
        let base = (step_index - 1) * STEP_ELEMENTS;

        let body = params(&[
            (base + 1, step.channel),
            (base + 2, step.msg_type),
            (base + 3, step.data1),
            (base + 4, step.data2),
            (base + 5, step.data3),
            (base + 6, active as u8),
        ]);
        self.frame(control_id, &body)
    }

    /// Set the step-advance mode of a footswitch
    ///
    /// Encoded as a single unpadded parameter right after the header.
    pub fn build_control_mode(&self, control_id: u8, mode: u8) -> Vec<u8> {
        self.frame(control_id, &params(&[(CONTROL_MODE_ELEMENT, mode)]))
    }

    /// Configure the LED of one step (1-6) of a footswitch
    pub fn build_control_led(&self, control_id: u8, step_index: u8, led: &LedStep) -> Vec<u8> {
        debug_assert!((1..=STEP_COUNT as u8).contains(&step_index));
        let base = (step_index - 1) * LED_ELEMENTS + LED_ELEMENT_BASE;

        let body = params(&[
            (base, led.midi_ctrl),
            (base + 1, led.colors.active),
            (base + 2, led.colors.inactive),
            (base + 3, led.led_num),
        ]);
        self.frame(control_id, &body)
    }
}

/// Encode parameters; all but the last get a trailing 0x00 pad
fn params(values: &[(u8, u8)]) -> Vec<u8> {
    let mut out = Vec::with_capacity(values.len() * 4);
    for (i, &(element, value)) in values.iter().enumerate() {
        out.extend_from_slice(&[element, PARAM_OBJECT, value]);
        if i + 1 < values.len() {
            out.push(0x00);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{LED_AMBER, LED_BLUE, MSG_CTRL_OFF, MSG_SW_PRG_BANK};

    fn step(msg_type: u8, channel: u8, data: [u8; 3]) -> MidiStep {
        MidiStep {
            msg_type,
            channel,
            data1: data[0],
            data2: data[1],
            data3: data[2],
        }
    }

    fn assert_frame_integrity(frame: &[u8]) {
        assert_eq!(frame[0], SYSEX_START);
        assert_eq!(frame[frame.len() - 1], SYSEX_END);
        assert_eq!(&frame[1..4], &MANUFACTURER_ID);
        let sum: u32 = frame[1..frame.len() - 1].iter().map(|&b| b as u32).sum();
        assert_eq!(sum % 128, 0);
        assert!(frame[1..frame.len() - 1].iter().all(|&b| b < 0x80));
    }

    #[test]
    fn test_checksum() {
        assert_eq!(checksum(&[10, 20, 30]), 68);
        assert_eq!(checksum(&[]), 0);
        assert_eq!(checksum(&[64, 64]), 0);
        let data = [0x00, 0x01, 0x77, 0x7F, 0x01];
        assert!(checksum(&data) < 128);
        assert_eq!(checksum(&data), checksum(&data));
    }

    #[test]
    fn test_preset_name_layout() {
        let syx = PacerSysExBuilder::new(0x01).build_preset_name("TEST");

        assert_frame_integrity(&syx);
        assert_eq!(&syx[4..10], &[DEVICE_ID, CMD_SET, TARGET_PRESET, 0x01, CONTROL_NAME, 0x00]);
        assert_eq!(syx[10], 4);
        assert_eq!(&syx[11..15], b"TEST");
        assert_eq!(syx.len(), 17);
    }

    #[test]
    fn test_preset_name_truncation() {
        let syx = PacerSysExBuilder::new(0x01).build_preset_name("VERY_LONG_NAME");
        assert_eq!(syx[10], 8);
        assert_eq!(&syx[11..19], b"VERY_LON");
        assert_frame_integrity(&syx);
    }

    #[test]
    fn test_preset_name_non_ascii() {
        let syx = PacerSysExBuilder::new(0x01).build_preset_name("Zażółć");
        assert_eq!(syx[10], 6);
        assert_eq!(&syx[11..17], b"Za????");
        assert_frame_integrity(&syx);
    }

    #[test]
    fn test_preset_index_in_header() {
        let syx = PacerSysExBuilder::new(0x0F).build_preset_name("X");
        assert_eq!(syx[7], 0x0F);
    }

    #[test]
    fn test_control_step_layout() {
        let builder = PacerSysExBuilder::new(0x01);
        let syx = builder.build_control_step(0x0D, 1, &step(MSG_SW_PRG_BANK, 3, [10, 20, 30]), true);

        assert_frame_integrity(&syx);
        assert_eq!(&syx[4..9], &[DEVICE_ID, CMD_SET, TARGET_PRESET, 0x01, 0x0D]);

        let params = &syx[9..syx.len() - 2];
        assert_eq!(params.len(), 23);
        assert_eq!(&params[0..4], &[1, 0x01, 3, 0x00]);
        assert_eq!(&params[4..8], &[2, 0x01, MSG_SW_PRG_BANK, 0x00]);
        assert_eq!(&params[8..12], &[3, 0x01, 10, 0x00]);
        assert_eq!(&params[12..16], &[4, 0x01, 20, 0x00]);
        assert_eq!(&params[16..20], &[5, 0x01, 30, 0x00]);
        assert_eq!(&params[20..23], &[6, 0x01, 1]);
    }

    #[test]
    fn test_control_step_elements_follow_step_index() {
        let builder = PacerSysExBuilder::new(0x01);
        let syx = builder.build_control_step(0x0D, 3, &step(MSG_SW_PRG_BANK, 0, [5, 0, 0]), true);
        let params = &syx[9..syx.len() - 2];
        assert_eq!(params[0], 13);
        assert_eq!(params[4], 14);
        assert_eq!(params[20], 18);

        let syx = builder.build_control_step(0x12, 6, &MidiStep::OFF, false);
        let params = &syx[9..syx.len() - 2];
        assert_eq!(params[0], 31);
        assert_eq!(params[20], 36);
    }

    #[test]
    fn test_control_step_inactive() {
        let syx = PacerSysExBuilder::new(0x01).build_control_step(0x0D, 1, &MidiStep::OFF, false);
        let params = &syx[9..syx.len() - 2];
        assert_eq!(&params[4..8], &[2, 0x01, MSG_CTRL_OFF, 0x00]);
        assert_eq!(&params[params.len() - 3..], &[6, 0x01, 0]);
        assert_frame_integrity(&syx);
    }

    #[test]
    fn test_control_mode_layout() {
        let syx = PacerSysExBuilder::new(0x02).build_control_mode(0x0E, 0);
        assert_eq!(
            &syx[4..syx.len() - 2],
            &[DEVICE_ID, CMD_SET, TARGET_PRESET, 0x02, 0x0E, CONTROL_MODE_ELEMENT, 0x01, 0x00]
        );
        assert_frame_integrity(&syx);
    }

    #[test]
    fn test_control_led_layout() {
        let builder = PacerSysExBuilder::new(0x01);
        let led = LedStep::new(LedColors {
            active: LED_BLUE,
            inactive: LED_AMBER,
        });

        let syx = builder.build_control_led(0x0D, 1, &led);
        let params = &syx[9..syx.len() - 2];
        assert_eq!(
            params,
            &[0x40, 0x01, 0, 0x00, 0x41, 0x01, LED_BLUE, 0x00, 0x42, 0x01, LED_AMBER, 0x00, 0x43, 0x01, 0]
        );
        assert_frame_integrity(&syx);

        let syx = builder.build_control_led(0x0D, 2, &led);
        assert_eq!(syx[9], 0x44);
        let syx = builder.build_control_led(0x0D, 6, &led);
        assert_eq!(syx[9], 0x54);
    }

    #[test]
    fn test_led_step_clamps_colors() {
        let led = LedStep::new(LedColors {
            active: SYSEX_END,
            inactive: LED_AMBER,
        });
        assert_eq!(led.colors.active, 0x7F);
        assert_eq!(led.colors.inactive, LED_AMBER);

        let syx = PacerSysExBuilder::new(0x01).build_control_led(0x0D, 1, &led);
        assert_eq!(syx.iter().filter(|&&b| b == SYSEX_END).count(), 1);
        assert_frame_integrity(&syx);
    }
}
