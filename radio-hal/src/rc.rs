//! CRSF RC-channel decoding: converts the CH4/CH5 switch channels into the
//! packed controller-command byte `fhss_core::ModeSwitch` consumes.
//!
//! This resolves the open mapping left undocumented upstream: CH4 is a
//! two-position switch for enable, CH5 a three-position switch for mode,
//! both read in CRSF's native 172..1811 scale (172..1811 ⇔ 1000..2000 µs).

/// CRSF's channel center value, corresponding to 1500 µs.
pub const CRSF_CENTER: u16 = 992;

/// Dead-band, in CRSF units, around [`CRSF_CENTER`] within which CH5 reads
/// as the middle (AUTO) position.
pub const CRSF_DEADBAND: u16 = 33;

/// One CRSF frame's worth of channel data, in the native 172..1811 scale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CrsfChannels(pub [u16; 16]);

impl CrsfChannels {
    /// CH4, 0-indexed channel 3: the enable switch.
    fn ch4(&self) -> u16 {
        self.0[3]
    }

    /// CH5, 0-indexed channel 4: the mode switch.
    fn ch5(&self) -> u16 {
        self.0[4]
    }
}

/// Decode CH4/CH5 into the packed controller-command byte: bit0 is enable
/// (CH4 above center), bits1..2 are the mode (CH5 below the dead-band is
/// `LOW`, above it is `HIGH`, inside it is `AUTO`).
pub fn decode_switch_command(channels: &CrsfChannels) -> u8 {
    let enabled = channels.ch4() > CRSF_CENTER;
    let ch5 = channels.ch5();
    let mode_bits: u8 = if ch5 < CRSF_CENTER.saturating_sub(CRSF_DEADBAND) {
        0b01 // LOW
    } else if ch5 > CRSF_CENTER.saturating_add(CRSF_DEADBAND) {
        0b10 // HIGH
    } else {
        0b00 // AUTO
    };
    (enabled as u8) | (mode_bits << 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels_with(ch4: u16, ch5: u16) -> CrsfChannels {
        let mut ch = [CRSF_CENTER; 16];
        ch[3] = ch4;
        ch[4] = ch5;
        CrsfChannels(ch)
    }

    #[test]
    fn ch4_above_center_enables() {
        let command = decode_switch_command(&channels_with(1811, CRSF_CENTER));
        assert_eq!(command & 0b1, 1);
    }

    #[test]
    fn ch4_at_or_below_center_disables() {
        let command = decode_switch_command(&channels_with(172, CRSF_CENTER));
        assert_eq!(command & 0b1, 0);
    }

    #[test]
    fn ch5_within_deadband_is_auto() {
        let command = decode_switch_command(&channels_with(172, CRSF_CENTER));
        assert_eq!((command >> 1) & 0b11, 0b00);

        let command = decode_switch_command(&channels_with(172, CRSF_CENTER + CRSF_DEADBAND));
        assert_eq!((command >> 1) & 0b11, 0b00);

        let command = decode_switch_command(&channels_with(172, CRSF_CENTER - CRSF_DEADBAND));
        assert_eq!((command >> 1) & 0b11, 0b00);
    }

    #[test]
    fn ch5_beyond_deadband_selects_low_or_high() {
        let command = decode_switch_command(&channels_with(172, CRSF_CENTER - CRSF_DEADBAND - 1));
        assert_eq!((command >> 1) & 0b11, 0b01);

        let command = decode_switch_command(&channels_with(172, CRSF_CENTER + CRSF_DEADBAND + 1));
        assert_eq!((command >> 1) & 0b11, 0b10);
    }

    #[test]
    fn packs_enable_and_mode_into_one_byte() {
        let command = decode_switch_command(&channels_with(1811, CRSF_CENTER + CRSF_DEADBAND + 1));
        assert_eq!(command, 0b101);
    }
}
