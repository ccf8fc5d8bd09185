//! Operating mode flags

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How measured channels are isolated and how idle slots are driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OperatingMode {
    /// Turn the measured channel OFF while everything else holds state
    pub subtractive: bool,
    /// Force every channel OFF outside the measurement region
    pub actuate_off: bool,
}

impl OperatingMode {
    /// Bit 0 of the mode mask: subtractive measurement
    pub const MEASURE_OFF: u8 = 1 << 0;
    /// Bit 1 of the mode mask: no actuation outside the measurement region
    pub const ACTUATE_OFF: u8 = 1 << 1;

    /// Neither flag set
    pub const fn new() -> Self {
        Self {
            subtractive: false,
            actuate_off: false,
        }
    }

    /// Decode a mode mask; unknown bits are ignored
    pub const fn from_bits(bits: u8) -> Self {
        Self {
            subtractive: bits & Self::MEASURE_OFF != 0,
            actuate_off: bits & Self::ACTUATE_OFF != 0,
        }
    }

    /// Encode as a mode mask
    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.subtractive {
            bits |= Self::MEASURE_OFF;
        }
        if self.actuate_off {
            bits |= Self::ACTUATE_OFF;
        }
        bits
    }

    /// Builder: set the subtractive flag
    pub const fn with_subtractive(mut self, on: bool) -> Self {
        self.subtractive = on;
        self
    }

    /// Builder: set the actuate-off flag
    pub const fn with_actuate_off(mut self, on: bool) -> Self {
        self.actuate_off = on;
        self
    }

    /// Slots reserved before the measurement region (the settling guard)
    pub const fn guard_slots(&self) -> u16 {
        self.subtractive as u16
    }
}

impl From<u8> for OperatingMode {
    fn from(bits: u8) -> Self {
        Self::from_bits(bits)
    }
}

impl From<OperatingMode> for u8 {
    fn from(mode: OperatingMode) -> Self {
        mode.bits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bits() {
        let mode = OperatingMode::from_bits(0b11);
        assert!(mode.subtractive);
        assert!(mode.actuate_off);

        let mode = OperatingMode::from_bits(OperatingMode::ACTUATE_OFF);
        assert!(!mode.subtractive);
        assert!(mode.actuate_off);
    }

    #[test]
    fn test_unknown_bits_ignored() {
        let mode = OperatingMode::from_bits(0xFC);
        assert_eq!(mode, OperatingMode::new());
        assert_eq!(OperatingMode::from_bits(0xFD).bits(), OperatingMode::MEASURE_OFF);
    }

    #[test]
    fn test_guard_slots() {
        assert_eq!(OperatingMode::new().guard_slots(), 0);
        assert_eq!(OperatingMode::new().with_subtractive(true).guard_slots(), 1);
    }
}
