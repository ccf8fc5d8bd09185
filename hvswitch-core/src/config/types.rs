//! Scheduler configuration type definitions
//!
//! The configuration carries the control-plane settings that are not part
//! of the base bitmap. With the `serde` feature it can be exchanged as
//! postcard-serialized binary data.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::window::{OperatingMode, WindowScheduler};

/// Maximum encoded size of a [`SchedulerConfig`] (varint period + 2 flags)
pub const MAX_ENCODED_LEN: usize = 8;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Output buffer too small or value not representable
    Serialize,
    /// Input bytes are not a valid configuration
    Deserialize,
}

/// Period request and operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SchedulerConfig {
    /// Requested period in slots (raised to the floor when applied)
    pub period: u16,
    /// Operating mode flags
    pub mode: OperatingMode,
}

impl SchedulerConfig {
    /// Create a configuration
    pub const fn new(period: u16, mode: OperatingMode) -> Self {
        Self { period, mode }
    }

    /// Read the current configuration of a scheduler
    pub fn capture<const PORTS: usize>(scheduler: &WindowScheduler<PORTS>) -> Self {
        Self {
            period: scheduler.period(),
            mode: scheduler.mode(),
        }
    }

    /// Apply to a scheduler, returning the effective period
    ///
    /// The mode is applied first so the period is validated against the
    /// new floor.
    pub fn apply<const PORTS: usize>(&self, scheduler: &mut WindowScheduler<PORTS>) -> u16 {
        scheduler.configure(self.mode);
        scheduler.set_period(self.period)
    }

    /// Serialize into `buf`, returning the used prefix
    #[cfg(feature = "serde")]
    pub fn encode<'a>(&self, buf: &'a mut [u8]) -> Result<&'a mut [u8], ConfigError> {
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize from postcard bytes
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_orders_mode_before_period() {
        let mut sched = WindowScheduler::<1>::new();
        sched.set_base_states([0b0000_0011]);

        let config = SchedulerConfig::new(2, OperatingMode::from_bits(OperatingMode::MEASURE_OFF));
        assert_eq!(config.apply(&mut sched), 3);
        assert!(sched.mode().subtractive);
    }

    #[test]
    fn test_capture_reports_effective_period() {
        let mut sched = WindowScheduler::<1>::new();
        sched.set_base_states([0xFF]);
        sched.set_period(4);

        let config = SchedulerConfig::capture(&sched);
        assert_eq!(config.period, 8);
        assert_eq!(config.mode, OperatingMode::new());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_postcard_encoding() {
        let config = SchedulerConfig::new(300, OperatingMode::from_bits(0b11));
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let used = config.encode(&mut buf).unwrap().len();

        // varint(300) = 2 bytes, then two bools
        assert_eq!(used, 4);
        assert_eq!(SchedulerConfig::decode(&buf[..used]), Ok(config));
        assert_eq!(SchedulerConfig::decode(&[]), Err(ConfigError::Deserialize));
    }
}
