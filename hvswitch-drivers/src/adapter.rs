//! `embedded-hal` 1.0 adapters
//!
//! Chip HALs implement the `embedded-hal` traits; these wrappers expose them
//! through the `hvswitch-hal` traits the drivers are written against.

use hvswitch_hal::{OutputPin, SpiBus};

/// Wraps an `embedded_hal::spi::SpiBus`
pub struct EhSpi<T>(pub T);

impl<T: embedded_hal::spi::SpiBus<u8>> SpiBus for EhSpi<T> {
    type Error = T::Error;

    fn write(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        embedded_hal::spi::SpiBus::write(&mut self.0, data)?;
        // The latch must not rise before the last bit is out
        embedded_hal::spi::SpiBus::flush(&mut self.0)
    }
}

/// Wraps an `embedded_hal::digital::OutputPin`
pub struct EhPin<T>(pub T);

impl<T: embedded_hal::digital::OutputPin> OutputPin for EhPin<T> {
    type Error = T::Error;

    fn set_high(&mut self) -> Result<(), Self::Error> {
        embedded_hal::digital::OutputPin::set_high(&mut self.0)
    }

    fn set_low(&mut self) -> Result<(), Self::Error> {
        embedded_hal::digital::OutputPin::set_low(&mut self.0)
    }
}
