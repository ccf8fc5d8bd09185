//! Shift-register output chain
//!
//! The switch outputs are driven by a daisy chain of serial-in shift
//! registers, one per port. The last port sits nearest the data input, so
//! ports are shifted out in reverse order. Outputs are active-high: a
//! channel that is on is shifted out as 1 (the active-low convention only
//! exists at the emulated register interface).
//!
//! # Usage
//!
//! ```ignore
//! let mut control = OutputControl::new(oe_pin, srclr_pin);
//! let mut chain = ShiftChain::<_, _, BOARD_PORTS>::new(spi, latch, SpiConfig::default());
//!
//! control.begin()?;
//! chain.write_all_off()?;
//! chain.write(&scheduler.compute_window(slot))?;
//! ```

use hvswitch_core::ChannelBits;
use hvswitch_hal::{OutputPin, SpiBus, SpiConfig};

/// Errors while writing to the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputError<S, P> {
    /// Serial bus failure
    Spi(S),
    /// Latch pin failure
    Latch(P),
}

/// Errors from the chain control lines
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ControlError<E, C> {
    /// Output-enable pin failure
    OutputEnable(E),
    /// Serial-clear pin failure
    Clear(C),
}

/// Build the byte sequence that puts `ports` on the outputs
///
/// Reverses the port order. When the bus shifts the least significant bit
/// first, each byte is also bit-reversed so the register sees the same bit
/// order as an MSB-first bus.
pub fn encode_frame<const PORTS: usize>(ports: &[u8; PORTS], msb_first: bool) -> [u8; PORTS] {
    let mut frame = [0u8; PORTS];
    for (out, &port) in frame.iter_mut().zip(ports.iter().rev()) {
        *out = if msb_first { port } else { port.reverse_bits() };
    }
    frame
}

/// Daisy-chained shift registers behind one latch
pub struct ShiftChain<S, L, const PORTS: usize> {
    spi: S,
    latch: L,
    config: SpiConfig,
    last: Option<[u8; PORTS]>,
}

impl<S: SpiBus, L: OutputPin, const PORTS: usize> ShiftChain<S, L, PORTS> {
    /// Create a chain driver
    ///
    /// # Arguments
    /// - `spi`: Bus wired to the chain's serial input and clock
    /// - `latch`: Storage-register clock (chip select); latches on the rising edge
    /// - `config`: Bus configuration, used for the bit order
    pub fn new(spi: S, latch: L, config: SpiConfig) -> Self {
        Self {
            spi,
            latch,
            config,
            last: None,
        }
    }

    /// Shift out and latch a port bitmap
    pub fn write_ports(&mut self, ports: &[u8; PORTS]) -> Result<(), OutputError<S::Error, L::Error>> {
        let frame = encode_frame(ports, self.config.msb_first);

        self.latch.set_low().map_err(OutputError::Latch)?;
        let shifted = self.spi.write(&frame).map_err(OutputError::Spi);
        // Release the latch even if the transfer failed
        self.latch.set_high().map_err(OutputError::Latch)?;
        shifted?;

        self.last = Some(*ports);
        Ok(())
    }

    /// Shift out and latch a channel bitmap
    pub fn write(&mut self, bits: &ChannelBits<PORTS>) -> Result<(), OutputError<S::Error, L::Error>> {
        self.write_ports(bits.ports())
    }

    /// Turn every channel off
    pub fn write_all_off(&mut self) -> Result<(), OutputError<S::Error, L::Error>> {
        self.write_ports(&[0; PORTS])
    }

    /// Last bitmap successfully latched
    pub fn last_written(&self) -> Option<&[u8; PORTS]> {
        self.last.as_ref()
    }

    /// Release the bus and latch pin
    pub fn release(self) -> (S, L) {
        (self.spi, self.latch)
    }
}

/// Output-enable and serial-clear lines of the chain
///
/// Both lines are active-low.
pub struct OutputControl<E, C> {
    output_enable: E,
    clear: C,
}

impl<E: OutputPin, C: OutputPin> OutputControl<E, C> {
    /// Create the control-line driver
    pub fn new(output_enable: E, clear: C) -> Self {
        Self {
            output_enable,
            clear,
        }
    }

    /// Release the clear line and enable the outputs
    pub fn begin(&mut self) -> Result<(), ControlError<E::Error, C::Error>> {
        self.clear.set_high().map_err(ControlError::Clear)?;
        self.enable()
    }

    /// Drive the outputs from the storage registers
    pub fn enable(&mut self) -> Result<(), ControlError<E::Error, C::Error>> {
        self.output_enable
            .set_low()
            .map_err(ControlError::OutputEnable)
    }

    /// Put the outputs in high impedance
    pub fn disable(&mut self) -> Result<(), ControlError<E::Error, C::Error>> {
        self.output_enable
            .set_high()
            .map_err(ControlError::OutputEnable)
    }

    /// Pulse the clear line, emptying the shift registers
    pub fn clear(&mut self) -> Result<(), ControlError<E::Error, C::Error>> {
        self.clear.set_low().map_err(ControlError::Clear)?;
        self.clear.set_high().map_err(ControlError::Clear)
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use core::convert::Infallible;

    use hvswitch_hal::{OutputPin, SpiBus};

    /// Records every byte written
    #[derive(Default)]
    pub struct MockSpi {
        pub written: Vec<u8>,
        pub fail: bool,
    }

    impl SpiBus for MockSpi {
        type Error = ();

        fn write(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail {
                return Err(());
            }
            self.written.extend_from_slice(data);
            Ok(())
        }
    }

    /// Records every level change
    #[derive(Default)]
    pub struct MockPin {
        pub levels: Vec<bool>,
    }

    impl MockPin {
        pub fn is_high(&self) -> bool {
            self.levels.last().copied().unwrap_or(false)
        }
    }

    impl OutputPin for MockPin {
        type Error = Infallible;

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.levels.push(true);
            Ok(())
        }

        fn set_low(&mut self) -> Result<(), Infallible> {
            self.levels.push(false);
            Ok(())
        }
    }
}
