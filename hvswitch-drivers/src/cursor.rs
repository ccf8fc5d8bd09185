//! Slot stepping for the periodic output task
//!
//! The timing source (a hardware timer or an async ticker) is outside this
//! crate: it only calls [`WindowOutput::step`] once per slot. The cursor
//! re-reads the effective period on every step, so a period change made by
//! the control plane takes effect without resynchronisation.

use embassy_sync::blocking_mutex::raw::RawMutex;
use hvswitch_core::{ChannelBits, SharedScheduler, WindowScheduler};
use hvswitch_hal::{OutputPin, SpiBus};

use crate::shift::{OutputError, ShiftChain};

/// Position within the period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SlotCursor {
    next: u16,
}

impl SlotCursor {
    /// Cursor at slot 0
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Slot the next call to [`advance`](Self::advance) will return
    pub const fn position(&self) -> u16 {
        self.next
    }

    /// Restart at slot 0
    pub fn reset(&mut self) {
        self.next = 0;
    }

    /// Return the current slot and move to the next one
    ///
    /// If the period shrank below the cursor, the cycle restarts at 0. A
    /// period of 0 (no active channels, additive mode) behaves as a single
    /// slot.
    pub fn advance(&mut self, period: u16) -> u16 {
        let period = period.max(1);
        let slot = if self.next >= period { 0 } else { self.next };
        self.next = if slot + 1 >= period { 0 } else { slot + 1 };
        slot
    }
}

/// Drives one window per step onto a shift chain
pub struct WindowOutput<S, L, const PORTS: usize> {
    chain: ShiftChain<S, L, PORTS>,
    cursor: SlotCursor,
}

impl<S: SpiBus, L: OutputPin, const PORTS: usize> WindowOutput<S, L, PORTS> {
    /// Wrap a shift chain, starting at slot 0
    pub fn new(chain: ShiftChain<S, L, PORTS>) -> Self {
        Self {
            chain,
            cursor: SlotCursor::new(),
        }
    }

    /// Compute and latch the next slot; returns the slot index written
    pub fn step(
        &mut self,
        scheduler: &WindowScheduler<PORTS>,
    ) -> Result<u16, OutputError<S::Error, L::Error>> {
        let slot = self.cursor.advance(scheduler.period());
        let bits = scheduler.compute_window(slot);
        self.latch(slot, &bits)
    }

    /// Like [`step`](Self::step) for a scheduler behind a lock
    ///
    /// The bitmap is computed under the lock; the bus transfer happens
    /// after it is released.
    pub fn step_shared<M: RawMutex>(
        &mut self,
        scheduler: &SharedScheduler<M, PORTS>,
    ) -> Result<u16, OutputError<S::Error, L::Error>> {
        let cursor = &mut self.cursor;
        let (slot, bits) = scheduler.read(|s| {
            let slot = cursor.advance(s.period());
            (slot, s.compute_window(slot))
        });
        self.latch(slot, &bits)
    }

    /// Restart the cycle at slot 0
    pub fn restart(&mut self) {
        self.cursor.reset();
    }

    /// Current cursor
    pub fn cursor(&self) -> SlotCursor {
        self.cursor
    }

    /// Underlying chain
    pub fn chain_mut(&mut self) -> &mut ShiftChain<S, L, PORTS> {
        &mut self.chain
    }

    /// Release the shift chain
    pub fn release(self) -> ShiftChain<S, L, PORTS> {
        self.chain
    }

    fn latch(
        &mut self,
        slot: u16,
        bits: &ChannelBits<PORTS>,
    ) -> Result<u16, OutputError<S::Error, L::Error>> {
        #[cfg(feature = "defmt")]
        defmt::trace!("slot {}: {}", slot, bits);

        self.chain.write(bits)?;
        Ok(slot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shift::mock::{MockPin, MockSpi};
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;
    use hvswitch_core::OperatingMode;
    use hvswitch_hal::SpiConfig;

    fn output<const PORTS: usize>() -> WindowOutput<MockSpi, MockPin, PORTS> {
        WindowOutput::new(ShiftChain::new(
            MockSpi::default(),
            MockPin::default(),
            SpiConfig::default(),
        ))
    }

    #[test]
    fn test_cursor_wraps_at_period() {
        let mut cursor = SlotCursor::new();
        let slots: Vec<u16> = (0..7).map(|_| cursor.advance(3)).collect();
        assert_eq!(slots, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(cursor.position(), 1);
    }

    #[test]
    fn test_cursor_restarts_when_period_shrinks() {
        let mut cursor = SlotCursor::new();
        for _ in 0..5 {
            cursor.advance(8);
        }
        assert_eq!(cursor.position(), 5);
        assert_eq!(cursor.advance(4), 0);
        assert_eq!(cursor.advance(4), 1);
    }

    #[test]
    fn test_cursor_zero_period() {
        let mut cursor = SlotCursor::new();
        assert_eq!(cursor.advance(0), 0);
        assert_eq!(cursor.advance(0), 0);
    }

    #[test]
    fn test_step_writes_each_window() {
        let mut sched = WindowScheduler::<1>::with_mode(OperatingMode::from_bits(1));
        sched.set_base_states([0b0000_0011]);

        let mut out = output::<1>();
        let slots: Vec<u16> = (0..4).map(|_| out.step(&sched).unwrap()).collect();
        assert_eq!(slots, [0, 1, 2, 0]);

        let (spi, _) = out.release().release();
        // Hold, isolate ch1, isolate ch0, hold
        assert_eq!(spi.written, [0b11, 0b01, 0b10, 0b11]);
    }

    #[test]
    fn test_step_shared() {
        let shared = SharedScheduler::<NoopRawMutex, 2>::new();
        shared.set_base_states([0x00, 0x81]);

        let mut out = output::<2>();
        assert_eq!(out.step_shared(&shared).unwrap(), 0);
        assert_eq!(out.chain_mut().last_written(), Some(&[0x00, 0x80]));
        assert_eq!(out.step_shared(&shared).unwrap(), 1);
        assert_eq!(out.chain_mut().last_written(), Some(&[0x00, 0x01]));

        out.restart();
        assert_eq!(out.cursor().position(), 0);
    }
}
