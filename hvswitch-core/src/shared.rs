//! Scheduler shared between a timing context and a control context
//!
//! Base bitmap, mode, period and rank table must change as one unit: a
//! window computed against a half-applied update is wrong hardware output.
//! [`SharedScheduler`] keeps the whole scheduler behind one blocking mutex
//! so every mutation lands between two window computations.
//!
//! ```ignore
//! static SCHEDULER: SharedScheduler<CriticalSectionRawMutex, BOARD_PORTS> =
//!     SharedScheduler::new();
//!
//! // control side
//! SCHEDULER.update(|s| {
//!     s.set_base_states(ports);
//!     s.set_period(requested)
//! });
//!
//! // timing side
//! let bits = SCHEDULER.compute_window(slot);
//! ```

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::channels::{ChannelBits, ChannelError};
use crate::window::{OperatingMode, WindowScheduler};

/// Mutex-guarded [`WindowScheduler`]
pub struct SharedScheduler<M: RawMutex, const PORTS: usize> {
    inner: Mutex<M, RefCell<WindowScheduler<PORTS>>>,
}

impl<M: RawMutex, const PORTS: usize> Default for SharedScheduler<M, PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: RawMutex, const PORTS: usize> SharedScheduler<M, PORTS> {
    /// Shared scheduler with every channel off
    pub const fn new() -> Self {
        Self::from_scheduler(WindowScheduler::new())
    }

    /// Wrap an already configured scheduler
    pub const fn from_scheduler(scheduler: WindowScheduler<PORTS>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(scheduler)),
        }
    }

    /// Apply a group of mutations atomically
    ///
    /// Must not be called re-entrantly from inside `f`.
    pub fn update<R>(&self, f: impl FnOnce(&mut WindowScheduler<PORTS>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    /// Inspect the scheduler under the lock
    pub fn read<R>(&self, f: impl FnOnce(&WindowScheduler<PORTS>) -> R) -> R {
        self.inner.lock(|cell| f(&cell.borrow()))
    }

    /// Compute the bitmap for one slot
    pub fn compute_window(&self, window: u16) -> ChannelBits<PORTS> {
        self.read(|s| s.compute_window(window))
    }

    /// Set the operating mode
    pub fn configure(&self, mode: OperatingMode) {
        self.update(|s| s.configure(mode))
    }

    /// Overwrite the whole base bitmap
    pub fn set_base_states(&self, states: impl Into<ChannelBits<PORTS>>) {
        let states = states.into();
        self.update(|s| s.set_base_states(states))
    }

    /// Overwrite one port of the base bitmap
    pub fn set_base_state(&self, port: usize, states: u8) -> Result<(), ChannelError> {
        self.update(|s| s.set_base_state(port, states))
    }

    /// Request a period; returns the effective period
    pub fn set_period(&self, requested: u16) -> u16 {
        self.update(|s| s.set_period(requested))
    }

    /// Effective period
    pub fn period(&self) -> u16 {
        self.read(|s| s.period())
    }

    /// Current base bitmap
    pub fn get_base_states(&self) -> [u8; PORTS] {
        self.read(|s| s.get_base_states())
    }

    /// Copy of the full scheduler state
    pub fn snapshot(&self) -> WindowScheduler<PORTS> {
        self.read(|s| s.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_sync::blocking_mutex::raw::NoopRawMutex;

    #[test]
    fn test_update_is_applied_as_unit() {
        let shared = SharedScheduler::<NoopRawMutex, 1>::new();
        let period = shared.update(|s| {
            s.configure(OperatingMode::from_bits(OperatingMode::MEASURE_OFF));
            s.set_base_states([0b0000_0011]);
            s.set_period(0)
        });

        assert_eq!(period, 3);
        assert_eq!(shared.period(), 3);
        assert_eq!(shared.compute_window(1).ports(), &[0b0000_0001]);
    }

    #[test]
    fn test_delegating_mutators() {
        let shared = SharedScheduler::<NoopRawMutex, 2>::new();
        shared.set_base_states([0x80, 0x00]);
        shared.set_base_state(1, 0x01).unwrap();
        assert_eq!(
            shared.set_base_state(2, 0x01),
            Err(ChannelError::PortOutOfRange(2))
        );
        assert_eq!(shared.get_base_states(), [0x80, 0x01]);
        assert_eq!(shared.set_period(1), 2);

        let snapshot = shared.snapshot();
        assert_eq!(snapshot.active_count(), 2);
        assert_eq!(snapshot.compute_window(0), shared.compute_window(0));
    }
}
