//! Window scheduler
//!
//! Owns the base actuation bitmap, the operating mode and the period, and
//! computes the output bitmap for any slot of the period.
//!
//! # Period layout
//!
//! ```text
//!  slot:  0 ........ offset-2 | offset-1 | offset ...... period-1
//!         quiescent or hold   |  guard   | measurement (one slot per rank)
//! ```
//!
//! `offset = period - active_count`. The guard slot only exists in
//! subtractive mode. The measurement region isolates one active channel per
//! slot in rank order, so every active channel is sensed once per period.

use crate::channels::{ChannelBits, ChannelError, RankTable, CHANNELS_PER_PORT};

use super::cycle::WindowCycle;
use super::mode::OperatingMode;

/// Branch of the period a slot falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// Outputs follow the base bitmap
    Hold,
    /// Every output is forced off (actuate-off mode, before the guard slot)
    Quiescent,
    /// Measurement region; the channel holding `rank` is isolated
    Measure {
        /// Rank isolated in this slot
        rank: u16,
    },
}

/// Time-division window scheduler for `8 * PORTS` channels
///
/// Every mutator re-derives the rank table and re-validates the period
/// before returning, so [`compute_window`](Self::compute_window) always sees
/// a consistent state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowScheduler<const PORTS: usize> {
    base: ChannelBits<PORTS>,
    ranks: RankTable<PORTS>,
    mode: OperatingMode,
    period: u16,
}

impl<const PORTS: usize> Default for WindowScheduler<PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PORTS: usize> WindowScheduler<PORTS> {
    const CAPACITY_OK: () = assert!(
        PORTS > 0 && PORTS * CHANNELS_PER_PORT < u16::MAX as usize,
        "port count must be non-zero and channels must fit a u16 slot index"
    );

    /// All channels off, no mode flags, period 0
    pub const fn new() -> Self {
        let () = Self::CAPACITY_OK;
        Self {
            base: ChannelBits::new(),
            ranks: RankTable::new(),
            mode: OperatingMode::new(),
            period: 0,
        }
    }

    /// All channels off with the given mode
    pub fn with_mode(mode: OperatingMode) -> Self {
        Self::with_config(0, mode)
    }

    /// All channels off with the given period request and mode
    pub fn with_config(period: u16, mode: OperatingMode) -> Self {
        let mut scheduler = Self::new();
        scheduler.mode = mode;
        scheduler.set_period(period);
        scheduler
    }

    /// Turn every channel off
    pub fn reset(&mut self) {
        self.base.clear();
        self.sync_active();
    }

    /// Set the operating mode and re-validate the period
    pub fn configure(&mut self, mode: OperatingMode) {
        self.mode = mode;
        self.set_period(self.period);
    }

    /// Current operating mode
    pub const fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Overwrite the whole base bitmap
    pub fn set_base_states(&mut self, states: impl Into<ChannelBits<PORTS>>) {
        self.base = states.into();
        self.sync_active();
    }

    /// Overwrite one port of the base bitmap
    pub fn set_base_state(&mut self, port: usize, states: u8) -> Result<(), ChannelError> {
        self.base.set_port(port, states)?;
        self.sync_active();
        Ok(())
    }

    /// Switch a single channel's base state
    pub fn set_channel(&mut self, channel: usize, on: bool) -> Result<(), ChannelError> {
        self.base.set(channel, on)?;
        self.sync_active();
        Ok(())
    }

    /// Current base bitmap as port bytes
    pub fn get_base_states(&self) -> [u8; PORTS] {
        self.base.into_ports()
    }

    /// Current base bitmap
    pub const fn base(&self) -> &ChannelBits<PORTS> {
        &self.base
    }

    /// Request a period length
    ///
    /// Requests below [`min_period`](Self::min_period) are raised to it.
    /// Returns the effective period, which is what callers must iterate.
    pub fn set_period(&mut self, requested: u16) -> u16 {
        let floor = self.min_period();
        self.period = requested.max(floor);

        #[cfg(feature = "defmt")]
        if self.period != requested {
            defmt::debug!("period {} raised to {}", requested, self.period);
        }

        self.period
    }

    /// Effective period
    pub const fn period(&self) -> u16 {
        self.period
    }

    /// Smallest period that fits every active channel (plus the guard slot)
    pub const fn min_period(&self) -> u16 {
        self.ranks.active_count() + self.mode.guard_slots()
    }

    /// Number of active (base-on) channels
    pub const fn active_count(&self) -> u16 {
        self.ranks.active_count()
    }

    /// First slot of the measurement region
    pub const fn active_offset(&self) -> u16 {
        self.period - self.ranks.active_count()
    }

    /// Measurement rank of a channel
    pub fn rank_of(&self, channel: usize) -> Option<u16> {
        self.ranks.rank_of(channel)
    }

    /// Channel owning a measurement rank
    pub fn channel_for_rank(&self, rank: u16) -> Option<usize> {
        self.ranks.channel_for_rank(rank)
    }

    /// Which branch of the period `window` falls in
    pub fn classify(&self, window: u16) -> Slot {
        if self.ranks.active_count() > 1 {
            let offset = self.active_offset();
            if window >= offset {
                return Slot::Measure {
                    rank: window - offset,
                };
            }
            let guard_start = offset.saturating_sub(self.mode.guard_slots());
            if self.mode.actuate_off && window < guard_start {
                return Slot::Quiescent;
            }
        }
        Slot::Hold
    }

    /// Channel isolated in `window`, if any
    pub fn isolated_channel(&self, window: u16) -> Option<usize> {
        match self.classify(window) {
            Slot::Measure { rank } => self.ranks.channel_for_rank(rank),
            Slot::Hold | Slot::Quiescent => None,
        }
    }

    /// Compute the output bitmap for slot `window`
    ///
    /// `window` should lie in `[0, period)`. Later slots are treated as
    /// measurement slots whose rank has no channel, so nothing is isolated.
    pub fn compute_window(&self, window: u16) -> ChannelBits<PORTS> {
        match self.classify(window) {
            Slot::Hold => self.base,
            Slot::Quiescent => ChannelBits::new(),
            Slot::Measure { rank } => {
                let subtractive = self.mode.subtractive;
                ChannelBits::from_fn(|channel| {
                    if self.ranks.rank_of(channel) == Some(rank) {
                        !subtractive
                    } else {
                        subtractive && self.base.is_on(channel)
                    }
                })
            }
        }
    }

    /// [`compute_window`](Self::compute_window) as port bytes
    pub fn window_ports(&self, window: u16) -> [u8; PORTS] {
        self.compute_window(window).into_ports()
    }

    /// Iterate over every slot of the current period
    pub fn windows(&self) -> WindowCycle<'_, PORTS> {
        WindowCycle::new(self)
    }

    fn sync_active(&mut self) {
        self.ranks = RankTable::derive(&self.base);

        #[cfg(feature = "defmt")]
        defmt::trace!("{} active channels", self.ranks.active_count());

        // Re-validate against the new floor
        self.set_period(self.period);
    }
}
