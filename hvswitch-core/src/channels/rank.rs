//! Active-channel ranking
//!
//! Every channel whose base bit is on gets a unique rank, assigned in
//! hardware scan order. A channel's rank is the measurement slot it owns
//! inside the trailing region of the period.

use super::bits::{ChannelBits, CHANNELS_PER_PORT};

/// Rank table derived from a base bitmap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankTable<const PORTS: usize> {
    ranks: [[Option<u16>; CHANNELS_PER_PORT]; PORTS],
    active_count: u16,
}

impl<const PORTS: usize> Default for RankTable<PORTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const PORTS: usize> RankTable<PORTS> {
    /// Table with no active channels
    pub const fn new() -> Self {
        Self {
            ranks: [[None; CHANNELS_PER_PORT]; PORTS],
            active_count: 0,
        }
    }

    /// Derive ranks from a base bitmap
    pub fn derive(base: &ChannelBits<PORTS>) -> Self {
        let mut table = Self::new();
        for channel in base.iter_on() {
            let (port, bit) = (channel / CHANNELS_PER_PORT, channel % CHANNELS_PER_PORT);
            table.ranks[port][bit] = Some(table.active_count);
            table.active_count += 1;
        }
        table
    }

    /// Number of ranked (active) channels
    pub const fn active_count(&self) -> u16 {
        self.active_count
    }

    /// Rank of a channel, `None` when inactive or out of range
    pub fn rank_of(&self, channel: usize) -> Option<u16> {
        self.ranks
            .get(channel / CHANNELS_PER_PORT)
            .and_then(|port| port[channel % CHANNELS_PER_PORT])
    }

    /// Channel holding a given rank
    pub fn channel_for_rank(&self, rank: u16) -> Option<usize> {
        if rank >= self.active_count {
            return None;
        }
        self.ranks.iter().enumerate().find_map(|(port, bits)| {
            bits.iter()
                .position(|&r| r == Some(rank))
                .map(|bit| port * CHANNELS_PER_PORT + bit)
        })
    }

    /// Active channels ordered by rank
    pub fn by_rank(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.active_count).filter_map(move |rank| self.channel_for_rank(rank))
    }
}
