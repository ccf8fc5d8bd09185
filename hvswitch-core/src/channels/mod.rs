//! Channel state containers
//!
//! Byte-per-port bitmaps plus the rank table derived from them.

pub mod bits;
pub mod rank;

pub use bits::{ChannelBits, ChannelError, ScanOrder, CHANNELS_PER_PORT};
pub use rank::RankTable;
