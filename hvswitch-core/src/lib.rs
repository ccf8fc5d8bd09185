//! Board-agnostic core logic for the HV switching board
//!
//! This crate contains the measurement-window scheduling logic that does
//! not depend on specific hardware:
//!
//! - Packed channel bitmaps and active-channel ranking
//! - Operating mode flags
//! - Window scheduler (per-slot output bitmaps)
//! - Mutex-guarded scheduler for shared use
//! - Configuration type definitions

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod channels;
pub mod config;
pub mod shared;
pub mod window;

#[cfg(test)]
mod proptests;

pub use channels::{ChannelBits, ChannelError};
pub use shared::SharedScheduler;
pub use window::{BoardScheduler, OperatingMode, Slot, WindowScheduler, BOARD_PORTS};
