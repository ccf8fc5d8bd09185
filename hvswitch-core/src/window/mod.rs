//! Measurement window scheduling
//!
//! Computes, slot by slot, which channels are energised so that each active
//! channel is isolated once per period for the measurement front-end.

pub mod cycle;
pub mod mode;
pub mod scheduler;

pub use cycle::WindowCycle;
pub use mode::OperatingMode;
pub use scheduler::{Slot, WindowScheduler};

/// Switch ports on the HV switching board (40 channels)
pub const BOARD_PORTS: usize = 5;

/// Scheduler sized for the HV switching board
pub type BoardScheduler = WindowScheduler<BOARD_PORTS>;
