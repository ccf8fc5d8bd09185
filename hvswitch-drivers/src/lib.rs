//! Hardware driver implementations
//!
//! This crate provides the output side of the HV switching board on top of
//! the traits defined in `hvswitch-hal`:
//!
//! - Shift-register chain (active-low outputs, reversed port order)
//! - Output-enable / serial-clear control lines
//! - Slot cursor driving one scheduler window per step
//! - `embedded-hal` 1.0 adapters

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod adapter;
pub mod cursor;
pub mod shift;

pub use adapter::{EhPin, EhSpi};
pub use cursor::{SlotCursor, WindowOutput};
pub use shift::{encode_frame, ControlError, OutputControl, OutputError, ShiftChain};
