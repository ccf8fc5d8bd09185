//! HV switching board Hardware Abstraction Layer
//!
//! This crate defines the hardware traits the output drivers are written
//! against, so the same driver code runs on any chip that can clock bytes
//! out of an SPI-like port and toggle a few control pins.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hvswitch-drivers (shift chain, cursor) │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hvswitch-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  chip HAL / embedded-hal 1.0 adapters   │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (latch, output enable, clear)
//! - [`spi::SpiBus`] - Serial output to the shift-register chain

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod spi;

// Re-export key traits at crate root for convenience
pub use gpio::OutputPin;
pub use spi::{SpiBus, SpiConfig};
