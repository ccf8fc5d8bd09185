//! GPIO-expander register emulation
//!
//! The control board addresses each switching board as a 40-bit I/O
//! expander on its bus. This crate decodes the register commands the
//! control board sends and applies them to the window scheduler.
//!
//! # Protocol Overview
//!
//! Framing and addressing are handled by the bus layer; this crate sees a
//! command byte plus an optional payload:
//! ```text
//! ┌─────────┬─────────────────┐
//! │ COMMAND │ PAYLOAD         │
//! │ 1B      │ 0–PORTS bytes   │
//! └─────────┴─────────────────┘
//! ```
//!
//! Every handled command yields reply bytes and, for reboot/reset commands,
//! an [`Action`] the firmware performs after replying.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod dispatch;
pub mod register;

pub use dispatch::{Action, DispatchError, RegisterBank, Reply, Response, ReturnCode, MAX_PORTS};
pub use register::{Command, AUTO_INCREMENT, CONFIG_IO_REGISTER, OUTPUT_PORT_REGISTER};
