//! Configuration types
//!
//! Board-agnostic scheduler configuration, optionally postcard-encoded.

pub mod types;

pub use types::*;
