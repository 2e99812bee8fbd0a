//! # Ledgerlens Server Library
//!
//! Wiring and startup utilities for the Ledgerlens server binary.

pub mod di;
pub mod startup;
