//! # Ledger Config
//!
//! Configuration for Ledgerlens, layered from TOML files, a `.env` file and
//! `LEDGER_`-prefixed environment variables.

mod app_config;
mod loader;

pub use app_config::*;
pub use loader::*;
