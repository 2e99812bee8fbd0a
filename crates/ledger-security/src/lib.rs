//! # Ledger Security
//!
//! Turns bearer tokens into [`ledger_core::Principal`]s and checks what a
//! principal may do.

pub mod jwt;
pub mod rbac;

pub use jwt::*;
pub use rbac::*;
