//! # Ledger Core
//!
//! Core types, scoping rules, and error definitions shared by every Ledgerlens
//! crate: principals and roles, exact money, analytics kinds and query scopes,
//! the transaction entity, pagination, and telemetry setup.

pub mod analytics;
pub mod error;
pub mod id;
pub mod money;
pub mod pagination;
pub mod principal;
pub mod result;
pub mod telemetry;
pub mod transaction;

pub use analytics::*;
pub use error::*;
pub use id::*;
pub use money::*;
pub use pagination::*;
pub use principal::*;
pub use result::*;
pub use transaction::*;
