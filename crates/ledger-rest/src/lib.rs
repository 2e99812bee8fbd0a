//! # Ledger REST
//!
//! HTTP surface of Ledgerlens: analytics and transaction endpoints behind
//! bearer authentication, health probes, metrics and Swagger UI.

pub mod controllers;
pub mod extractors;
pub mod middleware;
pub mod openapi;
pub mod responses;
pub mod router;
pub mod state;

pub use router::*;
pub use state::*;
