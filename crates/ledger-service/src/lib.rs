//! # Ledger Service
//!
//! Application services for Ledgerlens: cache-aside analytics over an
//! [`ledger_repository::AggregationEngine`] and transaction CRUD with
//! ownership checks.

pub mod analytics_service;
pub mod cache;
pub mod dto;
pub mod r#impl;
pub mod metrics;
pub mod transaction_service;
pub mod ttl;

pub use analytics_service::*;
pub use cache::*;
pub use dto::*;
pub use r#impl::*;
pub use transaction_service::*;
pub use ttl::AnalyticsTtl;
