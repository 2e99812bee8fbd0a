//! Service implementations.
//!
//! Trait definitions live in the parent module (e.g. `analytics_service.rs`).

pub mod analytics_service_impl;
pub mod transaction_service_impl;

pub use analytics_service_impl::AnalyticsServiceImpl;
pub use transaction_service_impl::TransactionServiceImpl;
