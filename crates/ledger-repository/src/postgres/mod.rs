//! Postgres implementations.

mod aggregation_engine;
mod transaction_repository;

pub use aggregation_engine::PgAggregationEngine;
pub use transaction_repository::PgTransactionRepository;
