//! # Ledger Repository
//!
//! Data access for Ledgerlens.
//!
//! ```text
//! Service
//!   ↓  Arc<dyn AggregationEngine> / Arc<dyn TransactionRepository>
//! PgAggregationEngine, PgTransactionRepository   (Postgres / SQLx)
//! InMemoryLedger                                 (in-process, same semantics)
//! ```

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod traits;

pub use memory::InMemoryLedger;
pub use pool::*;
pub use postgres::*;
pub use traits::*;
