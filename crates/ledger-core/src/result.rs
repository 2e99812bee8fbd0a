//! Result type aliases for Ledgerlens.

use crate::LedgerError;

/// A specialized `Result` type for Ledgerlens operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
