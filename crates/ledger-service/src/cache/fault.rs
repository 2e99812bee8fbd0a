//! Cache faults and the latch that keeps them from flooding the log.

use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A failed cache operation.
///
/// Never surfaced to callers: the analytics service turns every fault into a
/// cache miss and carries on against the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheFault {
    /// No live connection to the backend.
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    /// The backend rejected or failed a command.
    #[error("cache backend error: {0}")]
    Backend(String),

    /// A cached value could not be encoded or decoded.
    #[error("cache serialization error: {0}")]
    Serialization(String),
}

impl CacheFault {
    /// Metric label.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Backend(_) => "backend",
            Self::Serialization(_) => "serialization",
        }
    }

    const fn slot(&self) -> usize {
        match self {
            Self::Unavailable(_) => 0,
            Self::Backend(_) => 1,
            Self::Serialization(_) => 2,
        }
    }
}

/// Remembers which fault conditions have already been logged.
///
/// The first fault of each kind logs at `warn`, repeats log at `debug`. A
/// successful operation clears the latch so the next outage is reported again.
#[derive(Debug, Default)]
pub struct FaultLatch {
    tripped: [AtomicBool; 3],
}

impl FaultLatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `fault`; returns true if this is the first report of its kind.
    pub fn report(&self, key: &str, fault: &CacheFault) -> bool {
        let first = !self.tripped[fault.slot()].swap(true, Ordering::AcqRel);
        if first {
            warn!(key = %key, error = %fault, "Cache fault, serving from the database until it clears");
        } else {
            debug!(key = %key, error = %fault, "Cache fault (repeat)");
        }
        first
    }

    /// Clears the latch after a successful operation.
    pub fn clear(&self) {
        let mut was_tripped = false;
        for slot in &self.tripped {
            was_tripped |= slot.swap(false, Ordering::AcqRel);
        }
        if was_tripped {
            info!("Cache recovered");
        }
    }

    /// Returns true if any fault kind is currently latched.
    #[must_use]
    pub fn is_tripped(&self) -> bool {
        self.tripped.iter().any(|slot| slot.load(Ordering::Acquire))
    }
}
