//! Cache key construction.
//!
//! Keys have the form `analytics:{kind}:{identity}:year:{year}` where the
//! identity is `all-users` or `user-<id>`. Two scopes share a key exactly when
//! they would read the same rows.

use ledger_core::QueryScope;

/// Prefix shared by every analytics key.
pub const ANALYTICS_PREFIX: &str = "analytics";

/// Returns the cache key for `scope`.
#[must_use]
pub fn analytics_key(scope: &QueryScope) -> String {
    format!(
        "{}:{}:{}:year:{}",
        ANALYTICS_PREFIX,
        scope.kind.as_str(),
        scope.identity_segment(),
        scope.year
    )
}
