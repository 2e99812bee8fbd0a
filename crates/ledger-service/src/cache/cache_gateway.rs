//! Cache gateway trait for the analytics read-through cache.

use super::{CacheFault, FaultLatch};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Access to an external key/value store holding serialized analytics payloads.
///
/// Implementations own their connection state. Faults are returned as
/// [`CacheFault`] after being reported to the gateway's [`FaultLatch`]; callers
/// treat them as misses.
#[async_trait]
pub trait CacheGateway: Send + Sync {
    /// True only while a live connection is established. Never blocks.
    fn ready(&self) -> bool;

    /// Reads a raw value. `Ok(None)` when the key is absent or expired.
    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheFault>;

    /// Writes a raw value expiring after `ttl`.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheFault>;

    /// Actively checks the backend and refreshes [`CacheGateway::ready`].
    async fn probe(&self) -> bool {
        self.ready()
    }

    /// Backend name for logs and health output.
    fn backend(&self) -> &'static str;

    /// Latch used to log each fault condition once.
    fn fault_latch(&self) -> &FaultLatch;
}

/// Typed JSON helpers over [`CacheGateway`].
#[async_trait]
pub trait CacheGatewayExt: CacheGateway {
    /// Reads and decodes a value. A value that fails to decode is a
    /// [`CacheFault::Serialization`].
    async fn get_json<T: DeserializeOwned + Send>(&self, key: &str) -> Result<Option<T>, CacheFault> {
        match self.get_raw(key).await? {
            Some(json) => serde_json::from_str(&json).map(Some).map_err(|e| {
                let fault = CacheFault::Serialization(e.to_string());
                self.fault_latch().report(key, &fault);
                fault
            }),
            None => Ok(None),
        }
    }

    /// Encodes and writes a value.
    async fn set_json<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> Result<(), CacheFault> {
        let json = serde_json::to_string(value).map_err(|e| {
            let fault = CacheFault::Serialization(e.to_string());
            self.fault_latch().report(key, &fault);
            fault
        })?;
        self.set_raw(key, &json, ttl).await
    }
}

impl<T: CacheGateway + ?Sized> CacheGatewayExt for T {}
