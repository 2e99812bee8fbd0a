//! In-process cache gateway.

use super::{CacheFault, CacheGateway, FaultLatch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// A [`CacheGateway`] backed by a process-local map. Always ready.
///
/// Entries expire on the tokio clock, so tests running with paused time can
/// advance past a TTL without sleeping.
#[derive(Debug, Default)]
pub struct InMemoryCacheGateway {
    entries: Mutex<HashMap<String, (String, Instant)>>,
    latch: FaultLatch,
}

impl InMemoryCacheGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .lock()
            .await
            .values()
            .filter(|(_, deadline)| *deadline > now)
            .count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CacheGateway for InMemoryCacheGateway {
    fn ready(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheFault> {
        let mut entries = self.entries.lock().await;
        match entries.get(key) {
            Some((value, deadline)) if *deadline > Instant::now() => Ok(Some(value.clone())),
            Some(_) => {
                entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    /// Stores `value` and drops every entry whose TTL has already passed.
    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheFault> {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;
        entries.retain(|_, (_, deadline)| *deadline > now);
        entries.insert(key.to_string(), (value.to_string(), now + ttl));
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }

    fn fault_latch(&self) -> &FaultLatch {
        &self.latch
    }
}
