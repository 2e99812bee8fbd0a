//! Gateway used when caching is switched off.

use super::{CacheFault, CacheGateway, FaultLatch};
use async_trait::async_trait;
use std::time::Duration;

/// A [`CacheGateway`] that is never ready. Every analytics call goes to the
/// database.
#[derive(Debug, Default)]
pub struct DisabledCacheGateway {
    latch: FaultLatch,
}

impl DisabledCacheGateway {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CacheGateway for DisabledCacheGateway {
    fn ready(&self) -> bool {
        false
    }

    async fn get_raw(&self, _key: &str) -> Result<Option<String>, CacheFault> {
        Err(CacheFault::Unavailable("cache disabled".to_string()))
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheFault> {
        Err(CacheFault::Unavailable("cache disabled".to_string()))
    }

    fn backend(&self) -> &'static str {
        "disabled"
    }

    fn fault_latch(&self) -> &FaultLatch {
        &self.latch
    }
}
