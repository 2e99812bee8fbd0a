//! Analytics cache gateways.

mod cache_gateway;
mod cache_keys;
mod disabled_gateway;
mod fault;
mod memory_gateway;
mod redis_gateway;

pub use cache_gateway::{CacheGateway, CacheGatewayExt};
pub use cache_keys::{analytics_key, ANALYTICS_PREFIX};
pub use disabled_gateway::DisabledCacheGateway;
pub use fault::{CacheFault, FaultLatch};
pub use memory_gateway::InMemoryCacheGateway;
pub use redis_gateway::RedisCacheGateway;
