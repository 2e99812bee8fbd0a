//! Redis cache gateway.

use super::{CacheFault, CacheGateway, FaultLatch};
use async_trait::async_trait;
use deadpool_redis::redis::{self, AsyncCommands};
use deadpool_redis::{Config, Connection, Pool, Runtime};
use ledger_config::CacheConfig;
use ledger_core::{LedgerError, LedgerResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Redis-backed [`CacheGateway`].
///
/// `connected` flips once a `PING` succeeds. When a connection cannot be
/// acquired, or a command fails at the I/O level, the link is marked down and a
/// background task re-pings every `reconnect_interval` until it comes back.
/// Requests never wait on that task; they skip the cache while the link is down.
pub struct RedisCacheGateway {
    link: Arc<Link>,
}

struct Link {
    pool: Pool,
    connected: AtomicBool,
    up: AtomicBool,
    healing: AtomicBool,
    reconnect_interval: Duration,
    latch: FaultLatch,
}

impl RedisCacheGateway {
    /// Builds the pool and attempts one connection.
    ///
    /// Only an invalid configuration is an error. An unreachable server yields
    /// a gateway that reports not ready until [`CacheGateway::probe`] succeeds.
    pub async fn connect(config: &CacheConfig) -> LedgerResult<Self> {
        info!(url = %redact(&config.url), "Creating Redis connection pool...");

        let pool = Config::from_url(&config.url)
            .builder()
            .map_err(|e| LedgerError::Configuration(format!("Invalid Redis config: {}", e)))?
            .max_size(config.pool_size)
            .runtime(Runtime::Tokio1)
            .wait_timeout(Some(config.connect_timeout()))
            .create_timeout(Some(config.connect_timeout()))
            .build()
            .map_err(|e| LedgerError::Configuration(format!("Failed to create Redis pool: {}", e)))?;

        let link = Arc::new(Link {
            pool,
            connected: AtomicBool::new(false),
            up: AtomicBool::new(false),
            healing: AtomicBool::new(false),
            reconnect_interval: config.reconnect_interval(),
            latch: FaultLatch::new(),
        });

        if link.ping().await {
            info!("Redis connection established");
        } else {
            warn!("Redis unreachable at startup, analytics will be served uncached");
        }
        Ok(Self { link })
    }

    async fn conn(&self, key: &str) -> Result<Connection, CacheFault> {
        if !self.ready() {
            return Err(CacheFault::Unavailable("link down".to_string()));
        }
        self.link.pool.get().await.map_err(|e| {
            self.link.mark_down();
            let fault = CacheFault::Unavailable(e.to_string());
            self.link.latch.report(key, &fault);
            fault
        })
    }

    fn command_fault(&self, key: &str, err: &redis::RedisError) -> CacheFault {
        let fault = if err.is_io_error() || err.is_connection_dropped() || err.is_timeout() {
            self.link.mark_down();
            CacheFault::Unavailable(err.to_string())
        } else {
            CacheFault::Backend(err.to_string())
        };
        self.link.latch.report(key, &fault);
        fault
    }
}

impl Link {
    async fn ping(&self) -> bool {
        let result = match self.pool.get().await {
            Ok(mut conn) => redis::cmd("PING")
                .query_async::<String>(&mut *conn)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match result {
            Ok(_) => {
                self.connected.store(true, Ordering::Release);
                self.up.store(true, Ordering::Release);
                self.latch.clear();
                true
            }
            Err(e) => {
                self.up.store(false, Ordering::Release);
                self.latch.report("PING", &CacheFault::Unavailable(e));
                false
            }
        }
    }

    /// Marks the link down and starts the re-ping task if none is running.
    ///
    /// A gateway that never connected stays down until probed.
    fn mark_down(self: &Arc<Self>) {
        self.up.store(false, Ordering::Release);
        if !self.connected.load(Ordering::Acquire) || self.healing.swap(true, Ordering::AcqRel) {
            return;
        }
        tokio::spawn(heal(Arc::downgrade(self), self.reconnect_interval));
    }
}

async fn heal(link: Weak<Link>, interval: Duration) {
    debug!(interval = ?interval, "Redis link down, re-pinging in background");
    loop {
        tokio::time::sleep(interval).await;
        let Some(link) = link.upgrade() else {
            return;
        };
        if link.ping().await {
            link.healing.store(false, Ordering::Release);
            return;
        }
    }
}

#[async_trait]
impl CacheGateway for RedisCacheGateway {
    fn ready(&self) -> bool {
        self.link.connected.load(Ordering::Acquire) && self.link.up.load(Ordering::Acquire)
    }

    async fn get_raw(&self, key: &str) -> Result<Option<String>, CacheFault> {
        let mut conn = self.conn(key).await?;
        let value: Option<String> = conn.get(key).await.map_err(|e| self.command_fault(key, &e))?;
        self.link.latch.clear();

        match &value {
            Some(_) => debug!("Cache hit for key '{}'", key),
            None => debug!("Cache miss for key '{}'", key),
        }
        Ok(value)
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheFault> {
        let mut conn = self.conn(key).await?;
        let ttl_secs = ttl.as_secs().max(1);

        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| self.command_fault(key, &e))?;
        self.link.latch.clear();

        debug!("Cached key '{}' with TTL {}s", key, ttl_secs);
        Ok(())
    }

    async fn probe(&self) -> bool {
        self.link.ping().await
    }

    fn backend(&self) -> &'static str {
        "redis"
    }

    fn fault_latch(&self) -> &FaultLatch {
        &self.link.latch
    }
}

/// Hides the password part of a Redis URL.
fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme_end), Some(at)) if at > scheme_end => {
            format!("{}://***{}", &url[..scheme_end], &url[at..])
        }
        _ => url.to_string(),
    }
}
