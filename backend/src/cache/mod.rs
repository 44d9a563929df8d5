//! Snapshot cache adapter
//!
//! ```text
//! CacheStore
//!   ├── Redis(ConnectionManager)  <- `redis://` / `rediss://` URLs
//!   ├── Memory(MemoryStore)       <- `memory://`, single instance only
//!   └── Disabled                  <- no URL, or the store was unreachable at startup
//! ```
//!
//! Every operation is best-effort. Store errors are logged and reported to the
//! caller as a miss (`get`) or a failed write (`set_with_expiry`); they never
//! propagate. The connection is attempted once at startup; if that fails the
//! adapter stays disabled for the lifetime of the process.
//!
//! A connected adapter keeps serving operations after a transient failure.
//! `is_connected` tracks the outcome of the latest operation, while
//! `is_enabled` only says whether a store was configured and reachable at
//! startup.

mod memory;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use redis::{aio::ConnectionManager, AsyncCommands};

pub use memory::MemoryStore;

/// Upper bound on establishing the initial connection
const CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

/// Upper bound on a single get/set round trip
const OPERATION_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Clone)]
enum CacheBackend {
    Redis(ConnectionManager),
    Memory(MemoryStore),
    Disabled,
}

/// Best-effort key/value store with expiry
#[derive(Clone)]
pub struct CacheStore {
    backend: CacheBackend,
    connected: Arc<AtomicBool>,
}

impl CacheStore {
    /// Connect to the store at `url`, falling back to disabled mode on any failure
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else {
            tracing::warn!("No cache URL configured, running without cache");
            return Self::disabled();
        };

        if url.starts_with("memory://") {
            tracing::info!("Using in-process memory cache");
            return Self::memory();
        }

        match connect_redis(url).await {
            Ok(manager) => {
                tracing::info!("Cache connection established");
                Self::with_backend(CacheBackend::Redis(manager), true)
            }
            Err(message) => {
                tracing::warn!(error = %message, "Cache unavailable, running without cache");
                Self::disabled()
            }
        }
    }

    /// Adapter that never caches
    pub fn disabled() -> Self {
        Self::with_backend(CacheBackend::Disabled, false)
    }

    /// Adapter backed by an in-process store
    pub fn memory() -> Self {
        Self::with_backend(CacheBackend::Memory(MemoryStore::new()), true)
    }

    fn with_backend(backend: CacheBackend, connected: bool) -> Self {
        Self {
            backend,
            connected: Arc::new(AtomicBool::new(connected)),
        }
    }

    /// Whether the store is currently reachable
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::Relaxed)
    }

    /// Whether operations are attempted at all
    pub fn is_enabled(&self) -> bool {
        !matches!(self.backend, CacheBackend::Disabled)
    }

    /// Fetch the value stored under `key`; errors count as a miss
    pub async fn get(&self, key: &str) -> Option<String> {
        match &self.backend {
            CacheBackend::Disabled => None,
            CacheBackend::Memory(store) => store.get(key).await,
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                let result = tokio::time::timeout(OPERATION_TIMEOUT, conn.get::<_, Option<String>>(key)).await;
                match flatten(result) {
                    Ok(value) => {
                        self.mark_connected();
                        value
                    }
                    Err(err) => {
                        self.record_failure("get", key, &err);
                        None
                    }
                }
            }
        }
    }

    /// Store `value` under `key` for `ttl`, replacing any previous value.
    ///
    /// Returns whether the write went through.
    pub async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> bool {
        let ttl = ttl.max(Duration::from_secs(1));
        match &self.backend {
            CacheBackend::Disabled => false,
            CacheBackend::Memory(store) => {
                store.set(key, value, ttl).await;
                true
            }
            CacheBackend::Redis(manager) => {
                let mut conn = manager.clone();
                let result = tokio::time::timeout(
                    OPERATION_TIMEOUT,
                    conn.set_ex::<_, _, ()>(key, value, ttl.as_secs()),
                )
                .await;
                match flatten(result) {
                    Ok(()) => {
                        self.mark_connected();
                        true
                    }
                    Err(err) => {
                        self.record_failure("set", key, &err);
                        false
                    }
                }
            }
        }
    }

    fn mark_connected(&self) {
        if !self.connected.swap(true, Ordering::Relaxed) {
            tracing::info!("Cache connection restored");
        }
    }

    fn record_failure(&self, operation: &str, key: &str, err: &CacheError) {
        tracing::warn!(operation, key, error = %err, "Cache operation failed");
        if err.is_connection_level() {
            self.connected.store(false, Ordering::Relaxed);
        }
    }
}

async fn connect_redis(url: &str) -> Result<ConnectionManager, String> {
    let client = redis::Client::open(url).map_err(|e| e.to_string())?;
    match tokio::time::timeout(CONNECT_TIMEOUT, client.get_connection_manager()).await {
        Ok(Ok(manager)) => Ok(manager),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("timed out connecting to cache".to_string()),
    }
}

/// Store failures, never surfaced past this module
#[derive(Debug, thiserror::Error)]
enum CacheError {
    #[error("cache operation timed out")]
    Timeout,

    #[error(transparent)]
    Redis(#[from] redis::RedisError),
}

impl CacheError {
    fn is_connection_level(&self) -> bool {
        match self {
            CacheError::Timeout => true,
            CacheError::Redis(e) => {
                e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() || e.is_timeout()
            }
        }
    }
}

fn flatten<T>(
    result: Result<redis::RedisResult<T>, tokio::time::error::Elapsed>,
) -> Result<T, CacheError> {
    match result {
        Ok(inner) => inner.map_err(CacheError::from),
        Err(_) => Err(CacheError::Timeout),
    }
}
