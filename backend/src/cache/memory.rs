//! In-process key/value store with per-entry expiry

use std::time::{Duration, Instant};

use moka::{future::Cache, Expiry};

/// Entry bound for a single process
pub const DEFAULT_MAX_ENTRIES: u64 = 10_000;

/// Longest lifetime an entry may be given
const MAX_ENTRY_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    ttl: Duration,
}

/// Each write restarts the entry's lifetime with its own TTL
struct WriteTtl;

impl Expiry<String, Entry> for WriteTtl {
    fn expire_after_create(&self, _key: &String, entry: &Entry, _created_at: Instant) -> Option<Duration> {
        Some(entry.ttl)
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &Entry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(entry.ttl)
    }
}

/// Bounded TTL cache; clones refer to the same store
#[derive(Clone)]
pub struct MemoryStore {
    entries: Cache<String, Entry>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .expire_after(WriteTtl)
            .build();

        Self { entries }
    }

    pub async fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).await.map(|entry| entry.value)
    }

    pub async fn set(&self, key: &str, value: &str, ttl: Duration) {
        let entry = Entry {
            value: value.to_string(),
            ttl: ttl.min(MAX_ENTRY_TTL),
        };
        self.entries.insert(key.to_string(), entry).await;
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}
