//! A bulk-loading, time-expiring keyed cache.
//!
//! [`LoadingCache`] pairs a bounded in-memory cache with a [`CacheLoader`]
//! that knows how to fetch missing entries, either one key at a time or as
//! a single bulk call for a whole missing subset. Entries expire a fixed
//! duration after being written, so values refresh regardless of read
//! frequency.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use anyhow::anyhow;
use async_trait::async_trait;
use moka::future::Cache;

pub mod cloud_area;

/// Fetches entries the cache does not hold.
#[async_trait]
pub trait CacheLoader<K, V>: Send + Sync {
    /// Loads the value for one missing key.
    async fn load(&self, key: &K) -> anyhow::Result<V>;

    /// Loads values for a set of missing keys in a single backend call.
    ///
    /// Must return an entry for every requested key. It may return more;
    /// extra entries are cached as well.
    async fn load_all(&self, keys: &[K]) -> anyhow::Result<HashMap<K, V>>;
}

/// Point-in-time view of the cache counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub loads: u64,
    pub load_failures: u64,
    pub total_load_time: Duration,
}

#[derive(Debug, Default)]
struct CacheMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    loads: AtomicU64,
    load_failures: AtomicU64,
    load_nanos: AtomicU64,
}

impl CacheMetrics {
    fn record_load(&self, elapsed: Duration, ok: bool) {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.load_failures.fetch_add(1, Ordering::Relaxed);
        }
        self.load_nanos
            .fetch_add(elapsed.as_nanos() as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            loads: self.loads.load(Ordering::Relaxed),
            load_failures: self.load_failures.load(Ordering::Relaxed),
            total_load_time: Duration::from_nanos(self.load_nanos.load(Ordering::Relaxed)),
        }
    }
}

pub struct LoadingCache<K, V, L> {
    entries: Cache<K, V>,
    loader: L,
    metrics: CacheMetrics,
}

impl<K, V, L> LoadingCache<K, V, L>
where
    K: Clone + Hash + Eq + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
    L: CacheLoader<K, V>,
{
    /// Builds a cache holding at most `capacity` entries, each expiring
    /// `ttl` after write.
    pub fn new(capacity: u64, ttl: Duration, loader: L) -> Self {
        let entries = Cache::builder()
            .max_capacity(capacity)
            .time_to_live(ttl)
            .build();
        Self {
            entries,
            loader,
            metrics: CacheMetrics::default(),
        }
    }

    /// Returns the cached value for `key`, loading it on a miss.
    ///
    /// Racing readers of the same missing key share a single load.
    pub async fn get(&self, key: &K) -> anyhow::Result<V> {
        if let Some(value) = self.entries.get(key).await {
            self.metrics.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(value);
        }
        self.metrics.misses.fetch_add(1, Ordering::Relaxed);

        let started = Instant::now();
        let loaded = self
            .entries
            .try_get_with(key.clone(), self.loader.load(key))
            .await;
        self.metrics.record_load(started.elapsed(), loaded.is_ok());
        loaded.map_err(|e| anyhow!("cache load failed: {e}"))
    }

    /// Bulk lookup. Hits are served from the cache; all missing keys are
    /// fetched through one `load_all` call.
    ///
    /// The returned map's key set equals the requested key set exactly.
    pub async fn get_all(&self, keys: &HashSet<K>) -> anyhow::Result<HashMap<K, V>> {
        let mut found: HashMap<K, V> = HashMap::with_capacity(keys.len());
        let mut missing: Vec<K> = Vec::new();
        for key in keys {
            match self.entries.get(key).await {
                Some(value) => {
                    self.metrics.hits.fetch_add(1, Ordering::Relaxed);
                    found.insert(key.clone(), value);
                }
                None => {
                    self.metrics.misses.fetch_add(1, Ordering::Relaxed);
                    missing.push(key.clone());
                }
            }
        }

        if missing.is_empty() {
            return Ok(found);
        }

        let started = Instant::now();
        let loaded = self.loader.load_all(&missing).await;
        self.metrics.record_load(started.elapsed(), loaded.is_ok());

        for (key, value) in loaded? {
            self.entries.insert(key.clone(), value.clone()).await;
            if keys.contains(&key) {
                found.insert(key, value);
            }
        }
        Ok(found)
    }

    /// Counter snapshot for a monitoring collaborator.
    pub fn stats(&self) -> CacheStats {
        self.metrics.snapshot()
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
