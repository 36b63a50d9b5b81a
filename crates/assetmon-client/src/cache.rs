//! Process-wide query cache.
//!
//! Pull results are shared between views through one keyed store. Entries
//! are typed by the caller and expire by age; a configuration save
//! invalidates the affected keys explicitly.

use assetmon_telemetry::Metrics;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Cache key: `(endpoint, id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Assets,
    Asset(String),
    Telemetry(String),
    Power(String),
    Configuration(String),
    Configurations,
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Assets => write!(f, "assets"),
            Self::Asset(id) => write!(f, "asset:{id}"),
            Self::Telemetry(id) => write!(f, "telemetry:{id}"),
            Self::Power(id) => write!(f, "power:{id}"),
            Self::Configuration(id) => write!(f, "configuration:{id}"),
            Self::Configurations => write!(f, "configurations"),
        }
    }
}

struct CacheEntry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

static GLOBAL: Lazy<Arc<QueryCache>> = Lazy::new(|| Arc::new(QueryCache::new()));

/// Keyed store of pull results.
#[derive(Default)]
pub struct QueryCache {
    entries: DashMap<QueryKey, CacheEntry>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide cache, created on first access.
    pub fn global() -> Arc<QueryCache> {
        GLOBAL.clone()
    }

    /// Get a cached value younger than `max_age`.
    ///
    /// Returns `None` on a miss, an expired entry, or a type mismatch.
    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey, max_age: Duration) -> Option<Arc<T>> {
        let entry = self.entries.get(key)?;
        if entry.fetched_at.elapsed() > max_age {
            return None;
        }
        entry.value.clone().downcast::<T>().ok()
    }

    /// Store a value, replacing any previous entry.
    pub fn insert<T: Send + Sync + 'static>(&self, key: QueryKey, value: T) -> Arc<T> {
        let value = Arc::new(value);
        self.entries.insert(
            key,
            CacheEntry {
                value: value.clone(),
                fetched_at: Instant::now(),
            },
        );
        value
    }

    /// Age of an entry.
    pub fn age(&self, key: &QueryKey) -> Option<Duration> {
        self.entries.get(key).map(|e| e.fetched_at.elapsed())
    }

    /// Drop one entry. Returns true if it existed.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let removed = self.entries.remove(key).is_some();
        if removed {
            debug!(%key, "Query cache entry invalidated");
            Metrics::cache_invalidated();
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRESH: Duration = Duration::from_secs(60);

    #[test]
    fn test_insert_and_get() {
        let cache = QueryCache::new();
        let stored = cache.insert(QueryKey::Assets, vec![1u32, 2, 3]);
        let hit = cache.get::<Vec<u32>>(&QueryKey::Assets, FRESH).unwrap();
        assert!(Arc::ptr_eq(&stored, &hit));
    }

    #[test]
    fn test_type_mismatch_is_miss() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Assets, vec![1u32]);
        assert!(cache.get::<String>(&QueryKey::Assets, FRESH).is_none());
    }

    #[test]
    fn test_expired_is_miss() {
        let cache = QueryCache::new();
        cache.insert(QueryKey::Power("A1".to_string()), 1.5f64);
        std::thread::sleep(Duration::from_millis(5));
        assert!(cache
            .get::<f64>(&QueryKey::Power("A1".to_string()), Duration::ZERO)
            .is_none());
        assert!(cache
            .get::<f64>(&QueryKey::Power("A1".to_string()), FRESH)
            .is_some());
    }

    #[test]
    fn test_invalidate() {
        let cache = QueryCache::new();
        let key = QueryKey::Configuration("A1".to_string());
        cache.insert(key.clone(), Some(3u8));
        assert!(cache.invalidate(&key));
        assert!(!cache.invalidate(&key));
        assert!(cache.get::<Option<u8>>(&key, FRESH).is_none());
    }

    #[test]
    fn test_age_tracks_entry() {
        let cache = QueryCache::new();
        let key = QueryKey::Telemetry("A1".to_string());
        assert!(cache.age(&key).is_none());

        cache.insert(key.clone(), 2u8);
        cache.insert(QueryKey::Telemetry("A2".to_string()), 3u8);
        assert!(cache.age(&key).is_some_and(|age| age < FRESH));
        assert_eq!(cache.len(), 2);

        cache.invalidate(&key);
        assert!(cache.age(&key).is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_global_is_shared() {
        let a = QueryCache::global();
        let b = QueryCache::global();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_key_display() {
        assert_eq!(QueryKey::Power("A1".to_string()).to_string(), "power:A1");
        assert_eq!(QueryKey::Configurations.to_string(), "configurations");
    }
}
