//! Query result cache
//!
//! Bounded LRU of key → result with an explicit expiry. Holds warehouse
//! results only; model state is never cached.

use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::Mutex;

use crate::db::CompanySource;
use crate::models::CompanyRecord;

struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

pub struct QueryCache<K, V> {
    ttl: Duration,
    entries: Mutex<LruCache<K, CacheEntry<V>>>,
}

impl<K, V> QueryCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// A zero capacity is raised to one entry
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fresh value for `key`; an expired entry is evicted
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => {
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(key);
        }
        None
    }

    /// Store `value`; past capacity the least recently used entry goes
    pub fn insert(&self, key: K, value: V) {
        self.entries.lock().put(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock();
        let expired: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.stored_at.elapsed() >= self.ttl)
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired {
            entries.pop(key);
        }
        expired.len()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }
}

/// `CompanySource` memoized by `limit`
pub struct CachedCompanySource {
    inner: Arc<dyn CompanySource>,
    cache: QueryCache<i64, Vec<CompanyRecord>>,
}

impl CachedCompanySource {
    pub fn new(inner: Arc<dyn CompanySource>, capacity: usize, ttl: Duration) -> Self {
        Self {
            inner,
            cache: QueryCache::new(capacity, ttl),
        }
    }
}

#[axum::async_trait]
impl CompanySource for CachedCompanySource {
    async fn high_risk_companies(&self, limit: i64) -> Result<Vec<CompanyRecord>, sqlx::Error> {
        if let Some(hit) = self.cache.get(&limit) {
            tracing::debug!("Company cache hit (limit {})", limit);
            return Ok(hit);
        }

        let purged = self.cache.purge_expired();
        if purged > 0 {
            tracing::debug!(
                "Purged {} expired company queries ({}/{} cached)",
                purged,
                self.cache.len(),
                self.cache.capacity()
            );
        }

        // Lock is not held across the query; concurrent misses may both fetch
        let companies = self.inner.high_risk_companies(limit).await?;
        self.cache.insert(limit, companies.clone());
        Ok(companies)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_hit_within_ttl() {
        let cache = QueryCache::new(8, Duration::from_secs(3600));
        cache.insert(200i64, vec![1, 2, 3]);

        assert_eq!(cache.get(&200), Some(vec![1, 2, 3]));
        assert_eq!(cache.get(&50), None);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_evicted() {
        let cache = QueryCache::new(8, Duration::from_millis(10));
        cache.insert("limit=200", 1u32);
        std::thread::sleep(Duration::from_millis(30));

        assert_eq!(cache.get(&"limit=200"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_purge_expired() {
        let cache = QueryCache::new(8, Duration::ZERO);
        cache.insert(1i64, "a");
        cache.insert(2i64, "b");

        assert_eq!(cache.purge_expired(), 2);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_capacity_evicts_least_recently_used() {
        let cache = QueryCache::new(3, Duration::from_secs(3600));
        for limit in 1..=5000i64 {
            cache.insert(limit, limit as usize);
        }

        assert_eq!(cache.len(), 3);
        assert_eq!(cache.get(&1), None);
        assert_eq!(cache.get(&4997), None);
        assert_eq!(cache.get(&4998), Some(4998));

        // 4998 was just read, so 4999 is now the oldest
        cache.insert(7, 7);
        assert_eq!(cache.get(&4999), None);
        assert_eq!(cache.get(&4998), Some(4998));
        assert_eq!(cache.get(&5000), Some(5000));
        assert_eq!(cache.get(&7), Some(7));
    }

    #[test]
    fn test_zero_capacity_keeps_one_entry() {
        let cache = QueryCache::new(0, Duration::from_secs(60));
        cache.insert("a", 1);
        cache.insert("b", 2);

        assert_eq!(cache.capacity(), 1);
        assert_eq!(cache.get(&"a"), None);
        assert_eq!(cache.get(&"b"), Some(2));
    }

    struct CountingSource {
        calls: AtomicUsize,
    }

    #[axum::async_trait]
    impl CompanySource for CountingSource {
        async fn high_risk_companies(&self, limit: i64) -> Result<Vec<CompanyRecord>, sqlx::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok((0..limit as usize).map(CompanyRecord::sample).collect())
        }
    }

    #[tokio::test]
    async fn test_cached_source_queries_once_per_limit() {
        let inner = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
        });
        let source = CachedCompanySource::new(inner.clone(), 16, Duration::from_secs(3600));

        let first = source.high_risk_companies(5).await.unwrap();
        let second = source.high_risk_companies(5).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);

        source.high_risk_companies(8).await.unwrap();
        assert_eq!(inner.calls.load(Ordering::SeqCst), 2);
    }
}
