use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

struct CacheEntry<T> {
    value: T,
    cached_at: Instant,
}

/// In-memory TTL cache keyed by string.
///
/// The map lock is held across the whole lookup-or-populate call, so
/// concurrent requests for the same key trigger exactly one upstream fetch
/// per TTL window. Entries are refreshed lazily on access; there is no
/// background eviction task.
pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the cached value for `key`, or runs `populate` and stores its
    /// result. A populate failure leaves the cache untouched so the next
    /// caller retries.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, populate: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut entries = self.entries.lock().await;
        if let Some(entry) = entries.get(key) {
            if entry.cached_at.elapsed() < self.ttl {
                debug!(key, "cache hit");
                return Ok(entry.value.clone());
            }
        }

        debug!(key, "cache miss");
        let value = populate().await?;
        entries.insert(
            key.to_string(),
            CacheEntry {
                value: value.clone(),
                cached_at: Instant::now(),
            },
        );
        Ok(value)
    }

    #[cfg(test)]
    pub async fn clear(&self) {
        self.entries.lock().await.clear();
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn second_lookup_within_ttl_skips_populate() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        for _ in 0..3 {
            let value: Result<u32, ()> = cache
                .get_or_try_insert_with("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(42)
                })
                .await;
            assert_eq!(value, Ok(42));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn expired_entry_is_repopulated() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_millis(10));
        let calls = AtomicUsize::new(0);

        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(7)
        };
        cache.get_or_try_insert_with("k", fetch).await.unwrap();
        tokio::time::sleep(Duration::from_millis(20)).await;
        cache.get_or_try_insert_with("k", fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn populate_failure_is_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let failed: Result<u32, &str> = cache
            .get_or_try_insert_with("k", || async { Err("upstream down") })
            .await;
        assert!(failed.is_err());
        assert_eq!(cache.len().await, 0);

        let ok: Result<u32, &str> = cache
            .get_or_try_insert_with("k", || async { Ok(9) })
            .await;
        assert_eq!(ok, Ok(9));
    }

    #[tokio::test]
    async fn distinct_keys_do_not_collide() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        cache
            .get_or_try_insert_with("a", || async { Ok::<_, ()>(1) })
            .await
            .unwrap();
        cache
            .get_or_try_insert_with("b", || async { Ok::<_, ()>(2) })
            .await
            .unwrap();

        let a = cache
            .get_or_try_insert_with("a", || async { Ok::<_, ()>(99) })
            .await
            .unwrap();
        assert_eq!(a, 1);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn clear_forces_refetch() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let fetch = || async {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ()>(5)
        };

        cache.get_or_try_insert_with("k", fetch).await.unwrap();
        cache.clear().await;
        cache.get_or_try_insert_with("k", fetch).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
