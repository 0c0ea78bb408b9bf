//! TTL cache for the catalog pass-through endpoints.
//!
//! Avatars, voices, and the credit balance change rarely but come from the
//! provider's metered API, so reads are served from a process-local cache
//! for the configured TTL. Refresh uses the double-checked write-lock
//! pattern so concurrent misses trigger a single upstream call.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use tracing::debug;

use adgen_models::{Avatar, CreditBalance, VoiceOption};
use adgen_provider::ProviderResult;

struct Cached<T> {
    value: T,
    fetched_at: Instant,
}

impl<T> Cached<T> {
    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

/// One cached slot with single-flight refresh.
struct Slot<T> {
    cell: RwLock<Option<Cached<T>>>,
}

impl<T: Clone> Slot<T> {
    fn new() -> Self {
        Self {
            cell: RwLock::new(None),
        }
    }

    async fn get_or_fetch<F, Fut>(&self, ttl: Duration, fetch: F) -> ProviderResult<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<T>>,
    {
        // Fast path
        {
            let cell = self.cell.read().await;
            if let Some(cached) = cell.as_ref() {
                if cached.is_fresh(ttl) {
                    return Ok(cached.value.clone());
                }
            }
        }

        // Slow path: re-check under the write lock, then fetch
        let mut cell = self.cell.write().await;
        if let Some(cached) = cell.as_ref() {
            if cached.is_fresh(ttl) {
                return Ok(cached.value.clone());
            }
        }

        let value = fetch().await?;
        *cell = Some(Cached {
            value: value.clone(),
            fetched_at: Instant::now(),
        });
        Ok(value)
    }
}

/// Caches for the three catalog reads.
pub struct CatalogCache {
    ttl: Duration,
    avatars: Slot<Vec<Avatar>>,
    voices: Slot<Vec<VoiceOption>>,
    credits: Slot<CreditBalance>,
}

impl CatalogCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            avatars: Slot::new(),
            voices: Slot::new(),
            credits: Slot::new(),
        }
    }

    pub async fn avatars<F, Fut>(&self, fetch: F) -> ProviderResult<Vec<Avatar>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<Vec<Avatar>>>,
    {
        debug!("catalog cache: avatars");
        self.avatars.get_or_fetch(self.ttl, fetch).await
    }

    pub async fn voices<F, Fut>(&self, fetch: F) -> ProviderResult<Vec<VoiceOption>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<Vec<VoiceOption>>>,
    {
        debug!("catalog cache: voices");
        self.voices.get_or_fetch(self.ttl, fetch).await
    }

    pub async fn credit_balance<F, Fut>(&self, fetch: F) -> ProviderResult<CreditBalance>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ProviderResult<CreditBalance>>,
    {
        debug!("catalog cache: credit balance");
        self.credits.get_or_fetch(self.ttl, fetch).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[tokio::test]
    async fn test_fresh_value_skips_fetch() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        let fetches = AtomicU32::new(0);

        for _ in 0..3 {
            let avatars = cache
                .avatars(|| async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(vec![Avatar {
                        id: "a1".into(),
                        name: "Ana".into(),
                        gender: None,
                        preview_url: None,
                    }])
                })
                .await
                .unwrap();
            assert_eq!(avatars.len(), 1);
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expired_value_refetches() {
        let cache = CatalogCache::new(Duration::from_millis(0));
        let fetches = AtomicU32::new(0);

        for _ in 0..2 {
            cache
                .credit_balance(|| async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(CreditBalance {
                        remaining_credits: 42,
                    })
                })
                .await
                .unwrap();
        }

        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fetch_failure_is_not_cached() {
        let cache = CatalogCache::new(Duration::from_secs(60));
        let fetches = AtomicU32::new(0);

        let result = cache
            .voices(|| async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Err(adgen_provider::ProviderError::Timeout)
            })
            .await;
        assert!(result.is_err());

        let voices = cache
            .voices(|| async {
                fetches.fetch_add(1, Ordering::SeqCst);
                Ok(vec![])
            })
            .await
            .unwrap();
        assert!(voices.is_empty());
        assert_eq!(fetches.load(Ordering::SeqCst), 2);
    }
}
