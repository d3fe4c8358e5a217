use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use yatube_types::api::PostResponse;
use yatube_types::pagination::Page;

/// Short-lived cache of rendered index pages, keyed by the raw `?page=`
/// value. Entries are not invalidated by writes: a new post shows up on the
/// index once its page expires or the cache is cleared.
pub struct IndexCache {
    ttl: Duration,
    entries: RwLock<HashMap<Option<String>, (Instant, Page<PostResponse>)>>,
}

impl IndexCache {
    /// A zero `ttl` disables caching.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, key: &Option<String>) -> Option<Page<PostResponse>> {
        if self.ttl.is_zero() {
            return None;
        }
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|(stored_at, _)| stored_at.elapsed() < self.ttl)
            .map(|(_, page)| page.clone())
    }

    pub async fn insert(&self, key: Option<String>, page: Page<PostResponse>) {
        if self.ttl.is_zero() {
            return;
        }
        let mut entries = self.entries.write().await;
        entries.retain(|_, (stored_at, _)| stored_at.elapsed() < self.ttl);
        entries.insert(key, (Instant::now(), page));
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yatube_types::pagination::Paginator;

    fn page_of(count: u64) -> Page<PostResponse> {
        Paginator::new(count, 10).page(1, vec![])
    }

    #[tokio::test]
    async fn stores_until_cleared() {
        let cache = IndexCache::new(Duration::from_secs(60));
        assert!(cache.get(&None).await.is_none());

        cache.insert(None, page_of(3)).await;
        assert_eq!(cache.get(&None).await.unwrap().count, 3);
        assert!(cache.get(&Some("2".into())).await.is_none());

        cache.clear().await;
        assert!(cache.get(&None).await.is_none());
    }

    #[tokio::test]
    async fn expired_entries_are_ignored() {
        let cache = IndexCache::new(Duration::from_millis(20));
        cache.insert(None, page_of(1)).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&None).await.is_none());
    }

    #[tokio::test]
    async fn zero_ttl_disables_cache() {
        let cache = IndexCache::new(Duration::ZERO);
        cache.insert(None, page_of(1)).await;
        assert!(cache.get(&None).await.is_none());
    }
}
