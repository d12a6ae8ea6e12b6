use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use crate::models::Recommendation;

/// Local hour from which a new day's batch may be generated
pub const GENERATION_HOUR: u32 = 5;

/// One complete generated batch
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub recommendations: Vec<Recommendation>,
    pub generated_day_key: String,
    pub generated_at: DateTime<Utc>,
    pub version: u64,
}

/// UTC calendar day, "YYYY-MM-DD"
pub fn day_key(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

/// Regenerate when empty, or on a new UTC day once the local clock passes 5 AM
pub fn is_due(entry: Option<&CacheEntry>, now: DateTime<Utc>, local_hour: u32) -> bool {
    match entry {
        None => true,
        Some(entry) => entry.generated_day_key != day_key(now) && local_hour >= GENERATION_HOUR,
    }
}

/// Single-slot cache for the daily recommendation batch
///
/// Entries are swapped wholesale, so readers see either the old or the new
/// batch. Writers are not serialized; the last one wins and every write bumps
/// the version.
#[derive(Debug, Default)]
pub struct DailyCache {
    slot: RwLock<Option<Arc<CacheEntry>>>,
    version: AtomicU64,
}

impl DailyCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> Option<Arc<CacheEntry>> {
        self.slot.read().await.clone()
    }

    pub async fn should_regenerate(&self, now: DateTime<Utc>, local_hour: u32) -> bool {
        is_due(self.slot.read().await.as_deref(), now, local_hour)
    }

    pub async fn replace(
        &self,
        recommendations: Vec<Recommendation>,
        now: DateTime<Utc>,
    ) -> Arc<CacheEntry> {
        let mut slot = self.slot.write().await;
        let version = self.version.fetch_add(1, Ordering::SeqCst) + 1;
        let entry = Arc::new(CacheEntry {
            recommendations,
            generated_day_key: day_key(now),
            generated_at: now,
            version,
        });
        *slot = Some(Arc::clone(&entry));
        entry
    }

    /// Number of replacements so far
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_empty_cache_is_due() {
        let cache = DailyCache::new();
        assert!(cache.should_regenerate(at(1, 2), 2).await);
    }

    #[tokio::test]
    async fn test_same_day_is_not_due() {
        let cache = DailyCache::new();
        cache.replace(vec![], at(1, 6)).await;
        assert!(!cache.should_regenerate(at(1, 23), 23).await);
    }

    #[tokio::test]
    async fn test_new_day_waits_for_generation_hour() {
        let cache = DailyCache::new();
        cache.replace(vec![], at(1, 6)).await;

        assert!(!cache.should_regenerate(at(2, 4), 4).await);
        assert!(cache.should_regenerate(at(2, 5), 5).await);
    }

    #[tokio::test]
    async fn test_replace_bumps_version() {
        let cache = DailyCache::new();
        let first = cache.replace(vec![], at(1, 6)).await;
        let second = cache.replace(vec![], at(2, 6)).await;

        assert_eq!(first.version, 1);
        assert_eq!(second.version, 2);
        assert_eq!(cache.version(), 2);

        let current = cache.snapshot().await.unwrap();
        assert_eq!(current.generated_day_key, "2025-03-02");
        assert_eq!(current.version, 2);
    }
}
