use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};

/// Entries are scoped to the caller's API key, kept only as a hash.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub url: String,
    pub max_length: usize,
    key_hash: u64,
}

impl CacheKey {
    pub fn new(url: impl Into<String>, max_length: usize, api_key: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        api_key.hash(&mut hasher);

        Self {
            url: url.into(),
            max_length,
            key_hash: hasher.finish(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CachedSummary {
    pub summary: String,
    pub stored_at: DateTime<Utc>,
}

/// In-memory summary memo with a fixed time-to-live.
pub struct SummaryCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CachedSummary>>,
}

impl SummaryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<String> {
        self.get_at(key, Utc::now())
    }

    pub fn insert(&self, key: CacheKey, summary: String) {
        self.insert_at(key, summary, Utc::now());
    }

    fn get_at(&self, key: &CacheKey, now: DateTime<Utc>) -> Option<String> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        let fresh = entries
            .get(key)
            .map(|cached| now - cached.stored_at < self.ttl)?;

        if fresh {
            entries.get(key).map(|cached| cached.summary.clone())
        } else {
            entries.remove(key);
            None
        }
    }

    fn insert_at(&self, key: CacheKey, summary: String, stored_at: DateTime<Utc>) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.retain(|_, cached| stored_at - cached.stored_at < self.ttl);
        entries.insert(key, CachedSummary { summary, stored_at });
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
