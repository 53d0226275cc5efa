//! Read-through query cache.
//!
//! Keyed by the [`ProjectedQuery`] value, which is sound because the
//! query builder is deterministic: equal queries mean equal requests.
//! Entries are immutable once written and evicted by TTL; the store is
//! never mutated by this system, so there is no invalidation to do.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use folio_core::ProjectedQuery;
use folio_doc_types::Document;

#[derive(Debug)]
struct CacheEntry {
    documents: Vec<Document>,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct QueryCache {
    ttl: Duration,
    entries: Mutex<HashMap<ProjectedQuery, CacheEntry>>,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Fetch a live entry, evicting it if its TTL has lapsed.
    pub fn get(&self, query: &ProjectedQuery) -> Option<Vec<Document>> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(query) {
            Some(entry) if entry.expires_at > Instant::now() => Some(entry.documents.clone()),
            Some(_) => {
                entries.remove(query);
                None
            }
            None => None,
        }
    }

    pub fn put(&self, query: ProjectedQuery, documents: Vec<Document>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(
                query,
                CacheEntry {
                    documents,
                    expires_at: Instant::now() + self.ttl,
                },
            );
        }
    }
}
