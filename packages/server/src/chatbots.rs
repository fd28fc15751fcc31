//! Site-name lookup cache.
//!
//! Chatbot names are immutable once created, so responses cache them
//! per chatbot id instead of re-reading the row on every request. The
//! cache is bounded: once it reaches capacity it is cleared rather
//! than evicted entry by entry, which is cheap and good enough for a
//! read-mostly lookup.

use std::collections::HashMap;
use std::sync::RwLock;
use uuid::Uuid;

const CAPACITY: usize = 1024;

/// Bounded in-process cache of chatbot display names.
#[derive(Default)]
pub struct SiteNameCache {
    names: RwLock<HashMap<Uuid, String>>,
}

impl SiteNameCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: Uuid) -> Option<String> {
        self.names.read().ok()?.get(&id).cloned()
    }

    pub fn insert(&self, id: Uuid, name: String) {
        if let Ok(mut names) = self.names.write() {
            if names.len() >= CAPACITY {
                names.clear();
            }
            names.insert(id, name);
        }
    }
}
