//! Time-boxed, size-bounded memoization of backend responses.
//!
//! Keys are (request kind, serialized context). Entries age out after the
//! TTL and the queue evicts oldest-inserted-first once full; a hit
//! re-inserts the entry at the back so frequently re-asked prompts
//! survive longer.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use super::RequestKind;

struct Entry {
    kind: RequestKind,
    context: String,
    response: String,
    stored_at: Instant,
}

pub struct PromptCache {
    entries: VecDeque<Entry>,
    capacity: usize,
    ttl: Duration,
}

impl PromptCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        PromptCache {
            entries: VecDeque::new(),
            capacity,
            ttl,
        }
    }

    /// Look up a non-expired entry. An expired entry is deleted and
    /// counts as a miss; a hit is promoted to most-recently-inserted.
    pub fn get(&mut self, kind: RequestKind, context: &str) -> Option<String> {
        let idx = self
            .entries
            .iter()
            .position(|e| e.kind == kind && e.context == context)?;
        if self.entries[idx].stored_at.elapsed() >= self.ttl {
            let _ = self.entries.remove(idx);
            return None;
        }
        let entry = self.entries.remove(idx)?;
        let response = entry.response.clone();
        self.entries.push_back(entry);
        Some(response)
    }

    /// Store a response, replacing any entry under the same key and
    /// evicting the oldest-inserted entry once over capacity.
    pub fn insert(&mut self, kind: RequestKind, context: String, response: String) {
        if let Some(idx) = self
            .entries
            .iter()
            .position(|e| e.kind == kind && e.context == context)
        {
            let _ = self.entries.remove(idx);
        }
        self.entries.push_back(Entry {
            kind,
            context,
            response,
            stored_at: Instant::now(),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
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

    fn cache(capacity: usize) -> PromptCache {
        PromptCache::new(capacity, Duration::from_secs(300))
    }

    #[test]
    fn round_trip() {
        let mut c = cache(10);
        c.insert(RequestKind::Taunt, "level1".into(), "ha!".into());
        assert_eq!(c.get(RequestKind::Taunt, "level1").as_deref(), Some("ha!"));
    }

    #[test]
    fn kind_is_part_of_the_key() {
        let mut c = cache(10);
        c.insert(RequestKind::Taunt, "level1".into(), "ha!".into());
        assert_eq!(c.get(RequestKind::Briefing, "level1"), None);
    }

    #[test]
    fn zero_ttl_expires_immediately() {
        let mut c = PromptCache::new(10, Duration::ZERO);
        c.insert(RequestKind::Taunt, "level1".into(), "ha!".into());
        assert_eq!(c.get(RequestKind::Taunt, "level1"), None);
        // the expired read deleted the entry
        assert!(c.is_empty());
    }

    #[test]
    fn over_capacity_evicts_oldest_inserted() {
        let mut c = cache(3);
        c.insert(RequestKind::Taunt, "a".into(), "1".into());
        c.insert(RequestKind::Taunt, "b".into(), "2".into());
        c.insert(RequestKind::Taunt, "c".into(), "3".into());
        c.insert(RequestKind::Taunt, "d".into(), "4".into());
        assert_eq!(c.len(), 3);
        assert_eq!(c.get(RequestKind::Taunt, "a"), None);
        assert_eq!(c.get(RequestKind::Taunt, "b").as_deref(), Some("2"));
    }

    #[test]
    fn hit_promotes_entry_out_of_eviction_order() {
        let mut c = cache(3);
        c.insert(RequestKind::Taunt, "a".into(), "1".into());
        c.insert(RequestKind::Taunt, "b".into(), "2".into());
        c.insert(RequestKind::Taunt, "c".into(), "3".into());
        // touch "a" so "b" becomes the oldest
        assert!(c.get(RequestKind::Taunt, "a").is_some());
        c.insert(RequestKind::Taunt, "d".into(), "4".into());
        assert_eq!(c.get(RequestKind::Taunt, "b"), None);
        assert_eq!(c.get(RequestKind::Taunt, "a").as_deref(), Some("1"));
    }

    #[test]
    fn reinsert_replaces_value_under_same_key() {
        let mut c = cache(3);
        c.insert(RequestKind::Taunt, "a".into(), "old".into());
        c.insert(RequestKind::Taunt, "a".into(), "new".into());
        assert_eq!(c.len(), 1);
        assert_eq!(c.get(RequestKind::Taunt, "a").as_deref(), Some("new"));
    }
}
