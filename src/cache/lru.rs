//! LRU cache
//!
//! HashMap index over an arena of entries threaded on a doubly-linked
//! recency list. The arena grows up to capacity and is then recycled in
//! place: evicting the tail frees exactly the slot the new entry needs.

use std::collections::HashMap;
use std::hash::Hash;

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Fixed-capacity least-recently-used map
///
/// Invariant: every key in `map` points at exactly one arena slot, and every
/// slot is linked into the list exactly once. `head` is most recently used,
/// `tail` least.
#[derive(Debug)]
pub struct LruCache<K, V> {
    map: HashMap<K, usize>,
    slots: Vec<Entry<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    /// Create an empty cache holding at most `capacity` entries
    ///
    /// # Panics
    /// If `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "LRU capacity must be non-zero");
        Self {
            map: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// Look up `key`, promoting it to most recently used on a hit
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.map.get(key)?;
        self.promote(idx);
        Some(&self.slots[idx].value)
    }

    /// Look up `key` without touching recency
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.map.get(key).map(|&idx| &self.slots[idx].value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.map.contains_key(key)
    }

    /// Insert or replace `key`, making it most recently used
    ///
    /// When a new key arrives at capacity, the least recently used entry is
    /// evicted first and returned.
    pub fn insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.map.get(&key) {
            self.slots[idx].value = value;
            self.promote(idx);
            return None;
        }

        if self.slots.len() < self.capacity {
            let idx = self.slots.len();
            self.slots.push(Entry {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.push_front(idx);
            self.map.insert(key, idx);
            return None;
        }

        // Full: recycle the tail slot
        let idx = self.tail?;
        self.unlink(idx);
        let slot = &mut self.slots[idx];
        let old_key = std::mem::replace(&mut slot.key, key.clone());
        let old_value = std::mem::replace(&mut slot.value, value);
        self.map.remove(&old_key);
        self.map.insert(key, idx);
        self.push_front(idx);

        Some((old_key, old_value))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used
    pub fn keys_mru(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.len());
        let mut cursor = self.head;
        while let Some(idx) = cursor {
            keys.push(self.slots[idx].key.clone());
            cursor = self.slots[idx].next;
        }
        keys
    }

    // =========================================================================
    // List Maintenance
    // =========================================================================

    fn promote(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = {
            let entry = &self.slots[idx];
            (entry.prev, entry.next)
        };

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        let entry = &mut self.slots[idx];
        entry.prev = None;
        entry.next = None;
    }

    fn push_front(&mut self, idx: usize) {
        let old_head = self.head;
        {
            let entry = &mut self.slots[idx];
            entry.prev = None;
            entry.next = old_head;
        }
        if let Some(h) = old_head {
            self.slots[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Walk the list both ways and check it agrees with the map
    fn assert_in_sync<K: Hash + Eq + Clone + std::fmt::Debug, V>(cache: &LruCache<K, V>) {
        let forward = cache.keys_mru();
        assert_eq!(forward.len(), cache.map.len());
        for key in &forward {
            let idx = cache.map[key];
            assert_eq!(&cache.slots[idx].key, key);
        }

        let mut backward = Vec::new();
        let mut cursor = cache.tail;
        while let Some(idx) = cursor {
            backward.push(cache.slots[idx].key.clone());
            cursor = cache.slots[idx].prev;
        }
        backward.reverse();
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_insert_orders_most_recent_first() {
        let mut cache = LruCache::new(3);
        cache.insert(1, "a");
        cache.insert(2, "b");
        cache.insert(3, "c");

        assert_eq!(cache.keys_mru(), vec![3, 2, 1]);
        assert_in_sync(&cache);
    }

    #[test]
    fn test_eviction_recycles_tail() {
        let mut cache = LruCache::new(2);
        cache.insert(1, "a");
        cache.insert(2, "b");

        assert_eq!(cache.insert(3, "c"), Some((1, "a")));
        assert_eq!(cache.slots.len(), 2);
        assert!(!cache.contains(&1));
        assert_eq!(cache.keys_mru(), vec![3, 2]);
        assert_in_sync(&cache);
    }

    #[test]
    fn test_get_promotes_middle_and_tail() {
        let mut cache = LruCache::new(3);
        cache.insert(1, ());
        cache.insert(2, ());
        cache.insert(3, ());

        cache.get(&2);
        assert_eq!(cache.keys_mru(), vec![2, 3, 1]);
        assert_in_sync(&cache);

        cache.get(&1);
        assert_eq!(cache.keys_mru(), vec![1, 2, 3]);
        assert_in_sync(&cache);
    }

    #[test]
    fn test_replace_existing_key_promotes() {
        let mut cache = LruCache::new(2);
        cache.insert(1, 10);
        cache.insert(2, 20);

        assert_eq!(cache.insert(1, 11), None);
        assert_eq!(cache.peek(&1), Some(&11));
        assert_eq!(cache.keys_mru(), vec![1, 2]);
        assert_in_sync(&cache);
    }

    #[test]
    fn test_capacity_one_churn() {
        let mut cache = LruCache::new(1);
        for i in 0..10 {
            cache.insert(i, i);
            assert_eq!(cache.len(), 1);
            assert_in_sync(&cache);
        }
        assert_eq!(cache.keys_mru(), vec![9]);
    }
}
