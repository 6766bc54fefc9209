//! Bounded memoization of signature verification results.
//!
//! Identical (message, signature, public key) triples show up repeatedly
//! when the same transaction is validated in the mempool and again inside a
//! block. Caching the verdict skips the expensive curve operation.
//!
//! Eviction picks a uniformly random victim rather than the least recently
//! used entry, so an attacker cannot engineer a workload that deterministically
//! flushes the entries it is about to re-trigger.

use crate::types::Hash;
use indexmap::IndexMap;
use rand::Rng;
use std::sync::RwLock;

/// Public key half of a cache key, in raw serialized form
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CachedPublicKey {
    Schnorr([u8; 32]),
    Ecdsa([u8; 33]),
}

/// Key of one cached verification: the signed message digest, the 64-byte
/// signature, and the public key it was checked against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SigCacheKey {
    pub message: Hash,
    pub signature: [u8; 64],
    pub public_key: CachedPublicKey,
}

/// Fixed-capacity concurrent cache. Safe for simultaneous lookups and
/// inserts from multiple validation workers. A capacity of zero makes the
/// cache a permanent no-op.
#[derive(Debug)]
pub struct SignatureCache {
    map: RwLock<IndexMap<SigCacheKey, bool>>,
    capacity: usize,
}

impl SignatureCache {
    pub fn new(capacity: usize) -> Self {
        Self { map: RwLock::new(IndexMap::with_capacity(capacity)), capacity }
    }

    /// Looks up a previously recorded verification verdict.
    pub fn get(&self, key: &SigCacheKey) -> Option<bool> {
        if self.capacity == 0 {
            return None;
        }
        self.map.read().expect("sig cache lock poisoned").get(key).copied()
    }

    pub fn contains(&self, key: &SigCacheKey) -> bool {
        self.get(key).is_some()
    }

    /// Records a verification verdict, evicting one uniformly random entry
    /// if the cache is full.
    pub fn insert(&self, key: SigCacheKey, valid: bool) {
        if self.capacity == 0 {
            return;
        }
        let mut map = self.map.write().expect("sig cache lock poisoned");
        if map.len() >= self.capacity && !map.contains_key(&key) {
            let victim = rand::thread_rng().gen_range(0..map.len());
            map.swap_remove_index(victim);
        }
        map.insert(key, valid);
    }

    pub fn len(&self) -> usize {
        self.map.read().expect("sig cache lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(n: u8) -> SigCacheKey {
        SigCacheKey { message: [n; 32], signature: [n; 64], public_key: CachedPublicKey::Schnorr([n; 32]) }
    }

    #[test]
    fn test_insert_and_get() {
        let cache = SignatureCache::new(16);
        cache.insert(key(1), true);
        cache.insert(key(2), false);
        assert_eq!(cache.get(&key(1)), Some(true));
        assert_eq!(cache.get(&key(2)), Some(false));
        assert_eq!(cache.get(&key(3)), None);
    }

    #[test]
    fn test_eviction_keeps_capacity_and_new_entry() {
        let capacity = 8;
        let cache = SignatureCache::new(capacity);
        for n in 0..capacity as u8 {
            cache.insert(key(n), true);
        }
        assert_eq!(cache.len(), capacity);

        cache.insert(key(200), true);
        assert_eq!(cache.len(), capacity);
        assert_eq!(cache.get(&key(200)), Some(true));
    }

    #[test]
    fn test_reinserting_existing_key_does_not_evict() {
        let cache = SignatureCache::new(2);
        cache.insert(key(1), true);
        cache.insert(key(2), true);
        cache.insert(key(1), true);
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(2)), Some(true));
    }

    #[test]
    fn test_zero_capacity_is_noop() {
        let cache = SignatureCache::new(0);
        cache.insert(key(1), true);
        assert_eq!(cache.get(&key(1)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        let cache = Arc::new(SignatureCache::new(64));
        let handles: Vec<_> = (0..4u8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for n in 0..32u8 {
                        cache.insert(key(t.wrapping_mul(32).wrapping_add(n)), true);
                        let _ = cache.get(&key(n));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert!(cache.len() <= 64);
    }
}
