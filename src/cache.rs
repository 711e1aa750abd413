//! The hash-consing cache (component C5).
//!
//! A concurrent, weak-reference table from structural [`Hash`] to a live
//! [`Base`]. The cache owns no strong reference: a "dead" entry is one
//! whose `Weak` can no longer be upgraded. Sharding and per-shard locking
//! are supplied by [`dashmap::DashMap`] (teacher-adjacent dependency
//! pulled from `codegraph-ir`/`moose`, both of which already rely on it
//! for exactly this concurrent-map shape).

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use once_cell::sync::Lazy;

use crate::error::CoreError;
use crate::expr::Base;
use crate::hash::Hash;

/// Tunable limits for the singleton cache, analogous to the teacher's
/// small configuration structs (`registry.rs::RegistryClient`).
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Run an opportunistic GC sweep every this many successful inserts.
    pub gc_every_n_inserts: u64,
    pub initial_capacity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            gc_every_n_inserts: 4096,
            initial_capacity: 1024,
        }
    }
}

pub struct Cache {
    map: DashMap<Hash, Weak<Base>>,
    limits: Limits,
    inserts_since_gc: std::sync::atomic::AtomicU64,
}

impl Cache {
    pub fn with_limits(limits: Limits) -> Self {
        Cache {
            map: DashMap::with_capacity(limits.initial_capacity),
            limits,
            inserts_since_gc: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// The process-wide singleton, initialized on first use (`spec.md`
    /// §9, "process-wide state").
    pub fn global() -> &'static Cache {
        static CACHE: Lazy<Cache> = Lazy::new(|| Cache::with_limits(Limits::default()));
        &CACHE
    }

    /// Look up `hash`; if a live entry exists, return it. Otherwise run
    /// `builder` to materialize a candidate and publish it, unless a
    /// competing writer got there first — in which case the existing live
    /// entry wins and the new candidate is discarded (`spec.md` §4.5).
    ///
    /// If `builder` produces a `Base` whose own `id()` does not equal
    /// `hash`, that is a hash collision on distinct structural content and
    /// is reported as [`CoreError::Unexpected`] rather than silently
    /// published.
    pub fn find_or_insert(
        &self,
        hash: Hash,
        builder: impl FnOnce() -> Arc<Base>,
    ) -> Result<Arc<Base>, CoreError> {
        if let Some(existing) = self.upgrade(hash) {
            tracing::trace!(%hash, "cache: hit");
            return Ok(existing);
        }
        tracing::trace!(%hash, "cache: miss");

        let candidate = builder();
        if candidate.id() != hash {
            return Err(CoreError::hash_collision(hash));
        }

        // Racing writers: `entry` gives us an exclusive slot for `hash`.
        use dashmap::mapref::entry::Entry;
        let published = match self.map.entry(hash) {
            Entry::Occupied(mut occ) => match occ.get().upgrade() {
                // A competing writer published first; every live entry at
                // `hash` is guaranteed id() == hash, so it is canonical.
                Some(existing) => existing,
                None => {
                    occ.insert(Arc::downgrade(&candidate));
                    candidate
                }
            },
            Entry::Vacant(vac) => {
                vac.insert(Arc::downgrade(&candidate));
                candidate
            }
        };

        let n = self.inserts_since_gc.fetch_add(1, std::sync::atomic::Ordering::Relaxed) + 1;
        if n >= self.limits.gc_every_n_inserts {
            self.inserts_since_gc.store(0, std::sync::atomic::Ordering::Relaxed);
            self.gc();
        }

        Ok(published)
    }

    fn upgrade(&self, hash: Hash) -> Option<Arc<Base>> {
        match self.map.get(&hash) {
            Some(entry) => entry.upgrade(),
            None => None,
        }
    }

    /// Test/debug-only probe: returns `None` when the entry is dead,
    /// removing the dead entry as a side effect (`spec.md` §4.5).
    pub fn unsafe_find(&self, hash: Hash) -> Option<Arc<Base>> {
        let upgraded = self.upgrade(hash);
        if upgraded.is_none() {
            self.map.remove(&hash);
        }
        upgraded
    }

    /// Number of entries currently tracked, live or dead. Test/debug-only.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Scan and remove all dead entries. Safe to call from any thread: an
    /// entry is only removed if its weak reference fails to upgrade, which
    /// requires no strong reference exists anywhere (`spec.md` §5).
    pub fn gc(&self) {
        let before = self.map.len();
        self.map.retain(|_, weak| weak.upgrade().is_some());
        tracing::debug!(removed = before - self.map.len(), remaining = self.map.len(), "cache: gc sweep");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::TypeName;
    use crate::op::{LiteralValue, Op};

    fn literal_int(cache: &Cache, n: i64) -> Arc<Base> {
        let bits = bitvec::vec::BitVec::<u64, bitvec::order::Lsb0>::from_element(n as u64);
        let mut bits = bits;
        bits.truncate(64);
        let op = Op::literal(LiteralValue::Bv(bits));
        let hash = crate::expr::Base::assemble(TypeName::Bv, Some(64), op.clone(), None).id();
        cache
            .find_or_insert(hash, || {
                Arc::new(crate::expr::Base::assemble(TypeName::Bv, Some(64), op, None))
            })
            .unwrap()
    }

    #[test]
    fn find_or_insert_dedups() {
        let cache = Cache::with_limits(Limits::default());
        let a = literal_int(&cache, 7);
        let b = literal_int(&cache, 7);
        assert_eq!(a.id(), b.id());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn weak_invalidation_on_drop() {
        let cache = Cache::with_limits(Limits::default());
        let id = {
            let a = literal_int(&cache, 9);
            a.id()
        };
        assert_eq!(cache.len(), 1);
        assert!(cache.unsafe_find(id).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn gc_removes_only_dead_entries() {
        let cache = Cache::with_limits(Limits::default());
        let keep = literal_int(&cache, 1);
        { literal_int(&cache, 2); }
        cache.gc();
        assert_eq!(cache.len(), 1);
        assert!(cache.unsafe_find(keep.id()).is_some());
    }
}
