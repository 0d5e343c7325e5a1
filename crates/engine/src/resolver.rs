//! Lazy single-owner resolution
//!
//! Resolves one owner's current references on demand, with a cache whose
//! validity is re-proved against the stored history on every read. A cache
//! miss costs one fetch call per reference; callers with many owners use
//! the batch planner instead.

use crate::field::{HistoryField, Relation};
use std::sync::Arc;
use tracing::debug;

use tether_core::{Reference, Result, TargetRef, TypeRegistry};

/// Lazy resolver over an injected type registry
///
/// The registry is passed in at construction; the resolver holds no other
/// state, so one instance can serve any number of owners.
#[derive(Clone)]
pub struct Resolver {
    registry: Arc<dyn TypeRegistry>,
}

impl Resolver {
    /// Create a resolver backed by the given registry
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Resolve an owner's current references for a relation
    ///
    /// Re-derives the expected reference list from the stored history,
    /// proves any cached sequence against it element-for-element, and only
    /// fetches on mismatch. References whose target no longer exists are
    /// skipped, so the result may be shorter than the expected list.
    ///
    /// The owner's cache lock is held across the derive-compare-install
    /// sequence, so a concurrent read of the same owner cannot observe a
    /// half-installed slot.
    ///
    /// # Errors
    ///
    /// Propagates [`tether_core::Error::Decode`] for a malformed history
    /// and [`tether_core::Error::UnknownTypeTag`] or fetch failures from
    /// the registry; all are local to this owner's read.
    pub fn read(&self, owner: &HistoryField, relation: &Relation) -> Result<Vec<TargetRef>> {
        let mut caches = owner.caches();
        let expected = owner.current()?;

        if let Some(cached) = caches.get(relation.name()) {
            if self.cache_is_current(cached, &expected) {
                debug!(relation = relation.name(), "resolved from cache");
                return Ok(cached.clone());
            }
        }

        debug!(
            relation = relation.name(),
            references = expected.len(),
            "cache miss, resolving individually"
        );

        let mut resolved = Vec::with_capacity(expected.len());
        for reference in &expected {
            let fetcher = self.registry.fetcher_for(reference.tag())?;
            let fetched = fetcher.fetch(&[reference.id()])?;
            let hit = fetched
                .into_iter()
                .find(|obj| self.registry.reference_of(obj.as_ref()) == *reference);
            match hit {
                Some(obj) => resolved.push(obj),
                None => debug!(%reference, "skipping missing target"),
            }
        }

        caches.insert(relation.name().to_string(), resolved.clone());
        Ok(resolved)
    }

    /// Resolve a single-valued relation to its first target, if any
    ///
    /// Convenience for [`Cardinality::Single`](crate::Cardinality::Single)
    /// consumers; resolution itself is identical to [`Self::read`].
    pub fn read_one(&self, owner: &HistoryField, relation: &Relation) -> Result<Option<TargetRef>> {
        Ok(self.read(owner, relation)?.into_iter().next())
    }

    /// Prove a cached sequence still matches the expected reference list
    ///
    /// Each cached object's `(tag, id)` is recomputed through the registry
    /// and compared in order. A deleted target makes the cached sequence
    /// shorter than expected, which reads as a mismatch and forces a fresh
    /// resolution.
    fn cache_is_current(&self, cached: &[TargetRef], expected: &[Reference]) -> bool {
        cached.len() == expected.len()
            && cached
                .iter()
                .zip(expected)
                .all(|(obj, reference)| self.registry.reference_of(obj.as_ref()) == *reference)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver").finish_non_exhaustive()
    }
}
