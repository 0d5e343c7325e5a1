//! Test-support fetchers and targets
//!
//! Provides in-memory stand-ins for the persistence layer so engine and
//! integration tests can exercise resolution without a real store:
//!
//! - [`StubTarget`]: minimal resolvable object carrying just tag + id
//! - [`MemTable`]: one type's rows in memory, usable as a [`BulkFetch`];
//!   rows can be removed to simulate deleted targets
//! - [`CountingFetch`]: decorator counting fetch calls, for asserting the
//!   one-fetch-per-type batching bound
//!
//! # Example
//!
//! ```ignore
//! use tether_registry::testing::{CountingFetch, MemTable, StubTarget};
//!
//! let users = Arc::new(MemTable::new(TypeTag::new(1)));
//! users.insert(Arc::new(StubTarget::new(TypeTag::new(1), TargetId::new(7))));
//!
//! let counted = Arc::new(CountingFetch::new(users.clone()));
//! registry.register::<StubTarget>(TypeTag::new(1), counted.clone());
//! // ... resolve ...
//! assert_eq!(counted.calls(), 1);
//! ```

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tether_core::{BulkFetch, Result, Target, TargetId, TargetRef, TypeTag};

/// Minimal target object for tests: a tag and an id, nothing else
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StubTarget {
    tag: TypeTag,
    id: TargetId,
}

impl StubTarget {
    /// Create a stub target
    pub fn new(tag: TypeTag, id: TargetId) -> Self {
        Self { tag, id }
    }
}

impl Target for StubTarget {
    fn type_tag(&self) -> TypeTag {
        self.tag
    }

    fn target_id(&self) -> TargetId {
        self.id
    }
}

/// In-memory table of one target type's rows
///
/// Fetching returns only the requested ids that are present; absent ids are
/// skipped, matching the contract real fetchers follow for deleted rows.
pub struct MemTable {
    tag: TypeTag,
    rows: Mutex<BTreeMap<TargetId, TargetRef>>,
}

impl MemTable {
    /// Create an empty table for the given type
    pub fn new(tag: TypeTag) -> Self {
        Self {
            tag,
            rows: Mutex::new(BTreeMap::new()),
        }
    }

    /// The type this table holds
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Insert or replace a row, keyed by the target's id
    pub fn insert(&self, target: TargetRef) {
        self.rows.lock().insert(target.target_id(), target);
    }

    /// Remove a row, simulating a deleted target
    pub fn remove(&self, id: TargetId) -> Option<TargetRef> {
        self.rows.lock().remove(&id)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.lock().len()
    }

    /// True when the table has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.lock().is_empty()
    }
}

impl BulkFetch for MemTable {
    fn fetch(&self, ids: &[TargetId]) -> Result<Vec<TargetRef>> {
        let rows = self.rows.lock();
        Ok(ids
            .iter()
            .filter_map(|id| rows.get(id).cloned())
            .collect())
    }
}

/// Fetch decorator that counts how many times `fetch` runs
///
/// Used to assert both the batching bound (at most one call per distinct
/// type per batch) and cache reuse (zero calls on a warm read).
pub struct CountingFetch {
    inner: Arc<dyn BulkFetch>,
    calls: AtomicUsize,
}

impl CountingFetch {
    /// Wrap a fetcher
    pub fn new(inner: Arc<dyn BulkFetch>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of fetch calls issued so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Reset the call counter
    pub fn reset(&self) {
        self.calls.store(0, Ordering::SeqCst);
    }
}

impl BulkFetch for CountingFetch {
    fn fetch(&self, ids: &[TargetId]) -> Result<Vec<TargetRef>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.fetch(ids)
    }
}
