//! History-carrying field and relation declarations
//!
//! [`HistoryField`] is the piece an owner record embeds: the raw encoded
//! history column plus the per-relation cache of resolved targets. The raw
//! column is the source of truth; the cache is a derived projection whose
//! validity is recomputed on every read, never trusted blindly.
//!
//! Mutating the history requires `&mut self`, so a resolving read (which
//! takes `&self`) can never interleave with a history write on the same
//! owner. The cache map sits behind a mutex because installs happen through
//! shared references during resolution.

use parking_lot::{Mutex, MutexGuard};
use rustc_hash::FxHashMap;
use tether_core::codec;
use tether_core::{History, Reference, Result, Snapshot, TargetRef};

/// Cardinality a relation name exposes over the same underlying history
///
/// Extraction and caching are identical for both; cardinality only changes
/// how callers read the resolved sequence. One owner may expose the same
/// field under a `Single` name and a `Many` name simultaneously.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// The relation reads as "the current reference" (first element)
    Single,
    /// The relation reads as "the current set of references"
    Many,
}

/// Declaration binding a relation name to a cardinality interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    name: String,
    cardinality: Cardinality,
}

impl Relation {
    /// Declare an array-valued relation
    pub fn many(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Many,
        }
    }

    /// Declare a single-valued relation
    pub fn single(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cardinality: Cardinality::Single,
        }
    }

    /// The relation name, which keys the owner's cache slot
    pub fn name(&self) -> &str {
        &self.name
    }

    /// How callers interpret the resolved sequence
    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

/// The history-encoded field an owner record carries
///
/// Holds the stored scalar column (`raw`) and the per-relation-name cache
/// of previously resolved target sequences.
#[derive(Default)]
pub struct HistoryField {
    raw: Option<String>,
    caches: Mutex<FxHashMap<String, Vec<TargetRef>>>,
}

impl HistoryField {
    /// Create a field with no stored history
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a field from a stored column value
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Some(raw.into()),
            caches: Mutex::new(FxHashMap::default()),
        }
    }

    /// The stored column value, if any
    pub fn raw(&self) -> Option<&str> {
        self.raw.as_deref()
    }

    /// Replace the stored column value
    ///
    /// Caches are not cleared here; validity is recomputed against the new
    /// history on the next read.
    pub fn set_raw(&mut self, raw: Option<String>) {
        self.raw = raw;
    }

    /// Decode the full stored history
    ///
    /// # Errors
    ///
    /// Returns [`tether_core::Error::Decode`] for a malformed column.
    pub fn decode(&self) -> Result<History> {
        codec::decode(self.raw.as_deref().unwrap_or_default())
    }

    /// The current effective reference list (last snapshot, or empty)
    ///
    /// This is the single definition of "current state"; both the lazy
    /// resolver and the batch planner derive expectations from it.
    ///
    /// # Errors
    ///
    /// Returns [`tether_core::Error::Decode`] for a malformed column.
    pub fn current(&self) -> Result<Vec<Reference>> {
        Ok(self.decode()?.current().to_vec())
    }

    /// Append a snapshot as the new current state
    ///
    /// Decodes the stored history, pushes the snapshot, and re-encodes.
    /// Earlier snapshots are retained; there is no way to rewrite them.
    ///
    /// # Errors
    ///
    /// Returns [`tether_core::Error::Decode`] if the existing column is
    /// malformed; nothing is written in that case.
    pub fn append_snapshot(&mut self, snapshot: Snapshot) -> Result<()> {
        let mut history = self.decode()?;
        history.push(snapshot);
        self.raw = Some(codec::encode(&history));
        Ok(())
    }

    /// Cached resolved sequence for a relation name, if present
    ///
    /// This is the raw cache slot, returned without validity checking;
    /// resolution paths must validate against [`Self::current`] before
    /// trusting it.
    pub fn cached(&self, relation: &str) -> Option<Vec<TargetRef>> {
        self.caches.lock().get(relation).cloned()
    }

    /// Drop the cache slot for a relation name
    pub fn invalidate(&self, relation: &str) -> bool {
        self.caches.lock().remove(relation).is_some()
    }

    /// Lock the cache map for a compare-and-install sequence
    pub(crate) fn caches(&self) -> MutexGuard<'_, FxHashMap<String, Vec<TargetRef>>> {
        self.caches.lock()
    }

    /// Install a resolved sequence for a relation name
    pub(crate) fn install(&self, relation: &str, resolved: Vec<TargetRef>) {
        self.caches.lock().insert(relation.to_string(), resolved);
    }
}

impl std::fmt::Debug for HistoryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut cached: Vec<String> = self.caches.lock().keys().cloned().collect();
        cached.sort();
        f.debug_struct("HistoryField")
            .field("raw", &self.raw)
            .field("cached_relations", &cached)
            .finish()
    }
}
