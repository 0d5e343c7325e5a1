//! Core types for the tether engine
//!
//! This module defines the foundational types:
//! - TypeTag: opaque identifier for a target type, minted by the registry
//! - TargetId: a target type's primary key
//! - Reference: one (TypeTag, TargetId) pair naming a target object
//! - Snapshot: ordered sequence of references at one point in time
//! - History: append-only sequence of snapshots, oldest first

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for a target type
///
/// Tags are minted by the type registry and are stable for the lifetime of
/// the stored data. The engine only ever compares tags for equality; their
/// numeric value carries no meaning here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TypeTag(u32);

impl TypeTag {
    /// Create a tag from its raw value
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw value of this tag
    pub const fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Primary key of a target object within its type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(u64);

impl TargetId {
    /// Create an id from its raw value
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value of this id
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One reference: which target type, which row
///
/// Immutable value type. Serializes as a two-element array `[tag, id]`,
/// which is the stored wire form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "(TypeTag, TargetId)", into = "(TypeTag, TargetId)")]
pub struct Reference {
    tag: TypeTag,
    id: TargetId,
}

impl Reference {
    /// Create a reference to the given target
    pub const fn new(tag: TypeTag, id: TargetId) -> Self {
        Self { tag, id }
    }

    /// Target type of this reference
    pub const fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Target primary key of this reference
    pub const fn id(&self) -> TargetId {
        self.id
    }
}

impl From<(TypeTag, TargetId)> for Reference {
    fn from((tag, id): (TypeTag, TargetId)) -> Self {
        Self { tag, id }
    }
}

impl From<Reference> for (TypeTag, TargetId) {
    fn from(r: Reference) -> Self {
        (r.tag, r.id)
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.tag, self.id)
    }
}

/// Ordered sequence of references representing state at one point in time
///
/// Order is semantically meaningful: it is the enumeration order of the
/// relation, and resolution must preserve it. A snapshot may legitimately
/// contain the same reference more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(Vec<Reference>);

impl Snapshot {
    /// Create an empty snapshot
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// References in this snapshot, in order
    pub fn refs(&self) -> &[Reference] {
        &self.0
    }

    /// Number of references
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the snapshot holds no references
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append a reference
    pub fn push(&mut self, reference: Reference) {
        self.0.push(reference);
    }

    /// Iterate over references in order
    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.0.iter()
    }
}

impl From<Vec<Reference>> for Snapshot {
    fn from(refs: Vec<Reference>) -> Self {
        Self(refs)
    }
}

impl FromIterator<Reference> for Snapshot {
    fn from_iter<I: IntoIterator<Item = Reference>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Append-only ordered sequence of snapshots, oldest first
///
/// Resolution always reads the last snapshot; earlier snapshots are retained
/// for audit only. The API exposes appends and reads but no removal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct History(Vec<Snapshot>);

impl History {
    /// Create an empty history
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Build a history from snapshots, oldest first
    pub fn from_snapshots(snapshots: Vec<Snapshot>) -> Self {
        Self(snapshots)
    }

    /// Append a snapshot as the new current state
    pub fn push(&mut self, snapshot: Snapshot) {
        self.0.push(snapshot);
    }

    /// The current effective reference list
    ///
    /// Returns the references of the last snapshot, or an empty slice when
    /// the history is empty. A last snapshot that is itself empty also
    /// yields an empty slice; neither case is an error.
    pub fn current(&self) -> &[Reference] {
        self.0.last().map(|s| s.refs()).unwrap_or(&[])
    }

    /// All snapshots, oldest first
    pub fn snapshots(&self) -> &[Snapshot] {
        &self.0
    }

    /// Number of snapshots
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no snapshot has been recorded
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<Snapshot> for History {
    fn from_iter<I: IntoIterator<Item = Snapshot>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
