//! Codec for the stored form of a reference history
//!
//! The history lives in a single scalar column on the owner as a JSON
//! array-of-arrays-of-pairs: `[[[tag, id], ...], ...]`, oldest snapshot
//! first. Decoding is lenient about absence (empty input and JSON `null`
//! both mean "no history yet", and a `null` in snapshot position means an
//! empty snapshot) but strict about shape: anything else malformed is an
//! [`Error::Decode`], never silently an empty history.
//!
//! Pure functions, no I/O.

use crate::error::{Error, Result};
use crate::types::{History, Reference, Snapshot};

/// Wire shape accepted by [`decode`]. Snapshot slots may be `null`.
type RawHistory = Option<Vec<Option<Vec<Reference>>>>;

/// Decode the stored column value into a [`History`]
///
/// Absent input (empty or whitespace-only string) and JSON `null` decode to
/// an empty history. Malformed input is rejected.
///
/// # Errors
///
/// Returns [`Error::Decode`] when the input is not the expected
/// array-of-arrays-of-pairs shape.
pub fn decode(raw: &str) -> Result<History> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(History::new());
    }

    let wire: RawHistory = serde_json::from_str(trimmed).map_err(|e| Error::Decode {
        reason: e.to_string(),
    })?;

    let snapshots = wire
        .unwrap_or_default()
        .into_iter()
        .map(|snapshot| Snapshot::from(snapshot.unwrap_or_default()))
        .collect();

    Ok(History::from_snapshots(snapshots))
}

/// Encode a [`History`] into its stored column value
///
/// Exact inverse of [`decode`] for any history `decode` can produce.
pub fn encode(history: &History) -> String {
    // History is plain nested arrays of numbers; serialization cannot fail.
    serde_json::to_string(history).expect("history serializes to plain JSON arrays")
}
