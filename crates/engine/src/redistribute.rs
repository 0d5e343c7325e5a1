//! Routing pooled fetch results back to owners
//!
//! After a grouped fetch returns a flat pool, each owner's resolved list is
//! rebuilt by walking that owner's own expected references in order. Output
//! order always matches the owner's history order, never fetch or pool
//! order, and a reference that appears twice produces the object twice.
//!
//! An owner whose expectation decodes cleanly but touches a failed type
//! group gets that group's error, not a shorter list: a silently incomplete
//! list would be indistinguishable from deleted targets. Deleted targets
//! themselves (absent from the pool with their group healthy) are skipped.

use crate::field::{HistoryField, Relation};
use crate::prefetch::{Expectation, FetchOutcome};
use tracing::debug;

use tether_core::{Reference, Result, TargetRef};

/// Rebuild one owner's ordered resolved list from the pool
///
/// # Errors
///
/// Returns the failure of the first expected reference whose type group
/// failed to fetch.
pub fn owner_list(expected: &[Reference], outcome: &FetchOutcome) -> Result<Vec<TargetRef>> {
    if let Some(reference) = expected
        .iter()
        .find(|reference| outcome.failures().contains_key(&reference.tag()))
    {
        return Err(outcome.failures()[&reference.tag()].clone());
    }

    let mut resolved = Vec::with_capacity(expected.len());
    for reference in expected {
        match outcome.pool().get(reference) {
            Some(object) => resolved.push(object.clone()),
            None => debug!(%reference, "skipping missing target"),
        }
    }
    Ok(resolved)
}

/// Apply a fetch outcome to a batch of owners
///
/// For each owner, in input order: a decode failure from planning stays
/// that owner's result; a touched failed group becomes that owner's
/// result; otherwise the ordered list is assembled from the pool and
/// installed as the owner's cache for `relation`. Failed owners keep their
/// previous cache slot untouched; an owner's cache is never left partial.
///
/// `expectations` must be positionally aligned with `owners`, as produced
/// by [`Prefetcher::plan`](crate::Prefetcher::plan).
pub fn redistribute(
    owners: &[&HistoryField],
    relation: &Relation,
    expectations: &[Expectation],
    outcome: &FetchOutcome,
) -> Vec<Result<Vec<TargetRef>>> {
    debug_assert_eq!(owners.len(), expectations.len());

    owners
        .iter()
        .zip(expectations)
        .map(|(owner, expectation)| {
            let expected = match expectation {
                Ok(expected) => expected,
                Err(err) => return Err(err.clone()),
            };
            let resolved = owner_list(expected, outcome)?;
            owner.install(relation.name(), resolved.clone());
            Ok(resolved)
        })
        .collect()
}
