//! Batch prefetch planning and fetching
//!
//! Resolving N owners one by one costs one fetch per owner per reference.
//! The planner instead walks the whole batch once, groups demanded ids by
//! type tag, and issues a single bulk fetch per distinct tag: at most K
//! fetch calls for K tags, regardless of owner count.
//!
//! Fetched objects land in a pool keyed by the composite `(tag, id)`
//! reference. Redistribution back to owners is the
//! [`redistribute`](crate::redistribute) module's job.

use crate::field::{HistoryField, Relation};
use crate::redistribute;
use rustc_hash::FxHashMap;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::{debug, warn};

use tether_core::{
    BulkFetch, Error, Reference, Result, TargetId, TargetRef, TypeRegistry, TypeTag,
};

/// Per-batch override fetchers, at most one per type tag
///
/// An override replaces the registry's default fetcher for one tag in one
/// batch call, e.g. to apply a filtered query. Supplying two overrides for
/// the same tag is a caller error, rejected here at construction, before
/// any fetch is issued.
#[derive(Default)]
pub struct FetchOverrides {
    fetchers: FxHashMap<TypeTag, Arc<dyn BulkFetch>>,
}

impl FetchOverrides {
    /// No overrides: every tag uses its registry fetcher
    pub fn none() -> Self {
        Self::default()
    }

    /// Add an override fetcher for a tag
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOverride`] if the tag already has one.
    pub fn add(&mut self, tag: TypeTag, fetcher: Arc<dyn BulkFetch>) -> Result<()> {
        if self.fetchers.contains_key(&tag) {
            return Err(Error::DuplicateOverride(tag));
        }
        self.fetchers.insert(tag, fetcher);
        Ok(())
    }

    /// Builder-style [`Self::add`]
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateOverride`] if the tag already has one.
    pub fn with(mut self, tag: TypeTag, fetcher: Arc<dyn BulkFetch>) -> Result<Self> {
        self.add(tag, fetcher)?;
        Ok(self)
    }

    /// The override for a tag, if present
    pub fn get(&self, tag: TypeTag) -> Option<Arc<dyn BulkFetch>> {
        self.fetchers.get(&tag).cloned()
    }

    /// Number of overrides
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    /// True when no override is present
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }
}

impl std::fmt::Debug for FetchOverrides {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags: Vec<TypeTag> = self.fetchers.keys().copied().collect();
        tags.sort();
        f.debug_struct("FetchOverrides").field("tags", &tags).finish()
    }
}

/// What one owner's history says should resolve: its current reference
/// list, or the decode error that makes this owner unreadable
pub type Expectation = Result<Vec<Reference>>;

/// Demand grouped by type tag: which ids each tag must fetch
///
/// Ids are deduplicated per tag; iteration order is deterministic.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PrefetchPlan {
    demand: BTreeMap<TypeTag, BTreeSet<TargetId>>,
}

impl PrefetchPlan {
    /// Demand sets by tag
    pub fn demand(&self) -> &BTreeMap<TypeTag, BTreeSet<TargetId>> {
        &self.demand
    }

    /// Distinct tags the batch needs, sorted
    pub fn tags(&self) -> Vec<TypeTag> {
        self.demand.keys().copied().collect()
    }

    /// Total distinct ids across all tags
    pub fn total_ids(&self) -> usize {
        self.demand.values().map(BTreeSet::len).sum()
    }

    /// True when the batch demands nothing
    pub fn is_empty(&self) -> bool {
        self.demand.is_empty()
    }

    fn insert(&mut self, reference: Reference) {
        self.demand
            .entry(reference.tag())
            .or_default()
            .insert(reference.id());
    }
}

/// Pool of fetched objects plus per-tag failures from one fetch pass
///
/// A failed tag group never contributes partial objects: it is recorded
/// here so redistribution can fail every owner that referenced it instead
/// of handing them an incomplete list.
#[derive(Default)]
pub struct FetchOutcome {
    pool: FxHashMap<Reference, TargetRef>,
    failures: BTreeMap<TypeTag, Error>,
}

impl FetchOutcome {
    /// Fetched objects keyed by `(tag, id)`
    pub fn pool(&self) -> &FxHashMap<Reference, TargetRef> {
        &self.pool
    }

    /// Tags whose group fetch failed, with the failure
    pub fn failures(&self) -> &BTreeMap<TypeTag, Error> {
        &self.failures
    }
}

/// Batch prefetch planner over an injected type registry
#[derive(Clone)]
pub struct Prefetcher {
    registry: Arc<dyn TypeRegistry>,
}

impl Prefetcher {
    /// Create a planner backed by the given registry
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self { registry }
    }

    /// Collect demand across a batch of owners
    ///
    /// Visits every owner exactly once and every reference exactly once.
    /// Returns the per-tag demand plan plus one [`Expectation`] per owner,
    /// positionally aligned with the input: a decode failure is captured in
    /// that owner's slot and never aborts planning for the rest.
    pub fn plan<'a>(
        &self,
        owners: impl IntoIterator<Item = &'a HistoryField>,
    ) -> (PrefetchPlan, Vec<Expectation>) {
        let mut plan = PrefetchPlan::default();
        let mut expectations = Vec::new();

        for owner in owners {
            let expectation = owner.current();
            if let Ok(references) = &expectation {
                for reference in references {
                    plan.insert(*reference);
                }
            }
            expectations.push(expectation);
        }

        (plan, expectations)
    }

    /// Issue one bulk fetch per tag in the plan
    ///
    /// Each tag resolves through its override fetcher when one is supplied,
    /// else through the registry. Tag groups are independent: an unknown
    /// tag or a failing fetcher marks that tag failed and the rest of the
    /// plan still fetches.
    pub fn fetch(&self, plan: &PrefetchPlan, overrides: &FetchOverrides) -> FetchOutcome {
        let mut outcome = FetchOutcome::default();

        for (&tag, ids) in plan.demand() {
            let fetcher = match overrides.get(tag) {
                Some(fetcher) => fetcher,
                None => match self.registry.fetcher_for(tag) {
                    Ok(fetcher) => fetcher,
                    Err(err) => {
                        warn!(%tag, %err, "type tag not resolvable, failing its group");
                        outcome.failures.insert(tag, err);
                        continue;
                    }
                },
            };

            let ids: Vec<TargetId> = ids.iter().copied().collect();
            match fetcher.fetch(&ids) {
                Ok(objects) => {
                    for object in objects {
                        let key = self.registry.reference_of(object.as_ref());
                        outcome.pool.insert(key, object);
                    }
                }
                Err(err) => {
                    warn!(%tag, %err, "bulk fetch failed, failing its group");
                    outcome.failures.insert(
                        tag,
                        Error::Fetch {
                            tag,
                            reason: err.to_string(),
                        },
                    );
                }
            }
        }

        outcome
    }

    /// Plan, fetch, redistribute, and install caches for a whole batch
    ///
    /// The returned results are positionally aligned with `owners`. An
    /// owner's slot is `Ok` with its ordered resolved list (installed as
    /// its cache for `relation`), or the decode/group error that applies
    /// to it; failed owners keep whatever cache they had before.
    pub fn run(
        &self,
        owners: &[&HistoryField],
        relation: &Relation,
        overrides: &FetchOverrides,
    ) -> Vec<Result<Vec<TargetRef>>> {
        let (plan, expectations) = self.plan(owners.iter().copied());
        debug!(
            owners = owners.len(),
            tags = plan.demand().len(),
            ids = plan.total_ids(),
            "prefetch planned"
        );

        let outcome = self.fetch(&plan, overrides);
        redistribute::redistribute(owners, relation, &expectations, &outcome)
    }
}

impl std::fmt::Debug for Prefetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Prefetcher").finish_non_exhaustive()
    }
}
