//! Core traits: resolvable targets, bulk fetchers, and the type registry
//!
//! These are the seams between the resolution engine and its collaborators.
//! Target objects are opaque to the engine beyond the [`Target`] capability;
//! the persistence layer is reached only through [`BulkFetch`]; and the
//! mapping between the two is owned by a [`TypeRegistry`] that callers pass
//! in explicitly. The engine never assumes process-global registry state.

use crate::error::Result;
use crate::types::{Reference, TargetId, TypeTag};
use std::sync::Arc;

/// Capability every resolvable entity implements
///
/// The engine holds resolved objects only as `Arc<dyn Target>` for the
/// duration of a resolution pass; ownership stays with whatever loaded them.
///
/// # Thread Safety
///
/// Targets must be `Send + Sync` so batch resolution may hand them to
/// concurrent per-owner redistribution.
pub trait Target: Send + Sync {
    /// The tag of this object's type, as minted by the registry
    fn type_tag(&self) -> TypeTag;

    /// This object's primary key within its type
    fn target_id(&self) -> TargetId;
}

/// Shared handle to a resolved target object
pub type TargetRef = Arc<dyn Target>;

/// Bulk fetch of one target type's objects by primary key
///
/// Implementations wrap the persistence layer's query path for one type.
/// `ids` arrives deduplicated and sorted; the fetcher returns whatever
/// subset still exists. Ids that no longer resolve are simply absent from
/// the result, never an error.
pub trait BulkFetch: Send + Sync {
    /// Fetch all objects of this type matching `ids`
    ///
    /// # Errors
    ///
    /// Returns an error only when the underlying query itself fails; a
    /// missing id is not a failure.
    fn fetch(&self, ids: &[TargetId]) -> Result<Vec<TargetRef>>;
}

/// The type registry contract
///
/// Maps type tags to fetchers and target objects back to tags. Must be
/// deterministic and side-effect-free from the engine's perspective; any
/// caching of lookups is the registry's own concern.
pub trait TypeRegistry: Send + Sync {
    /// Fetcher capable of bulk-loading objects of the tagged type
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownTypeTag`] when the tag is not
    /// registered.
    fn fetcher_for(&self, tag: TypeTag) -> Result<Arc<dyn BulkFetch>>;

    /// Tag of the given object's type
    ///
    /// The default delegates to the object's own capability; registries
    /// that proxy or remap types may override.
    fn tag_of(&self, target: &dyn Target) -> TypeTag {
        target.type_tag()
    }

    /// The reference a resolved object answers to
    fn reference_of(&self, target: &dyn Target) -> Reference {
        Reference::new(self.tag_of(target), target.target_id())
    }
}
