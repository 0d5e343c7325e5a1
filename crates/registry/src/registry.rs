//! In-process type registry
//!
//! The registry maintains mappings from:
//! - `TypeTag` -> bulk fetcher for that type
//! - Rust `TypeId` -> `TypeTag`, so hosts can recover the tag for a
//!   concrete type without threading tag constants around
//!
//! This allows new target types to be registered at run time without the
//! resolution engine knowing the set of types up front.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let registry = InMemoryRegistry::new();
//!
//! // Register target types with their fetchers
//! registry.register::<User>(TypeTag::new(1), Arc::new(user_fetcher));
//! registry.register::<Post>(TypeTag::new(2), Arc::new(post_fetcher));
//!
//! // Look up by tag
//! let fetcher = registry.fetcher_for(TypeTag::new(1))?;
//!
//! // Recover the tag for a concrete type
//! let tag = registry.tag_for::<User>();
//! ```

use dashmap::DashMap;
use std::any::TypeId;
use std::sync::Arc;
use tether_core::{BulkFetch, Error, Result, TypeRegistry, TypeTag};

/// Registry of target types for reference resolution
///
/// Registration is concurrent-safe and may happen at any point; lookups see
/// the latest registration for a tag (last registration wins). The registry
/// is intended to be built once at startup and shared as
/// `Arc<InMemoryRegistry>`.
#[derive(Default)]
pub struct InMemoryRegistry {
    /// Fetchers by type tag
    fetchers: DashMap<TypeTag, Arc<dyn BulkFetch>>,
    /// Rust type -> tag mapping
    tags: DashMap<TypeId, TypeTag>,
}

impl InMemoryRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            fetchers: DashMap::new(),
            tags: DashMap::new(),
        }
    }

    /// Register a target type under `tag` with its bulk fetcher
    ///
    /// Maps both the tag and the concrete Rust type. Registering the same
    /// tag again replaces the previous fetcher.
    pub fn register<T: 'static>(&self, tag: TypeTag, fetcher: Arc<dyn BulkFetch>) {
        self.tags.insert(TypeId::of::<T>(), tag);
        self.fetchers.insert(tag, fetcher);
    }

    /// Tag registered for the concrete type `T`, if any
    pub fn tag_for<T: 'static>(&self) -> Option<TypeTag> {
        self.tags.get(&TypeId::of::<T>()).map(|entry| *entry)
    }

    /// Check if a tag is registered
    pub fn is_registered(&self, tag: TypeTag) -> bool {
        self.fetchers.contains_key(&tag)
    }

    /// Number of registered types
    pub fn len(&self) -> usize {
        self.fetchers.len()
    }

    /// True when nothing is registered
    pub fn is_empty(&self) -> bool {
        self.fetchers.is_empty()
    }

    /// All registered tags, sorted
    pub fn tags(&self) -> Vec<TypeTag> {
        let mut tags: Vec<TypeTag> = self.fetchers.iter().map(|entry| *entry.key()).collect();
        tags.sort();
        tags
    }
}

impl TypeRegistry for InMemoryRegistry {
    fn fetcher_for(&self, tag: TypeTag) -> Result<Arc<dyn BulkFetch>> {
        self.fetchers
            .get(&tag)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(Error::UnknownTypeTag(tag))
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("type_count", &self.fetchers.len())
            .field("tags", &self.tags())
            .finish()
    }
}
