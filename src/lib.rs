//! Tether - polymorphic reference resolution and batch prefetch engine
//!
//! A stored record carries an append-only history of heterogeneous
//! references; each reference names a target type and a primary key within
//! it. Tether resolves the current reference set into live objects, either
//! lazily per owner (with cache-validity checking against the stored
//! history) or in bulk across a whole collection of owners with one fetch
//! per distinct target type.
//!
//! # Quick Start
//!
//! ```ignore
//! use std::sync::Arc;
//! use tether::{HistoryField, InMemoryRegistry, Relation, Resolver, TypeTag};
//!
//! let registry = Arc::new(InMemoryRegistry::new());
//! registry.register::<User>(TypeTag::new(1), Arc::new(user_fetcher));
//!
//! let owner = HistoryField::from_raw("[[[1,7]]]");
//! let resolver = Resolver::new(registry);
//! let targets = resolver.read(&owner, &Relation::many("terminations"))?;
//! ```
//!
//! # Architecture
//!
//! [`tether_core`] defines the data model, codec, and collaborator traits;
//! [`tether_registry`] implements the type registry; [`tether_engine`]
//! holds the resolution paths. This crate re-exports the public surface.

// Re-export the public API
pub use tether_core::{
    codec, BulkFetch, Error, History, Reference, Result, Snapshot, Target, TargetId, TargetRef,
    TypeRegistry, TypeTag,
};
pub use tether_engine::{
    owner_list, redistribute, Cardinality, Expectation, FetchOutcome, FetchOverrides,
    HistoryField, PrefetchPlan, Prefetcher, Relation, Resolver,
};
pub use tether_registry::{testing, InMemoryRegistry};
