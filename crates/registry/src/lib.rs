//! Type registry for tether
//!
//! Implements the [`tether_core::TypeRegistry`] contract: a concurrent map
//! from type tags to bulk fetchers, plus a Rust-type-to-tag index. The
//! registry is an injected collaborator: resolvers and planners receive it
//! explicitly, never through process-global state.
//!
//! The [`testing`] module ships in-memory fetchers for exercising the
//! engine without a persistence layer.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod registry;
pub mod testing;

pub use registry::InMemoryRegistry;
