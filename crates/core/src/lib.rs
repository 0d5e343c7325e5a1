//! Core types and traits for tether
//!
//! This crate defines the foundational pieces of the reference resolution
//! engine:
//! - TypeTag / TargetId / Reference: naming one target object
//! - Snapshot / History: the append-only reference history a record carries
//! - codec: stored-form encoding of a history (JSON pairs)
//! - Target / BulkFetch / TypeRegistry: seams to the host's entities,
//!   persistence layer, and type registry
//! - Error: error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod codec;
pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types and traits
pub use error::{Error, Result};
pub use traits::{BulkFetch, Target, TargetRef, TypeRegistry};
pub use types::{History, Reference, Snapshot, TargetId, TypeTag};
