//! Error types for the tether engine
//!
//! We use `thiserror` for automatic `Display` and `Error` trait
//! implementations. The enum is `Clone` because a single failed type group
//! in a batch is reported to every owner whose references touch that group.

use crate::types::TypeTag;
use thiserror::Error;

/// Result type alias for tether operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for reference resolution
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Stored history is malformed and cannot be decoded
    ///
    /// Non-recoverable for that owner's read. A malformed history must not
    /// resolve to "no references", which would hide data corruption.
    #[error("malformed reference history: {reason}")]
    Decode {
        /// What the decoder rejected
        reason: String,
    },

    /// A reference's type tag has no fetcher in the registry
    ///
    /// Aborts resolution for that tag's whole group; other groups in the
    /// same batch are unaffected.
    #[error("unknown type tag: {0}")]
    UnknownTypeTag(TypeTag),

    /// More than one override fetcher supplied for the same type tag
    ///
    /// A caller-configuration error, rejected before any fetch is issued.
    #[error("only one override fetcher is allowed per type tag: {0}")]
    DuplicateOverride(TypeTag),

    /// A bulk fetcher failed while resolving its type's demand set
    #[error("fetch failed for type tag {tag}: {reason}")]
    Fetch {
        /// Tag whose group failed
        tag: TypeTag,
        /// Failure reported by the fetcher
        reason: String,
    },
}
