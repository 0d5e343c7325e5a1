//! Resolution engine for tether
//!
//! Sits between an owner record's history-encoded reference field and the
//! persistence layer's bulk fetchers:
//!
//! - [`HistoryField`] / [`Relation`]: the field an owner embeds and the
//!   relation names it exposes over it
//! - [`Resolver`]: lazy per-owner resolution with cache-validity checking
//! - [`Prefetcher`] / [`FetchOverrides`]: batch planning, one bulk fetch
//!   per distinct target type across a whole collection of owners
//! - [`redistribute`]: routing pooled results back to owners in per-owner
//!   history order, duplicates and all
//!
//! The engine is synchronous and holds no locks beyond each owner's cache
//! mutex; the only blocking calls are the registry's fetchers.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod field;
pub mod prefetch;
pub mod redistribute;
pub mod resolver;

pub use field::{Cardinality, HistoryField, Relation};
pub use prefetch::{Expectation, FetchOutcome, FetchOverrides, PrefetchPlan, Prefetcher};
pub use redistribute::{owner_list, redistribute};
pub use resolver::Resolver;
