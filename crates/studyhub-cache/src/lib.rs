//! # studyhub-cache
//!
//! In-memory projections of the study store: every collection sorted by
//! display order, orphans filtered out, and per-parent counts.
//!
//! - [`CacheSnapshot`] is an immutable, fully derived view of the store.
//! - [`AggregateCache`] rebuilds it from the store on demand and swaps it
//!   in as a whole, so readers never see a half-built projection.

pub mod aggregate;
pub mod snapshot;

pub use aggregate::AggregateCache;
pub use snapshot::{CacheSnapshot, Totals};
