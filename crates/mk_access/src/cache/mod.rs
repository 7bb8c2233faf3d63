//! Concurrency-safe memoization of compiled accessors and mapping tables.
//!
//! See [`AccessorCache`].

// -----------------------------------------------------------------------------
// Modules

mod accessor_cache;
mod accessor_map;
mod key;

// -----------------------------------------------------------------------------
// Exports

pub use accessor_cache::{AccessorCache, CacheStats, DEFAULT_SHARD_COUNT};
pub use accessor_map::AccessorMap;
pub use key::AccessorKey;
