use crate::cache::DEFAULT_SHARD_COUNT;
use crate::compile::Strategy;

/// Run-time configuration of an [`AccessEngine`](super::AccessEngine).
///
/// ```
/// use mk_access::prelude::*;
///
/// let config = EngineConfig::new()
///     .with_default_strategy(Strategy::Emitted)
///     .with_shard_count(5);
/// assert_eq!(config.shard_count(), 8);
/// assert_eq!(EngineConfig::new().with_shard_count(0).shard_count(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    default_strategy: Strategy,
    shard_count: usize,
}

impl Default for EngineConfig {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Tree compilation, [`DEFAULT_SHARD_COUNT`] shards.
    #[inline]
    pub const fn new() -> Self {
        Self {
            default_strategy: Strategy::Tree,
            shard_count: DEFAULT_SHARD_COUNT,
        }
    }

    /// Sets the strategy used when the caller does not pick one.
    #[inline]
    pub const fn with_default_strategy(mut self, strategy: Strategy) -> Self {
        self.default_strategy = strategy;
        self
    }

    /// Sets the number of cache shards, rounded up to a power of two of at
    /// least two.
    #[inline]
    pub const fn with_shard_count(mut self, count: usize) -> Self {
        self.shard_count = if count <= 2 { 2 } else { count.next_power_of_two() };
        self
    }

    #[inline]
    pub const fn default_strategy(&self) -> Strategy {
        self.default_strategy
    }

    #[inline]
    pub const fn shard_count(&self) -> usize {
        self.shard_count
    }
}
