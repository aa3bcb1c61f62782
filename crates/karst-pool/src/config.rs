//! Pool configuration parameters.

use karst_core::PlacementPolicy;

/// Numerator of the fill factor that triggers growth of a bookkeeping
/// array (3/4: grow when `used / capacity > 3/4`).
pub(crate) const FILL_FACTOR_NUM: usize = 3;

/// Denominator of the fill factor.
pub(crate) const FILL_FACTOR_DEN: usize = 4;

/// Capacity multiplier applied when a bookkeeping array grows.
pub(crate) const GROWTH_FACTOR: usize = 2;

/// Configuration for a pool's bookkeeping structures.
///
/// Controls the placement policy and the initial capacities of the
/// segment arena and the gap index. Both arrays double whenever they
/// pass 3/4 full, so the initial capacities only set where growth
/// starts. Validated at pool construction; immutable afterwards.
#[derive(Clone, Debug)]
pub struct PoolConfig {
    /// Which gap satisfies an allocation request.
    pub policy: PlacementPolicy,

    /// Initial capacity of the segment arena, in slots.
    ///
    /// Default: 40. Must be at least 1. A pool with `n` live
    /// allocations needs at most `2n + 1` slots.
    pub initial_node_capacity: usize,

    /// Initial capacity of the gap index, in entries.
    ///
    /// Default: 40. Must be at least 1.
    pub initial_gap_capacity: usize,
}

impl PoolConfig {
    /// Default segment-arena capacity.
    pub const DEFAULT_NODE_CAPACITY: usize = 40;

    /// Default gap-index capacity.
    pub const DEFAULT_GAP_CAPACITY: usize = 40;

    /// Create a config for the given policy with default capacities.
    pub fn new(policy: PlacementPolicy) -> Self {
        Self {
            policy,
            initial_node_capacity: Self::DEFAULT_NODE_CAPACITY,
            initial_gap_capacity: Self::DEFAULT_GAP_CAPACITY,
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::new(PlacementPolicy::default())
    }
}
