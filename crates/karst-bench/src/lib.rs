//! Benchmark profiles and utilities for the Karst allocator.
//!
//! Provides pre-built pools for benchmarking:
//!
//! - [`fresh_pool`]: one whole-buffer gap, the cheapest placement case
//! - [`churned_pool`]: a fragmented pool with many gaps of mixed sizes,
//!   the case the gap index exists for

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use karst_core::PlacementPolicy;
use karst_pool::Pool;

/// Buffer size shared by the benchmark profiles.
pub const PROFILE_POOL_SIZE: usize = 1 << 20;

/// A freshly opened pool: a single gap spanning the whole buffer.
pub fn fresh_pool(policy: PlacementPolicy) -> Pool {
    Pool::new(PROFILE_POOL_SIZE, policy).expect("profile pool opens")
}

/// A fragmented pool with `live` allocations still outstanding.
///
/// Allocates `2 * live` blocks of cycling sizes, then releases every
/// other one, leaving `live` allocations separated by isolated gaps.
/// Returns the pool; the outstanding handles are deliberately dropped
/// so benchmarks measure placement, not bookkeeping teardown.
pub fn churned_pool(policy: PlacementPolicy, live: usize) -> Pool {
    let mut pool = fresh_pool(policy);
    let handles: Vec<_> = (0..live * 2)
        .map(|i| {
            let size = 64 + (i % 7) * 32;
            pool.allocate(size).expect("churn allocation fits")
        })
        .collect();
    for h in handles.into_iter().skip(1).step_by(2) {
        pool.release(h).expect("churn handle is live");
    }
    pool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn churned_pool_is_fragmented() {
        let pool = churned_pool(PlacementPolicy::BestFit, 32);
        assert_eq!(pool.allocation_count(), 32);
        // Every released block became an isolated gap, except the last
        // one, which coalesced into the tail gap.
        assert_eq!(pool.gap_count(), 32);
    }
}
