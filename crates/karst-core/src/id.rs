//! Strongly-typed pool identifiers.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Identifies an open pool within a registry.
///
/// Pool ids are issued from a monotonic per-registry counter and are
/// never reused, even after the pool they named has been closed. A
/// `PoolId` held past `close` therefore fails with `UnknownPool` rather
/// than silently addressing a different pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolId(pub u32);

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PoolId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Counter for unique [`PoolInstanceId`] allocation.
static POOL_INSTANCE_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique per-instance identifier for a pool value.
///
/// Allocated from a monotonic atomic counter via
/// [`PoolInstanceId::next`]. Two distinct pools always have different
/// ids, even across registries and even when one is closed before the
/// other opens. Allocation handles record the id of the pool that
/// issued them, so a handle presented to any other pool is rejected
/// instead of silently matching a look-alike allocation there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolInstanceId(u64);

impl PoolInstanceId {
    /// Allocate a fresh, unique instance id.
    ///
    /// Each call returns an id that has never been returned before
    /// within this process. Thread-safe.
    pub fn next() -> Self {
        Self(POOL_INSTANCE_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for PoolInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
