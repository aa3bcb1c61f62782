//! Client-visible allocation handles.
//!
//! An [`AllocHandle`] names one live allocation within the pool that
//! issued it. It is validated structurally on every use: the pool
//! accepts a handle only when the handle's pool instance id matches
//! its own and a live allocated segment matches both the offset and
//! the stamp. Stale handles (released, or from a closed pool) and
//! handles issued by a different pool are rejected rather than
//! aliasing whatever lives there now.

use std::fmt;

use karst_core::PoolInstanceId;

/// Opaque handle to a live allocation within a pool.
///
/// Produced by `Pool::allocate`; invalidated by `Pool::release` and by
/// closing the pool; stable across all other operations on the issuing
/// pool, including growth of its bookkeeping arrays. Any other pool
/// rejects it with `BadHandle`, even if that pool holds an allocation
/// of identical shape. The recorded size can be read without touching
/// the pool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[must_use]
pub struct AllocHandle {
    /// Byte offset of the allocation within the pool buffer.
    pub(crate) offset: usize,
    /// Recorded size of the allocation in bytes.
    pub(crate) size: usize,
    /// Per-pool monotonic stamp identifying this allocation's tenancy.
    pub(crate) stamp: u64,
    /// Instance id of the pool that issued this handle.
    pub(crate) pool: PoolInstanceId,
}

impl AllocHandle {
    pub(crate) fn new(offset: usize, size: usize, stamp: u64, pool: PoolInstanceId) -> Self {
        Self {
            offset,
            size,
            stamp,
            pool,
        }
    }

    /// Byte offset of the allocation within the pool buffer.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Recorded size of the allocation in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Instance id of the pool that issued this handle.
    pub fn pool(&self) -> PoolInstanceId {
        self.pool
    }
}

impl fmt::Display for AllocHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AllocHandle(pool={}, off={}, size={}, stamp={})",
            self.pool, self.offset, self.size, self.stamp
        )
    }
}
