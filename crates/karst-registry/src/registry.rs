//! The registry value mapping pool ids to open pools.

use indexmap::IndexMap;

use karst_core::{PlacementPolicy, PoolId, SegmentSnapshot};
use karst_pool::{AllocHandle, Pool, PoolConfig, PoolError};

use crate::error::RegistryError;

/// Registry of open pools.
///
/// Created uninitialised; `init` installs the pool table and
/// `shutdown` removes it again once every pool is closed. All pool
/// operations go through the id issued by [`Registry::open`], or
/// through [`Registry::pool`] / [`Registry::pool_mut`] for direct
/// access to the [`Pool`] value (byte slices, stats).
///
/// Single-threaded, like the pools it holds. A program may run several
/// registries; their ids are not interchangeable.
pub struct Registry {
    /// Open pools in open order. `None` until `init`.
    pools: Option<IndexMap<PoolId, Pool>>,
    /// Next pool id. Monotonic; ids are never reused.
    next_pool: u32,
}

impl Registry {
    /// Initial capacity of the pool table.
    pub const INITIAL_POOL_CAPACITY: usize = 20;

    /// Create an uninitialised registry.
    pub fn new() -> Self {
        Self {
            pools: None,
            next_pool: 0,
        }
    }

    /// Install the pool table. Fails if already initialised.
    pub fn init(&mut self) -> Result<(), RegistryError> {
        if self.pools.is_some() {
            return Err(RegistryError::AlreadyInitialized);
        }
        self.pools = Some(IndexMap::with_capacity(Self::INITIAL_POOL_CAPACITY));
        Ok(())
    }

    /// Tear the registry down.
    ///
    /// Fails with `NotInitialized` before `init` and with `Leaked` if
    /// any pool is still open — close them first; the registry stays
    /// usable after the failure.
    pub fn shutdown(&mut self) -> Result<(), RegistryError> {
        let pools = self.pools.as_ref().ok_or(RegistryError::NotInitialized)?;
        if !pools.is_empty() {
            return Err(RegistryError::Leaked {
                open_pools: pools.len(),
            });
        }
        self.pools = None;
        Ok(())
    }

    /// Whether `init` has run (and `shutdown` has not).
    pub fn is_initialized(&self) -> bool {
        self.pools.is_some()
    }

    /// Number of open pools.
    pub fn pool_count(&self) -> usize {
        self.pools.as_ref().map_or(0, IndexMap::len)
    }

    /// Open a pool of `size` bytes under the given policy.
    pub fn open(
        &mut self,
        size: usize,
        policy: PlacementPolicy,
    ) -> Result<PoolId, RegistryError> {
        self.open_with_config(size, PoolConfig::new(policy))
    }

    /// Open a pool with explicit bookkeeping capacities.
    pub fn open_with_config(
        &mut self,
        size: usize,
        config: PoolConfig,
    ) -> Result<PoolId, RegistryError> {
        let pools = self.pools.as_mut().ok_or(RegistryError::NotInitialized)?;
        let pool =
            Pool::with_config(size, config).map_err(|reason| RegistryError::OpenFailed { reason })?;
        let id = PoolId(self.next_pool);
        self.next_pool += 1;
        pools.insert(id, pool);
        Ok(id)
    }

    /// Close a pool, releasing its buffer and bookkeeping.
    ///
    /// Fails with `NotEmpty` while allocations are live; the pool
    /// stays open and fully usable.
    pub fn close(&mut self, pool: PoolId) -> Result<(), RegistryError> {
        let pools = self.pools.as_mut().ok_or(RegistryError::NotInitialized)?;
        let p = pools
            .get(&pool)
            .ok_or(RegistryError::UnknownPool { pool })?;
        if p.allocation_count() > 0 {
            return Err(RegistryError::Pool {
                pool,
                reason: PoolError::NotEmpty {
                    live_allocs: p.allocation_count(),
                },
            });
        }
        pools.shift_remove(&pool);
        Ok(())
    }

    /// Allocate `size` bytes from the given pool.
    pub fn allocate(&mut self, pool: PoolId, size: usize) -> Result<AllocHandle, RegistryError> {
        self.pool_mut(pool)?
            .allocate(size)
            .map_err(|reason| RegistryError::Pool { pool, reason })
    }

    /// Release an allocation back to the given pool.
    pub fn release(&mut self, pool: PoolId, handle: AllocHandle) -> Result<(), RegistryError> {
        self.pool_mut(pool)?
            .release(handle)
            .map_err(|reason| RegistryError::Pool { pool, reason })
    }

    /// Snapshot the given pool's segments in address order.
    pub fn inspect(&self, pool: PoolId) -> Result<Vec<SegmentSnapshot>, RegistryError> {
        self.pool(pool)?
            .inspect()
            .map_err(|reason| RegistryError::Pool { pool, reason })
    }

    /// Shared access to an open pool.
    pub fn pool(&self, pool: PoolId) -> Result<&Pool, RegistryError> {
        self.pools
            .as_ref()
            .ok_or(RegistryError::NotInitialized)?
            .get(&pool)
            .ok_or(RegistryError::UnknownPool { pool })
    }

    /// Mutable access to an open pool.
    pub fn pool_mut(&mut self, pool: PoolId) -> Result<&mut Pool, RegistryError> {
        self.pools
            .as_mut()
            .ok_or(RegistryError::NotInitialized)?
            .get_mut(&pool)
            .ok_or(RegistryError::UnknownPool { pool })
    }

    /// Iterate over the open pools in open order.
    pub fn pools(&self) -> impl Iterator<Item = (PoolId, &Pool)> {
        self.pools
            .as_ref()
            .into_iter()
            .flat_map(|pools| pools.iter().map(|(&id, pool)| (id, pool)))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
