//! Pool-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during pool operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PoolError {
    /// A zero-byte pool open or allocation request. Requests must be at
    /// least one byte.
    ZeroSized,
    /// A `PoolConfig` with values the pool cannot operate on.
    InvalidConfig {
        /// Human-readable description of the rejected value.
        reason: String,
    },
    /// No gap in the pool is large enough for the request.
    OutOfSpace {
        /// Number of bytes requested.
        requested: usize,
    },
    /// The host allocator refused a reservation while opening a pool or
    /// growing its bookkeeping arrays. The pool is unchanged.
    OutOfMemory,
    /// A handle that does not name a live allocation in this pool —
    /// either foreign, already released, or from a closed pool.
    BadHandle {
        /// The buffer offset recorded in the rejected handle.
        offset: usize,
    },
    /// Close was attempted while allocations are still live.
    NotEmpty {
        /// Number of live allocations at the time of the attempt.
        live_allocs: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSized => write!(f, "zero-sized request"),
            Self::InvalidConfig { reason } => write!(f, "invalid pool config: {reason}"),
            Self::OutOfSpace { requested } => {
                write!(f, "out of space: no gap holds {requested} bytes")
            }
            Self::OutOfMemory => write!(f, "host allocator refused reservation"),
            Self::BadHandle { offset } => {
                write!(f, "bad handle: no live allocation at offset {offset}")
            }
            Self::NotEmpty { live_allocs } => {
                write!(f, "pool not empty: {live_allocs} live allocations")
            }
        }
    }
}

impl Error for PoolError {}
