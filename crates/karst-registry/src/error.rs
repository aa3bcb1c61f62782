//! Registry-specific error types.

use std::error::Error;
use std::fmt;

use karst_core::PoolId;
use karst_pool::PoolError;

/// Errors that can occur during registry operations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryError {
    /// `init` was called on an already-initialised registry.
    AlreadyInitialized,
    /// An operation was attempted before `init` (or after `shutdown`).
    NotInitialized,
    /// `shutdown` was attempted while pools are still open.
    Leaked {
        /// Number of pools still open.
        open_pools: usize,
    },
    /// The pool id does not name an open pool — never issued by this
    /// registry, or already closed.
    UnknownPool {
        /// The unrecognised id.
        pool: PoolId,
    },
    /// Opening a new pool failed before it was registered.
    OpenFailed {
        /// The underlying pool error.
        reason: PoolError,
    },
    /// An operation on an open pool failed.
    Pool {
        /// The pool the operation addressed.
        pool: PoolId,
        /// The underlying pool error.
        reason: PoolError,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyInitialized => write!(f, "registry already initialised"),
            Self::NotInitialized => write!(f, "registry not initialised"),
            Self::Leaked { open_pools } => {
                write!(f, "shutdown with {open_pools} pools still open")
            }
            Self::UnknownPool { pool } => write!(f, "unknown pool {pool}"),
            Self::OpenFailed { reason } => write!(f, "failed to open pool: {reason}"),
            Self::Pool { pool, reason } => write!(f, "pool {pool}: {reason}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::OpenFailed { reason } | Self::Pool { reason, .. } => Some(reason),
            _ => None,
        }
    }
}
