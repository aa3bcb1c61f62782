//! Karst: a memory-pool allocator with first-fit/best-fit placement
//! and eager coalescing.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Karst sub-crates. For most users, adding `karst` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use karst::prelude::*;
//!
//! let mut registry = Registry::new();
//! registry.init().unwrap();
//!
//! // One megabyte pool under best-fit placement.
//! let pool = registry.open(1 << 20, PlacementPolicy::BestFit).unwrap();
//!
//! let h = registry.allocate(pool, 4096).unwrap();
//! assert_eq!(h.size(), 4096);
//! registry.pool_mut(pool).unwrap().slice_mut(h).unwrap().fill(0x2A);
//!
//! registry.release(pool, h).unwrap();
//! registry.close(pool).unwrap();
//! registry.shutdown().unwrap();
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `karst-core` | `PoolId`, `PlacementPolicy`, `SegmentSnapshot` |
//! | [`pool`] | `karst-pool` | `Pool`, `AllocHandle`, `PoolConfig`, `PoolError`, the segment and gap structures |
//! | [`registry`] | `karst-registry` | `Registry`, `RegistryError` |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and ids (`karst-core`).
pub use karst_core as types;

/// The pool engine (`karst-pool`).
///
/// Most users only need [`pool::Pool`] and [`pool::AllocHandle`] from
/// this module — they are also available in the [`prelude`].
pub use karst_pool as pool;

/// The pool registry (`karst-registry`).
pub use karst_registry as registry;

/// Common imports for typical Karst usage.
///
/// ```rust
/// use karst::prelude::*;
/// ```
pub mod prelude {
    pub use karst_core::{PlacementPolicy, PoolId, PoolInstanceId, SegmentSnapshot};
    pub use karst_pool::{AllocHandle, Pool, PoolConfig, PoolError};
    pub use karst_registry::{Registry, RegistryError};
}
