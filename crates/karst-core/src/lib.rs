//! Core types for the Karst memory-pool allocator.
//!
//! This is the leaf crate with zero dependencies. It defines the types
//! shared between the pool engine and the registry: pool identifiers,
//! placement policies, and inspection snapshots.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod policy;
pub mod snapshot;

// Re-export core types at crate root for convenience.
pub use id::{PoolId, PoolInstanceId};
pub use policy::PlacementPolicy;
pub use snapshot::SegmentSnapshot;
