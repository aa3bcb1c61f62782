//! Free-space bookkeeping engine for Karst memory pools.
//!
//! A [`Pool`] owns one contiguous byte buffer and tiles it with a
//! doubly-linked list of segments, each either allocated or free. Free
//! segments are indexed by size in a [`gap::GapIndex`] that drives
//! best-fit placement. Segments live in a [`segment::SegmentArena`]
//! whose slots are addressed by index, so growing the arena never
//! invalidates a reference — which is also why this crate can forbid
//! `unsafe` outright.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod gap;
pub mod handle;
pub mod pool;
pub mod segment;

pub use config::PoolConfig;
pub use error::PoolError;
pub use handle::AllocHandle;
pub use pool::Pool;
