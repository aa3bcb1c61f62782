//! Process-wide registry of open Karst pools.
//!
//! The registry is a first-class value, not hidden global state: a
//! program creates a [`Registry`], initialises it, opens pools against
//! it, and shuts it down when every pool has been closed. Pool ids are
//! monotonic and never reused, so a stale id fails with `UnknownPool`
//! instead of addressing a later pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod registry;

pub use error::RegistryError;
pub use registry::Registry;
