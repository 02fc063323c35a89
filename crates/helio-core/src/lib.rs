//! Core types for the Helio memory substrate.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the structure-kind enum that tags every engine handle allocation,
//! the allocation-sizing records consumed by the pool, and the error
//! types shared across the workspace.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

mod error;
mod info;
mod kind;

pub use error::{ConfigError, PoolError};
pub use info::{BindingInfo, TypeAllocInfo};
pub use kind::{MemoryMode, StructKind};
