//! Typed memory pool and object lifecycle context for Helio.
//!
//! The layering, leaves first:
//!
//! ```text
//!   MemoryBlock      raw byte arena, unit of physical ownership
//!        │
//!   MemoryBinding    typed slot view over a block segment,
//!        │           free list + cursor + chain link
//!   MemoryPool       base block with one binding per kind,
//!        │           per-kind chains grown on exhaustion
//!   Context          object lifecycle (create/destroy), live-object
//!                    counters, teardown leak diagnostics
//! ```
//!
//! Every engine handle is created through
//! [`Context::create_object`] and returned through
//! [`Context::destroy_object`]; the handle types themselves live in
//! [`handles`]. The substrate is single-threaded: nothing here is
//! re-entrant or thread-safe.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

mod binding;
mod block;
mod config;
mod context;
mod handle;
pub mod handles;
mod pool;

pub use binding::MemoryBinding;
pub use block::{MemoryBlock, BLOCK_ALIGN};
pub use config::{BindingOverrides, ContextCreateInfo, MemoryInfo};
pub use context::{Context, LeakRecord, ShutdownReport};
pub use handle::ObjectHandle;
pub use pool::MemoryPool;

pub use helio_core::{BindingInfo, ConfigError, MemoryMode, PoolError, StructKind, TypeAllocInfo};
