//! Helio: the object lifetime and memory substrate of a multimedia
//! framework.
//!
//! This is the top-level facade crate that re-exports the public API
//! from the Helio sub-crates. For most users, adding `helio` as a
//! single dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use helio::prelude::*;
//! use helio::pool::handles::Buffer;
//!
//! // A pooled context: every engine handle comes out of per-kind
//! // binding chains carved from one base block.
//! let mut info = ContextCreateInfo::new("demo");
//! info.memory = MemoryInfo::pooled();
//! let mut ctx = Context::new(&info).unwrap();
//!
//! let mut buf: ObjectHandle<Buffer> =
//!     ctx.create_object(StructKind::Buffer).unwrap();
//! buf.byte_size = 4096;
//!
//! ctx.destroy_object(buf, StructKind::Buffer).unwrap();
//! let report = ctx.shutdown();
//! assert!(report.is_clean());
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in
//! the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `helio-core` | Structure kinds, sizing records, errors |
//! | [`collections`] | `helio-collections` | `Vector`, `ArenaList`, `Queue`, `HashMap`, raw allocation primitives |
//! | [`pool`] | `helio-pool` | Blocks, bindings, the pool, the context, handle types |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Structure kinds, sizing records, and error types (`helio-core`).
pub use helio_core as types;

/// Hand-rolled containers and the raw allocation primitives
/// (`helio-collections`).
///
/// [`collections::Vector`], [`collections::ArenaList`],
/// [`collections::Queue`], [`collections::HashMap`], and the
/// [`collections::mem`] module with the replaceable backing allocator.
pub use helio_collections as collections;

/// The typed memory pool and object lifecycle context (`helio-pool`).
///
/// [`pool::Context`] is the entry point; the creatable handle types
/// live in [`pool::handles`].
pub use helio_pool as pool;

/// Common imports for typical Helio usage.
///
/// ```rust
/// use helio::prelude::*;
/// ```
pub mod prelude {
    // Containers
    pub use helio_collections::{ArenaList, HashMap, Queue, Vector};

    // Core types
    pub use helio_core::{BindingInfo, MemoryMode, StructKind, TypeAllocInfo};

    // Errors
    pub use helio_core::{ConfigError, PoolError};

    // Context and pool
    pub use helio_pool::{
        Context, ContextCreateInfo, MemoryInfo, ObjectHandle, ShutdownReport,
    };
}
