//! Hand-rolled containers and raw allocation primitives for Helio.
//!
//! Everything the rest of the framework stores lives in one of three
//! containers defined here, all backed by the replaceable allocation
//! primitives in [`mem`]:
//!
//! - [`Vector`] — growable contiguous sequence.
//! - [`ArenaList`] — doubly linked list whose nodes live in one
//!   contiguous array and are addressed by index, not pointer. Backs
//!   [`Queue`].
//! - [`HashMap`] — open-addressing hash table over integral keys, with
//!   collision chains expressed as next-indices inside the same array.
//!
//! None of these are thread-safe; the substrate is single-threaded by
//! design. The containers are independent of the object pool in
//! `helio-pool` but are the data structures used inside it.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod mem;

mod arena_list;
mod hash_map;
mod queue;
mod vector;

pub use arena_list::ArenaList;
pub use hash_map::{HashMap, IntKey, KeyHasher, SplitMix64};
pub use queue::Queue;
pub use vector::Vector;
