//! Allocation-sizing records consumed by the pool.

use crate::kind::StructKind;

/// Per-kind sizing record for one binding: the slot size in bytes and
/// the number of slots.
///
/// Two parallel tables of these exist in a context: one sizing the base
/// pool, one sizing each chained block created when a kind's binding
/// chain is exhausted. Immutable once the context is constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TypeAllocInfo {
    /// The structure kind this record sizes.
    pub kind: StructKind,
    /// Slot size in bytes (the handle struct's size).
    pub size: usize,
    /// Number of slots per binding.
    pub count: usize,
}

impl TypeAllocInfo {
    /// Total bytes one binding of this record occupies.
    pub fn segment_bytes(&self) -> usize {
        self.size * self.count
    }
}

/// Caller-supplied override of a kind's slot count.
///
/// Slot sizes are fixed by the handle types themselves; only the count
/// is configurable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BindingInfo {
    /// The structure kind to resize.
    pub kind: StructKind,
    /// Replacement slot count. Zero is a configuration error.
    pub count: usize,
}
