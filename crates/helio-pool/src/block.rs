//! Raw byte arenas, the unit of physical memory ownership.

use std::alloc::Layout;
use std::ptr::NonNull;

use helio_collections::mem;

/// Alignment of every block allocation, in bytes.
///
/// Bindings carve blocks into back-to-back segments; aligning every
/// block and segment start to this bound keeps each slot aligned for
/// any handle type (all of which require at most 16-byte alignment).
pub const BLOCK_ALIGN: usize = 16;

/// A single contiguous raw byte arena of fixed size.
///
/// Created once, never resized, freed exactly once on drop. A block
/// constructed with `size == 0` is a sentinel that owns no memory.
#[derive(Debug)]
pub struct MemoryBlock {
    ptr: NonNull<u8>,
    size: usize,
}

impl MemoryBlock {
    fn layout(size: usize) -> Layout {
        Layout::from_size_align(size, BLOCK_ALIGN).expect("block size overflows layout")
    }

    /// Allocate a zero-filled arena of `size` bytes.
    pub fn new(size: usize) -> Self {
        Self {
            ptr: mem::alloc(Self::layout(size)),
            size,
        }
    }

    /// Size of the arena in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Whether this is the empty sentinel.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Pointer to byte `offset` of the arena.
    ///
    /// Bounds are the caller's contract; only debug builds assert.
    pub fn offset(&self, offset: usize) -> NonNull<u8> {
        debug_assert!(offset <= self.size, "offset past end of block");
        // SAFETY: offset stays within (or one past) the allocation.
        unsafe { NonNull::new_unchecked(self.ptr.as_ptr().add(offset)) }
    }
}

impl Drop for MemoryBlock {
    fn drop(&mut self) {
        // SAFETY: ptr was returned by mem::alloc with this layout;
        // freeing the zero-size sentinel is a no-op.
        unsafe { mem::free(self.ptr, Self::layout(self.size)) };
    }
}
