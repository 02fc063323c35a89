//! Raw allocation primitives with a replaceable backing allocator.
//!
//! Every container in this crate (and every block the pool carves up)
//! obtains memory through [`alloc`]/[`free`]/[`realloc`] rather than
//! calling the platform heap directly. The backing strategy is a
//! process-wide [`MemAllocator`] installed at most once via
//! [`set_allocator`], defaulting to the platform heap.
//!
//! Two guarantees the rest of the substrate relies on:
//!
//! - [`alloc`] returns zero-filled memory.
//! - Heap exhaustion is fatal. There is no recovery path for
//!   out-of-memory, so a failed allocation aborts via
//!   [`std::alloc::handle_alloc_error`] instead of returning null.
//!
//! A global live-allocation counter tracks every outstanding
//! [`alloc`]/[`free`] pair; a non-zero counter at context teardown is
//! reported as a warning.

use std::alloc::Layout;
use std::error::Error;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::OnceLock;

/// Backing allocation strategy for the substrate.
///
/// # Safety
///
/// Implementations must behave like a heap allocator: `alloc` returns
/// null or a pointer valid for `layout.size()` bytes at
/// `layout.align()` alignment, zero-filled; `dealloc` and `realloc`
/// accept only pointers previously returned by the same allocator with
/// the layout they were allocated with.
pub unsafe trait MemAllocator: Sync {
    /// Allocate `layout.size()` zero-filled bytes. Returns null on
    /// failure.
    ///
    /// # Safety
    ///
    /// `layout` must have non-zero size.
    unsafe fn alloc(&self, layout: Layout) -> *mut u8;

    /// Release an allocation.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for `layout`.
    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout);

    /// Grow or shrink an allocation to `new_size` bytes, preserving
    /// the common prefix. Returns null on failure. Bytes beyond the
    /// old size are not zeroed.
    ///
    /// # Safety
    ///
    /// `ptr` must have been returned by this allocator for
    /// `old_layout`, and `new_size` must be non-zero.
    unsafe fn realloc(&self, ptr: *mut u8, old_layout: Layout, new_size: usize) -> *mut u8;
}

/// Default strategy delegating to the platform heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemAllocator;

// SAFETY: delegates directly to std::alloc, which upholds the contract.
unsafe impl MemAllocator for SystemAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        std::alloc::alloc_zeroed(layout)
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        std::alloc::dealloc(ptr, layout);
    }

    unsafe fn realloc(&self, ptr: *mut u8, old_layout: Layout, new_size: usize) -> *mut u8 {
        std::alloc::realloc(ptr, old_layout, new_size)
    }
}

static SYSTEM: SystemAllocator = SystemAllocator;
static ALLOCATOR: OnceLock<&'static dyn MemAllocator> = OnceLock::new();
static LIVE_ALLOCATIONS: AtomicIsize = AtomicIsize::new(0);

/// Error returned when [`set_allocator`] is called a second time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AllocatorInstallError;

impl fmt::Display for AllocatorInstallError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a backing allocator has already been installed")
    }
}

impl Error for AllocatorInstallError {}

/// Install the process-wide backing allocator.
///
/// Must be called before the first allocation the caller wants routed
/// through it; allocations made earlier used the platform heap and
/// will be released through it. At most one install succeeds for the
/// lifetime of the process.
pub fn set_allocator(allocator: &'static dyn MemAllocator) -> Result<(), AllocatorInstallError> {
    ALLOCATOR
        .set(allocator)
        .map_err(|_| AllocatorInstallError)
}

fn allocator() -> &'static dyn MemAllocator {
    ALLOCATOR.get().copied().unwrap_or(&SYSTEM)
}

/// Number of outstanding allocations made through this module.
pub fn live_allocations() -> isize {
    LIVE_ALLOCATIONS.load(Ordering::Relaxed)
}

fn dangling_for(layout: Layout) -> NonNull<u8> {
    // Alignment is non-zero, so the pointer is non-null.
    // SAFETY: see above; the pointer is never dereferenced.
    unsafe { NonNull::new_unchecked(layout.align() as *mut u8) }
}

/// Allocate `layout.size()` zero-filled bytes.
///
/// Zero-size layouts return a dangling, well-aligned sentinel without
/// touching the allocator or the counter. Allocation failure aborts
/// the process.
pub fn alloc(layout: Layout) -> NonNull<u8> {
    if layout.size() == 0 {
        return dangling_for(layout);
    }
    // SAFETY: layout has non-zero size.
    let raw = unsafe { allocator().alloc(layout) };
    let Some(ptr) = NonNull::new(raw) else {
        std::alloc::handle_alloc_error(layout);
    };
    LIVE_ALLOCATIONS.fetch_add(1, Ordering::Relaxed);
    ptr
}

/// Release an allocation made by [`alloc`] or [`realloc`].
///
/// Zero-size layouts are the sentinel case and are ignored.
///
/// # Safety
///
/// `ptr` must have been returned by [`alloc`] or [`realloc`] with this
/// exact `layout`, and must not be used afterwards.
pub unsafe fn free(ptr: NonNull<u8>, layout: Layout) {
    if layout.size() == 0 {
        return;
    }
    // SAFETY: forwarded caller contract.
    unsafe { allocator().dealloc(ptr.as_ptr(), layout) };
    LIVE_ALLOCATIONS.fetch_sub(1, Ordering::Relaxed);
}

/// Resize an allocation, preserving the common prefix of its contents.
///
/// Growing from or shrinking to a zero-size layout degenerates to
/// [`alloc`]/[`free`]. Allocation failure aborts the process. Bytes
/// beyond the old size are not zeroed.
///
/// # Safety
///
/// `ptr` must have been returned by [`alloc`] or [`realloc`] with this
/// exact `old_layout`, and must not be used afterwards.
pub unsafe fn realloc(ptr: NonNull<u8>, old_layout: Layout, new_size: usize) -> NonNull<u8> {
    if old_layout.size() == 0 {
        let new_layout = Layout::from_size_align(new_size, old_layout.align())
            .expect("reallocation size overflows layout");
        return alloc(new_layout);
    }
    if new_size == 0 {
        // SAFETY: forwarded caller contract.
        unsafe { free(ptr, old_layout) };
        return dangling_for(old_layout);
    }
    // SAFETY: forwarded caller contract; new_size is non-zero.
    let raw = unsafe { allocator().realloc(ptr.as_ptr(), old_layout, new_size) };
    let Some(new_ptr) = NonNull::new(raw) else {
        let new_layout = Layout::from_size_align(new_size, old_layout.align())
            .expect("reallocation size overflows layout");
        std::alloc::handle_alloc_error(new_layout);
    };
    new_ptr
}
