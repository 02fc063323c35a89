//! Owning handles to pool-constructed objects.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};
use std::ptr::NonNull;

/// Owning handle to an object constructed by
/// [`Context::create_object`](crate::Context::create_object).
///
/// The handle is non-copyable and dereferences to the object. It does
/// not release the slot on drop: every handle must be returned through
/// [`Context::destroy_object`](crate::Context::destroy_object), and a
/// forgotten handle is a leak that teardown diagnostics report.
///
/// Contract: the object lives until `destroy_object` or context
/// teardown, whichever comes first. A handle held across teardown
/// dangles and must not be dereferenced.
pub struct ObjectHandle<T> {
    ptr: NonNull<T>,
    _owned: PhantomData<T>,
}

impl<T> ObjectHandle<T> {
    pub(crate) fn new(ptr: NonNull<T>) -> Self {
        Self {
            ptr,
            _owned: PhantomData,
        }
    }

    pub(crate) fn into_raw(self) -> NonNull<T> {
        self.ptr
    }

    /// Raw pointer to the object. Useful for identity checks; the
    /// lifetime contract above still applies.
    pub fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }
}

impl<T> Deref for ObjectHandle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        // SAFETY: create_object constructed a T here; the handle
        // contract keeps it alive until destroy_object consumes self.
        unsafe { self.ptr.as_ref() }
    }
}

impl<T> DerefMut for ObjectHandle<T> {
    fn deref_mut(&mut self) -> &mut T {
        // SAFETY: see Deref; handles are unique, so no aliasing.
        unsafe { self.ptr.as_mut() }
    }
}

impl<T> fmt::Debug for ObjectHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectHandle")
            .field("ptr", &self.ptr)
            .finish()
    }
}
