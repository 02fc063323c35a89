//! Growable contiguous sequence backed by the [`mem`](crate::mem)
//! primitives.
//!
//! [`Vector`] is the workhorse container of the substrate: the pool's
//! binding tables, every free list, and the other containers' backing
//! arrays are all `Vector`s. It differs from `std::vec::Vec` in two
//! deliberate ways: `reserve(n)` allocates exactly `n` slots (no
//! amortization slack beyond what `push` itself requests), and cloning
//! allocates exactly `other.len()` capacity.

use std::alloc::Layout;
use std::fmt;
use std::mem::{needs_drop, size_of};
use std::ops::{Deref, DerefMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::mem;

/// Growable contiguous sequence.
///
/// Elements `[0, len)` are initialized; slots `[len, capacity)` are
/// raw. Indexing and iteration go through the slice deref, so
/// out-of-range indexing panics.
pub struct Vector<T> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
}

impl<T> Vector<T> {
    const IS_ZST: bool = size_of::<T>() == 0;

    /// Create an empty vector without allocating.
    pub fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
        }
    }

    /// Create an empty vector with room for `n` elements.
    pub fn with_capacity(n: usize) -> Self {
        let mut v = Self::new();
        v.reserve(n);
        v
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the vector holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated slots.
    pub fn capacity(&self) -> usize {
        if Self::IS_ZST {
            usize::MAX
        } else {
            self.cap
        }
    }

    fn array_layout(cap: usize) -> Layout {
        Layout::array::<T>(cap).expect("capacity overflow")
    }

    /// Grow the buffer to exactly `n` slots. No-op if `n` does not
    /// exceed the current capacity.
    ///
    /// Existing elements are preserved; growth is a reallocation, so
    /// element addresses are not stable across this call.
    pub fn reserve(&mut self, n: usize) {
        if Self::IS_ZST || n <= self.cap {
            return;
        }
        let new_layout = Self::array_layout(n);
        let new_ptr = if self.cap == 0 {
            mem::alloc(new_layout)
        } else {
            let old_layout = Self::array_layout(self.cap);
            // SAFETY: the buffer was allocated with old_layout and is
            // not used through the old pointer afterwards.
            unsafe { mem::realloc(self.ptr.cast(), old_layout, new_layout.size()) }
        };
        self.ptr = new_ptr.cast();
        self.cap = n;
    }

    fn grow_for_one(&mut self) {
        if !Self::IS_ZST && self.len == self.cap {
            let new_cap = if self.cap == 0 { 4 } else { self.cap * 2 };
            self.reserve(new_cap);
        }
    }

    /// Append an element. Amortized O(1): a full buffer doubles.
    pub fn push(&mut self, value: T) {
        self.grow_for_one();
        // SAFETY: slot self.len is within capacity and uninitialized.
        unsafe { self.ptr.as_ptr().add(self.len).write(value) };
        self.len += 1;
    }

    /// Remove and return the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot self.len was the last initialized element.
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Insert `value` at position `index`, shifting the tail right.
    ///
    /// Panics if `index > len`.
    pub fn insert_index(&mut self, index: usize, value: T) {
        assert!(index <= self.len, "insert index out of range");
        self.grow_for_one();
        // SAFETY: index <= len < capacity after growth; the shifted
        // range stays within the buffer.
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            ptr::copy(p, p.add(1), self.len - index);
            p.write(value);
        }
        self.len += 1;
    }

    /// Remove and return the element at `index`, shifting the tail
    /// left. No tombstones remain.
    ///
    /// Panics if `index >= len`.
    pub fn erase_index(&mut self, index: usize) -> T {
        assert!(index < self.len, "erase index out of range");
        // SAFETY: index < len; the shifted range stays within the
        // initialized prefix.
        unsafe {
            let p = self.ptr.as_ptr().add(index);
            let value = p.read();
            ptr::copy(p.add(1), p, self.len - index - 1);
            self.len -= 1;
            value
        }
    }

    /// Shrink to `n` elements, dropping the trimmed tail. No-op if
    /// `n >= len`.
    pub fn truncate(&mut self, n: usize) {
        while self.len > n {
            self.pop();
        }
    }

    /// Drop every element. Capacity is retained.
    pub fn clear(&mut self) {
        if needs_drop::<T>() {
            for i in 0..self.len {
                // SAFETY: element i is initialized and dropped once.
                unsafe { ptr::drop_in_place(self.ptr.as_ptr().add(i)) };
            }
        }
        self.len = 0;
    }

    /// Drop every element and release the buffer.
    pub fn clear_free(&mut self) {
        self.clear();
        self.release_buffer();
    }

    /// Reallocate the buffer down to exactly `len` slots.
    pub fn shrink_to_fit(&mut self) {
        if Self::IS_ZST || self.len == self.cap {
            return;
        }
        if self.len == 0 {
            self.release_buffer();
            return;
        }
        let old_layout = Self::array_layout(self.cap);
        let new_layout = Self::array_layout(self.len);
        // SAFETY: the buffer was allocated with old_layout; shrinking
        // preserves the initialized prefix.
        let new_ptr = unsafe { mem::realloc(self.ptr.cast(), old_layout, new_layout.size()) };
        self.ptr = new_ptr.cast();
        self.cap = self.len;
    }

    /// First element equal to `target`, by linear scan.
    pub fn find(&self, target: &T) -> Option<&T>
    where
        T: PartialEq,
    {
        self.iter().find(|v| *v == target)
    }

    /// Index of the first element equal to `target`, by linear scan.
    pub fn find_index(&self, target: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.iter().position(|v| v == target)
    }

    /// Whether any element equals `target`.
    pub fn contains(&self, target: &T) -> bool
    where
        T: PartialEq,
    {
        self.find_index(target).is_some()
    }

    /// First element, if any.
    pub fn front(&self) -> Option<&T> {
        self.first()
    }

    /// Last element, if any.
    pub fn back(&self) -> Option<&T> {
        self.last()
    }

    fn release_buffer(&mut self) {
        if !Self::IS_ZST && self.cap > 0 {
            let layout = Self::array_layout(self.cap);
            // SAFETY: the buffer was allocated with this layout and is
            // never touched again.
            unsafe { mem::free(self.ptr.cast(), layout) };
            self.ptr = NonNull::dangling();
            self.cap = 0;
        }
    }
}

impl<T: Default> Vector<T> {
    /// Grow or shrink to exactly `n` elements, default-constructing
    /// the new tail or dropping the trimmed one.
    pub fn resize(&mut self, n: usize) {
        if n <= self.len {
            self.truncate(n);
            return;
        }
        self.reserve(n);
        while self.len < n {
            // SAFETY: slot self.len is within capacity and
            // uninitialized.
            unsafe { self.ptr.as_ptr().add(self.len).write(T::default()) };
            self.len += 1;
        }
    }
}

impl<T: Clone> Vector<T> {
    /// Grow or shrink to exactly `n` elements, cloning `value` into
    /// the new tail or dropping the trimmed one.
    pub fn resize_with_value(&mut self, n: usize, value: &T) {
        if n <= self.len {
            self.truncate(n);
            return;
        }
        self.reserve(n);
        while self.len < n {
            // SAFETY: slot self.len is within capacity and
            // uninitialized.
            unsafe { self.ptr.as_ptr().add(self.len).write(value.clone()) };
            self.len += 1;
        }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        self.clear();
        self.release_buffer();
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for Vector<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        // SAFETY: [0, len) is the initialized prefix.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<T> DerefMut for Vector<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is the initialized prefix.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<T: Clone> Clone for Vector<T> {
    /// Clones allocate exactly `other.len()` capacity, not
    /// `other.capacity()`.
    fn clone(&self) -> Self {
        let mut out = Self::with_capacity(self.len);
        for value in self.iter() {
            out.push(value.clone());
        }
        out
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        let mut out = Self::with_capacity(values.len());
        for value in values {
            out.push(value.clone());
        }
        out
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_ref() == other.as_ref()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// SAFETY: Vector owns its elements; sending or sharing it is exactly
// sending or sharing the elements.
unsafe impl<T: Send> Send for Vector<T> {}
// SAFETY: see above.
unsafe impl<T: Sync> Sync for Vector<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn push_pop_round_trip() {
        let mut v = Vector::new();
        v.push(1);
        v.push(2);
        v.push(3);
        assert_eq!(v.len(), 3);
        assert_eq!(v.pop(), Some(3));
        assert_eq!(v.pop(), Some(2));
        assert_eq!(v.pop(), Some(1));
        assert_eq!(v.pop(), None);
    }

    #[test]
    fn push_doubles_capacity() {
        let mut v = Vector::new();
        for i in 0..5 {
            v.push(i);
        }
        assert_eq!(v.capacity(), 8);
    }

    #[test]
    fn reserve_allocates_exactly() {
        let mut v: Vector<u64> = Vector::new();
        v.reserve(10);
        assert_eq!(v.capacity(), 10);
        v.reserve(3);
        assert_eq!(v.capacity(), 10, "smaller reserve is a no-op");
    }

    #[test]
    fn clone_capacity_matches_len() {
        let mut v = Vector::with_capacity(32);
        v.push(1);
        v.push(2);
        let c = v.clone();
        assert_eq!(c.len(), 2);
        assert_eq!(c.capacity(), 2);
        assert_eq!(&c[..], &[1, 2]);
    }

    #[test]
    fn insert_shifts_tail_right() {
        let mut v = Vector::from(&[1, 2, 4][..]);
        v.insert_index(2, 3);
        assert_eq!(&v[..], &[1, 2, 3, 4]);
        v.insert_index(0, 0);
        assert_eq!(&v[..], &[0, 1, 2, 3, 4]);
        v.insert_index(5, 5);
        assert_eq!(&v[..], &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn erase_shifts_tail_left() {
        let mut v = Vector::from(&[1, 2, 3, 4][..]);
        assert_eq!(v.erase_index(1), 2);
        assert_eq!(&v[..], &[1, 3, 4]);
        assert_eq!(v.erase_index(2), 4);
        assert_eq!(&v[..], &[1, 3]);
    }

    #[test]
    #[should_panic(expected = "erase index out of range")]
    fn erase_past_end_panics() {
        let mut v = Vector::from(&[1][..]);
        v.erase_index(1);
    }

    #[test]
    fn resize_grows_with_defaults_and_shrinks() {
        let mut v: Vector<u32> = Vector::new();
        v.resize(4);
        assert_eq!(&v[..], &[0, 0, 0, 0]);
        v[2] = 9;
        v.resize(2);
        assert_eq!(&v[..], &[0, 0]);
    }

    #[test]
    fn resize_with_value_clones_the_fill() {
        let mut v: Vector<String> = Vector::new();
        v.resize_with_value(3, &"x".to_string());
        assert_eq!(&v[..], &["x", "x", "x"]);
        v.resize_with_value(1, &"y".to_string());
        assert_eq!(&v[..], &["x"]);
    }

    #[test]
    fn front_and_back_track_the_ends() {
        let mut v = Vector::new();
        assert_eq!(v.front(), None);
        assert_eq!(v.back(), None);
        v.push(1);
        v.push(2);
        assert_eq!(v.front(), Some(&1));
        assert_eq!(v.back(), Some(&2));
    }

    #[test]
    fn find_and_contains_scan_linearly() {
        let v = Vector::from(&[10, 20, 30][..]);
        assert_eq!(v.find_index(&20), Some(1));
        assert_eq!(v.find(&30), Some(&30));
        assert!(v.contains(&10));
        assert!(!v.contains(&40));
        assert_eq!(v.find_index(&99), None);
    }

    #[test]
    fn clear_free_releases_the_buffer() {
        let mut v = Vector::from(&[1, 2, 3][..]);
        v.clear_free();
        assert_eq!(v.len(), 0);
        assert_eq!(v.capacity(), 0);
        v.push(7);
        assert_eq!(&v[..], &[7]);
    }

    #[test]
    fn shrink_to_fit_reallocates_to_len() {
        let mut v = Vector::with_capacity(16);
        v.push(1);
        v.push(2);
        v.shrink_to_fit();
        assert_eq!(v.capacity(), 2);
        assert_eq!(&v[..], &[1, 2]);
    }

    #[test]
    fn elements_are_dropped_exactly_once() {
        struct Probe(Arc<AtomicUsize>);
        impl Drop for Probe {
            fn drop(&mut self) {
                self.0.fetch_add(1, Ordering::Relaxed);
            }
        }

        let drops = Arc::new(AtomicUsize::new(0));
        let mut v = Vector::new();
        for _ in 0..4 {
            v.push(Probe(Arc::clone(&drops)));
        }
        drop(v.erase_index(1));
        assert_eq!(drops.load(Ordering::Relaxed), 1);
        drop(v);
        assert_eq!(drops.load(Ordering::Relaxed), 4);
    }

    #[test]
    fn zero_sized_elements_never_allocate() {
        let mut v = Vector::new();
        for _ in 0..100 {
            v.push(());
        }
        assert_eq!(v.len(), 100);
        assert_eq!(v.capacity(), usize::MAX);
        assert_eq!(v.pop(), Some(()));
        assert_eq!(v.len(), 99);
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        #[derive(Clone, Debug)]
        enum Op {
            Push(i32),
            Pop,
            Insert(usize, i32),
            Erase(usize),
        }

        fn op_strategy() -> impl Strategy<Value = Op> {
            prop_oneof![
                any::<i32>().prop_map(Op::Push),
                Just(Op::Pop),
                (0usize..32, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
                (0usize..32).prop_map(Op::Erase),
            ]
        }

        proptest! {
            #[test]
            fn matches_std_vec_model(ops in proptest::collection::vec(op_strategy(), 1..64)) {
                let mut v = Vector::new();
                let mut model: Vec<i32> = Vec::new();
                for op in ops {
                    match op {
                        Op::Push(x) => {
                            v.push(x);
                            model.push(x);
                        }
                        Op::Pop => {
                            prop_assert_eq!(v.pop(), model.pop());
                        }
                        Op::Insert(i, x) => {
                            let i = i % (model.len() + 1);
                            v.insert_index(i, x);
                            model.insert(i, x);
                        }
                        Op::Erase(i) => {
                            if !model.is_empty() {
                                let i = i % model.len();
                                prop_assert_eq!(v.erase_index(i), model.remove(i));
                            }
                        }
                    }
                    prop_assert_eq!(v.len(), model.len());
                }
                prop_assert_eq!(&v[..], &model[..]);
            }
        }
    }
}
