//! FIFO queue over an [`ArenaList`].

use crate::arena_list::ArenaList;

/// First-in first-out queue.
///
/// A thin adapter over [`ArenaList`]: push appends at the tail, pop
/// removes from the head, and slot reuse comes from the list's free
/// stack. [`reserve`](Queue::reserve) ahead of bursts to avoid the
/// list's linear-scan fallback.
pub struct Queue<T> {
    list: ArenaList<T>,
}

impl<T> Queue<T> {
    /// Create an empty queue without allocating.
    pub fn new() -> Self {
        Self {
            list: ArenaList::new(),
        }
    }

    /// Number of queued elements.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Grow the backing arena to `n` slots.
    pub fn reserve(&mut self, n: usize) {
        self.list.reserve(n);
    }

    /// Enqueue at the back.
    pub fn push(&mut self, value: T) {
        self.list.push_back(value);
    }

    /// Dequeue from the front.
    pub fn pop(&mut self) -> Option<T> {
        self.list.pop_front()
    }

    /// The element that [`pop`](Queue::pop) would return next.
    pub fn front(&self) -> Option<&T> {
        self.list.front()
    }

    /// The most recently pushed element.
    pub fn back(&self) -> Option<&T> {
        self.list.back()
    }

    /// Drop every element, retaining capacity.
    pub fn clear(&mut self) {
        self.list.clear();
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pops_in_push_order() {
        let mut q = Queue::new();
        q.push(1);
        q.push(2);
        q.push(3);
        assert_eq!(q.front(), Some(&1));
        assert_eq!(q.back(), Some(&3));
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        q.push(4);
        assert_eq!(q.pop(), Some(3));
        assert_eq!(q.pop(), Some(4));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn interleaved_push_pop_reuses_slots() {
        let mut q = Queue::new();
        q.reserve(4);
        for round in 0..16 {
            q.push(round);
            assert_eq!(q.pop(), Some(round));
        }
        assert!(q.is_empty());
        assert!(q.len() == 0);
    }
}
