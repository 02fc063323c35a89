//! Doubly linked list whose nodes live in one contiguous array.
//!
//! [`ArenaList`] addresses nodes by index into a single backing
//! [`Vector`] rather than by pointer, with a parallel free-index stack
//! for O(1) slot reuse. The trade-off versus `Vector` is O(i) traversal
//! to a position in exchange for O(1) relinking; the trade-off versus a
//! pointer-based list is cache locality and trivially stable indices.
//!
//! One cost is deliberate: [`ArenaList::reserve`] grows the node array
//! without registering the new slots on the free stack, so an insertion
//! that finds the stack empty falls back to a linear scan for a vacant
//! node, O(n) worst case. Callers doing bulk insertion should expect
//! the scan cost once per slot reserved ahead.

use crate::vector::Vector;

struct Node<T> {
    value: Option<T>,
    next: Option<usize>,
    prev: Option<usize>,
}

impl<T> Node<T> {
    fn vacant() -> Self {
        Self {
            value: None,
            next: None,
            prev: None,
        }
    }
}

impl<T> Default for Node<T> {
    fn default() -> Self {
        Self::vacant()
    }
}

/// Index-arena doubly linked list.
///
/// The taken nodes form exactly one chain from head to tail of length
/// `len()`; every vacant node reachable through the free stack appears
/// there exactly once.
pub struct ArenaList<T> {
    nodes: Vector<Node<T>>,
    free: Vector<usize>,
    head: usize,
    tail: usize,
    len: usize,
}

impl<T> ArenaList<T> {
    /// Create an empty list without allocating.
    pub fn new() -> Self {
        Self {
            nodes: Vector::new(),
            free: Vector::new(),
            head: 0,
            tail: 0,
            len: 0,
        }
    }

    /// Number of elements in the chain.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the chain is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node slots, taken and vacant.
    pub fn capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Number of vacant slots registered on the free stack.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Number of taken nodes. Always equals [`len`](Self::len); exposed
    /// for invariant checks.
    pub fn taken_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.value.is_some()).count()
    }

    /// Grow the node array to `n` slots, preserving all links and free
    /// entries.
    ///
    /// The new slots are vacant but are not pushed on the free stack;
    /// they are found by the linear-scan fallback on insertion.
    pub fn reserve(&mut self, n: usize) {
        if n <= self.nodes.len() {
            return;
        }
        self.free.reserve(n);
        self.nodes.resize(n);
    }

    fn alloc_slot(&mut self) -> usize {
        if let Some(idx) = self.free.pop() {
            debug_assert!(self.nodes[idx].value.is_none());
            return idx;
        }
        // Free stack empty: scan for a vacant slot left by reserve()
        // before growing the array. O(n) worst case.
        if let Some(idx) = self.nodes.iter().position(|n| n.value.is_none()) {
            return idx;
        }
        self.nodes.push(Node::vacant());
        self.nodes.len() - 1
    }

    /// Append an element at the tail.
    pub fn push_back(&mut self, value: T) {
        let idx = self.alloc_slot();
        let prev = (self.len > 0).then_some(self.tail);
        self.nodes[idx] = Node {
            value: Some(value),
            next: None,
            prev,
        };
        match prev {
            Some(t) => self.nodes[t].next = Some(idx),
            None => self.head = idx,
        }
        self.tail = idx;
        self.len += 1;
    }

    /// Prepend an element at the head.
    pub fn push_front(&mut self, value: T) {
        let idx = self.alloc_slot();
        let next = (self.len > 0).then_some(self.head);
        self.nodes[idx] = Node {
            value: Some(value),
            next,
            prev: None,
        };
        match next {
            Some(h) => self.nodes[h].prev = Some(idx),
            None => self.tail = idx,
        }
        self.head = idx;
        self.len += 1;
    }

    /// Remove and return the tail element.
    pub fn pop_back(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.vacate(self.tail))
    }

    /// Remove and return the head element.
    pub fn pop_front(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        Some(self.vacate(self.head))
    }

    /// The head element.
    pub fn front(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.nodes[self.head].value.as_ref()
    }

    /// The tail element.
    pub fn back(&self) -> Option<&T> {
        if self.len == 0 {
            return None;
        }
        self.nodes[self.tail].value.as_ref()
    }

    /// Slot index of the node at logical position `index`, by O(i)
    /// traversal from the head.
    ///
    /// Panics if `index >= len`.
    pub fn node_index(&self, index: usize) -> usize {
        assert!(index < self.len, "list index out of range");
        let mut idx = self.head;
        for _ in 0..index {
            idx = self.nodes[idx].next.expect("chain shorter than len");
        }
        idx
    }

    /// Element at logical position `index`, by O(i) traversal.
    ///
    /// Panics if `index >= len`.
    pub fn at_index(&self, index: usize) -> &T {
        let idx = self.node_index(index);
        self.nodes[idx].value.as_ref().expect("indexed node is taken")
    }

    /// Mutable element at logical position `index`, by O(i) traversal.
    ///
    /// Panics if `index >= len`.
    pub fn at_index_mut(&mut self, index: usize) -> &mut T {
        let idx = self.node_index(index);
        self.nodes[idx].value.as_mut().expect("indexed node is taken")
    }

    /// Insert `value` so it becomes the element at logical position
    /// `index`, relinking neighbors in O(1) after the O(i) traversal.
    ///
    /// Panics if `index > len`.
    pub fn insert_index(&mut self, index: usize, value: T) {
        assert!(index <= self.len, "insert index out of range");
        if index == 0 {
            self.push_front(value);
            return;
        }
        if index == self.len {
            self.push_back(value);
            return;
        }
        let at = self.node_index(index);
        let before = self.nodes[at].prev.expect("interior node has a predecessor");
        let idx = self.alloc_slot();
        self.nodes[idx] = Node {
            value: Some(value),
            next: Some(at),
            prev: Some(before),
        };
        self.nodes[before].next = Some(idx);
        self.nodes[at].prev = Some(idx);
        self.len += 1;
    }

    /// Remove and return the element at logical position `index`.
    ///
    /// Panics if `index >= len`.
    pub fn erase_index(&mut self, index: usize) -> T {
        assert!(index < self.len, "erase index out of range");
        let idx = self.node_index(index);
        self.vacate(idx)
    }

    /// Vacate every node and register every slot on the free stack.
    /// Capacity is retained.
    pub fn clear(&mut self) {
        for node in self.nodes.iter_mut() {
            *node = Node::vacant();
        }
        self.free.clear();
        for idx in (0..self.nodes.len()).rev() {
            self.free.push(idx);
        }
        self.head = 0;
        self.tail = 0;
        self.len = 0;
    }

    /// Iterate head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: (self.len > 0).then_some(self.head),
        }
    }

    /// Iterate tail to head.
    pub fn iter_rev(&self) -> IterRev<'_, T> {
        IterRev {
            list: self,
            next: (self.len > 0).then_some(self.tail),
        }
    }

    fn vacate(&mut self, idx: usize) -> T {
        let prev = self.nodes[idx].prev;
        let next = self.nodes[idx].next;
        let value = self.nodes[idx]
            .value
            .take()
            .expect("vacated node is taken");
        self.nodes[idx].next = None;
        self.nodes[idx].prev = None;
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => {
                if let Some(n) = next {
                    self.head = n;
                }
            }
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => {
                if let Some(p) = prev {
                    self.tail = p;
                }
            }
        }
        self.free.push(idx);
        self.len -= 1;
        if self.len == 0 {
            self.head = 0;
            self.tail = 0;
        }
        value
    }
}

impl<T> Default for ArenaList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Head-to-tail iterator over an [`ArenaList`].
pub struct Iter<'a, T> {
    list: &'a ArenaList<T>,
    next: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let idx = self.next?;
        let node = &self.list.nodes[idx];
        self.next = node.next;
        node.value.as_ref()
    }
}

/// Tail-to-head iterator over an [`ArenaList`].
pub struct IterRev<'a, T> {
    list: &'a ArenaList<T>,
    next: Option<usize>,
}

impl<'a, T> Iterator for IterRev<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let idx = self.next?;
        let node = &self.list.nodes[idx];
        self.next = node.prev;
        node.value.as_ref()
    }
}

impl<'a, T> IntoIterator for &'a ArenaList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
