//! Typed slot views over block segments.

use std::ptr::NonNull;

use helio_collections::Vector;

/// A typed view over a block segment, slicing it into fixed-size slots
/// for one structure kind.
///
/// Slots are handed out from a LIFO free list of reclaimed indices,
/// falling back to a linear cursor over never-used slots. A binding
/// never exceeds `count` live slots. When a binding chain grows, the
/// previous tail links to the new binding by index into the pool's
/// per-kind binding table (`next`), so links survive table growth.
#[derive(Debug)]
pub struct MemoryBinding {
    base: NonNull<u8>,
    element_size: usize,
    count: usize,
    cursor: usize,
    free_slots: Vector<usize>,
    next: Option<usize>,
}

impl MemoryBinding {
    /// Claim `count * element_size` bytes starting at `base`.
    ///
    /// `base` must stay valid for the binding's lifetime; the owning
    /// pool keeps the backing block alive.
    pub fn new(base: NonNull<u8>, element_size: usize, count: usize) -> Self {
        debug_assert!(element_size > 0, "zero-size binding element");
        debug_assert!(count > 0, "zero-count binding");
        Self {
            base,
            element_size,
            count,
            cursor: 0,
            free_slots: Vector::new(),
            next: None,
        }
    }

    /// Slot size in bytes.
    pub fn element_size(&self) -> usize {
        self.element_size
    }

    /// Maximum number of slots.
    pub fn slot_count(&self) -> usize {
        self.count
    }

    /// Number of slots currently handed out.
    pub fn live_slots(&self) -> usize {
        self.cursor - self.free_slots.len()
    }

    /// Index of the next binding in this kind's chain, if any.
    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// Link the chain's new tail after this binding. Called exactly
    /// once, when this binding was the tail and ran out of slots.
    pub fn set_next(&mut self, index: usize) {
        debug_assert!(self.next.is_none(), "binding already chained");
        self.next = Some(index);
    }

    /// Whether a slot can be handed out: the free list is non-empty or
    /// the linear cursor has not reached `count`.
    pub fn has_vacancy(&self) -> bool {
        !self.free_slots.is_empty() || self.cursor < self.count
    }

    fn slot_ptr(&self, slot: usize) -> NonNull<u8> {
        debug_assert!(slot < self.count);
        // SAFETY: slot < count, so the pointer stays inside the
        // claimed segment.
        unsafe { NonNull::new_unchecked(self.base.as_ptr().add(slot * self.element_size)) }
    }

    /// Hand out a slot: pop the free list, or advance the cursor.
    ///
    /// Precondition: the caller verified [`has_vacancy`](Self::has_vacancy).
    pub fn take_next(&mut self) -> NonNull<u8> {
        if let Some(slot) = self.free_slots.pop() {
            return self.slot_ptr(slot);
        }
        debug_assert!(self.cursor < self.count, "take_next on a full binding");
        let ptr = self.slot_ptr(self.cursor);
        self.cursor += 1;
        ptr
    }

    /// Return a slot to the free list by its address.
    ///
    /// Precondition: `ptr` was handed out by this exact binding.
    pub fn release(&mut self, ptr: NonNull<u8>) {
        debug_assert!(self.owns(ptr), "releasing a foreign pointer");
        let offset = ptr.as_ptr() as usize - self.base.as_ptr() as usize;
        debug_assert!(offset % self.element_size == 0, "pointer is not a slot base");
        let slot = offset / self.element_size;
        debug_assert!(slot < self.cursor, "releasing a never-taken slot");
        debug_assert!(!self.free_slots.contains(&slot), "double release");
        self.free_slots.push(slot);
    }

    /// Whether `ptr` falls inside this binding's segment.
    pub fn owns(&self, ptr: NonNull<u8>) -> bool {
        let addr = ptr.as_ptr() as usize;
        let base = self.base.as_ptr() as usize;
        addr >= base && addr < base + self.count * self.element_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::MemoryBlock;

    fn binding_over(block: &MemoryBlock, element_size: usize, count: usize) -> MemoryBinding {
        MemoryBinding::new(block.offset(0), element_size, count)
    }

    #[test]
    fn slots_advance_by_element_size() {
        let block = MemoryBlock::new(64);
        let mut binding = binding_over(&block, 16, 4);
        let a = binding.take_next().as_ptr() as usize;
        let b = binding.take_next().as_ptr() as usize;
        assert_eq!(b - a, 16);
        assert_eq!(binding.live_slots(), 2);
    }

    #[test]
    fn full_binding_has_no_vacancy() {
        let block = MemoryBlock::new(32);
        let mut binding = binding_over(&block, 16, 2);
        assert!(binding.has_vacancy());
        binding.take_next();
        binding.take_next();
        assert!(!binding.has_vacancy());
    }

    #[test]
    fn released_slot_is_reused_lifo() {
        let block = MemoryBlock::new(48);
        let mut binding = binding_over(&block, 16, 3);
        let a = binding.take_next();
        let b = binding.take_next();
        binding.release(a);
        binding.release(b);
        // LIFO: the most recently released slot comes back first.
        assert_eq!(binding.take_next(), b);
        assert_eq!(binding.take_next(), a);
    }

    #[test]
    fn ownership_is_bounded_by_the_segment() {
        let block = MemoryBlock::new(64);
        let binding = binding_over(&block, 16, 2);
        assert!(binding.owns(block.offset(0)));
        assert!(binding.owns(block.offset(31)));
        assert!(!binding.owns(block.offset(32)));
    }
}
