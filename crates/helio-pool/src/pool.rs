//! The per-context memory pool: one base block holding the first
//! binding of every structure kind, plus per-kind chains of blocks
//! created on demand.

use std::ptr::NonNull;

use helio_collections::Vector;
use helio_core::{PoolError, StructKind, TypeAllocInfo};

use crate::binding::MemoryBinding;
use crate::block::{MemoryBlock, BLOCK_ALIGN};

fn align_up(value: usize) -> usize {
    (value + BLOCK_ALIGN - 1) & !(BLOCK_ALIGN - 1)
}

/// Typed slab pool serving every structure kind.
///
/// Kind `k`'s bindings always form a singly linked chain reachable
/// from index 0 of its binding table; every block beyond the base
/// block is owned by the per-kind block list.
#[derive(Debug)]
pub struct MemoryPool {
    base_block: MemoryBlock,
    blocks: Vector<Vector<MemoryBlock>>,
    bindings: Vector<Vector<MemoryBinding>>,
}

impl MemoryPool {
    /// Build the base block and one binding per kind.
    ///
    /// `base_infos` is indexed by [`StructKind::as_index`] and must
    /// cover every kind with non-zero sizes and counts (validated by
    /// the context before construction). Each kind's segment starts at
    /// a [`BLOCK_ALIGN`]-aligned offset of the single base block.
    pub fn new(base_infos: &[TypeAllocInfo]) -> Self {
        debug_assert_eq!(base_infos.len(), StructKind::COUNT);

        let mut offsets = [0usize; StructKind::COUNT];
        let mut cursor = 0usize;
        for (i, info) in base_infos.iter().enumerate() {
            debug_assert!(info.size > 0 && info.count > 0);
            cursor = align_up(cursor);
            offsets[i] = cursor;
            cursor += info.segment_bytes();
        }

        let base_block = MemoryBlock::new(cursor);
        let mut bindings: Vector<Vector<MemoryBinding>> = Vector::with_capacity(StructKind::COUNT);
        let mut blocks: Vector<Vector<MemoryBlock>> = Vector::with_capacity(StructKind::COUNT);
        for (i, info) in base_infos.iter().enumerate() {
            let mut chain = Vector::with_capacity(1);
            chain.push(MemoryBinding::new(
                base_block.offset(offsets[i]),
                info.size,
                info.count,
            ));
            bindings.push(chain);
            blocks.push(Vector::new());
        }

        Self {
            base_block,
            blocks,
            bindings,
        }
    }

    /// Total bytes of the base block.
    pub fn base_bytes(&self) -> usize {
        self.base_block.size()
    }

    /// First binding in `kind`'s chain with a free slot, walking the
    /// chain via `next` links.
    pub fn find_empty(&self, kind: StructKind) -> Option<usize> {
        let chain = &self.bindings[kind.as_index()];
        let mut idx = 0;
        loop {
            let binding = &chain[idx];
            if binding.has_vacancy() {
                return Some(idx);
            }
            idx = binding.next()?;
        }
    }

    /// Append a chained block/binding pair sized by `info` and link it
    /// after the previous chain tail.
    pub fn grow(&mut self, kind: StructKind, info: TypeAllocInfo) {
        debug_assert!(info.size > 0 && info.count > 0);
        let ki = kind.as_index();
        let block = MemoryBlock::new(info.segment_bytes());
        let binding = MemoryBinding::new(block.offset(0), info.size, info.count);
        self.blocks[ki].push(block);

        let new_idx = self.bindings[ki].len();
        self.bindings[ki].push(binding);
        // The previous tail is the previously appended binding; chain
        // order matches table order.
        self.bindings[ki][new_idx - 1].set_next(new_idx);
    }

    /// Hand out a slot from binding `binding_idx` of `kind`'s chain.
    ///
    /// Precondition: `binding_idx` came from [`find_empty`](Self::find_empty).
    pub fn take(&mut self, kind: StructKind, binding_idx: usize) -> NonNull<u8> {
        self.bindings[kind.as_index()][binding_idx].take_next()
    }

    /// Return a slot to the binding that owns `ptr`.
    pub fn release(&mut self, kind: StructKind, ptr: NonNull<u8>) -> Result<(), PoolError> {
        for binding in self.bindings[kind.as_index()].iter_mut() {
            if binding.owns(ptr) {
                binding.release(ptr);
                return Ok(());
            }
        }
        Err(PoolError::ForeignPointer { kind })
    }

    /// Number of bindings in `kind`'s table.
    pub fn binding_count(&self, kind: StructKind) -> usize {
        self.bindings[kind.as_index()].len()
    }

    /// Number of chained blocks created for `kind` beyond the base
    /// block.
    pub fn chained_block_count(&self, kind: StructKind) -> usize {
        self.blocks[kind.as_index()].len()
    }

    /// Number of bindings reachable by walking `next` from the base
    /// binding. Equals [`binding_count`](Self::binding_count) while
    /// the chain invariant holds.
    pub fn chain_len(&self, kind: StructKind) -> usize {
        let chain = &self.bindings[kind.as_index()];
        let mut len = 1;
        let mut idx = 0;
        while let Some(nx) = chain[idx].next() {
            len += 1;
            idx = nx;
        }
        len
    }

    /// Number of slots currently handed out across `kind`'s chain.
    pub fn live_slots(&self, kind: StructKind) -> usize {
        self.bindings[kind.as_index()]
            .iter()
            .map(MemoryBinding::live_slots)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_infos() -> [TypeAllocInfo; StructKind::COUNT] {
        let mut infos = [TypeAllocInfo {
            kind: StructKind::Window,
            size: 16,
            count: 2,
        }; StructKind::COUNT];
        for (i, kind) in StructKind::ALL.iter().enumerate() {
            infos[i].kind = *kind;
        }
        infos
    }

    #[test]
    fn base_block_holds_every_kind_segment() {
        let pool = MemoryPool::new(&tiny_infos());
        assert_eq!(pool.base_bytes(), 16 * 2 * StructKind::COUNT);
        for kind in StructKind::ALL {
            assert_eq!(pool.binding_count(kind), 1);
            assert_eq!(pool.chained_block_count(kind), 0);
            assert_eq!(pool.live_slots(kind), 0);
        }
    }

    #[test]
    fn kind_segments_do_not_overlap() {
        let mut pool = MemoryPool::new(&tiny_infos());
        let a = pool.take(StructKind::Window, 0).as_ptr() as usize;
        let b = pool.take(StructKind::Logger, 0).as_ptr() as usize;
        assert!(b >= a + 32, "logger segment starts after the window segment");
    }

    #[test]
    fn grow_links_onto_the_chain_tail() {
        let mut pool = MemoryPool::new(&tiny_infos());
        let kind = StructKind::Buffer;
        pool.take(kind, 0);
        pool.take(kind, 0);
        assert_eq!(pool.find_empty(kind), None);

        let info = TypeAllocInfo {
            kind,
            size: 16,
            count: 2,
        };
        pool.grow(kind, info);
        assert_eq!(pool.binding_count(kind), 2);
        assert_eq!(pool.chained_block_count(kind), 1);
        assert_eq!(pool.chain_len(kind), 2);
        assert_eq!(pool.find_empty(kind), Some(1));

        pool.grow(kind, info);
        assert_eq!(pool.chain_len(kind), 3);
    }

    #[test]
    fn release_routes_to_the_owning_binding() {
        let mut pool = MemoryPool::new(&tiny_infos());
        let kind = StructKind::Texture;
        let first = pool.take(kind, 0);
        pool.take(kind, 0);
        pool.grow(
            kind,
            TypeAllocInfo {
                kind,
                size: 16,
                count: 2,
            },
        );
        let chained = pool.take(kind, 1);

        pool.release(kind, chained).unwrap();
        pool.release(kind, first).unwrap();
        // The base binding regains vacancy and is found before the
        // chained one.
        assert_eq!(pool.find_empty(kind), Some(0));
        assert_eq!(pool.live_slots(kind), 1);
    }

    #[test]
    fn foreign_pointer_is_rejected() {
        let mut pool = MemoryPool::new(&tiny_infos());
        let ptr = pool.take(StructKind::Sound, 0);
        let err = pool.release(StructKind::Socket, ptr).unwrap_err();
        assert_eq!(
            err,
            PoolError::ForeignPointer {
                kind: StructKind::Socket
            }
        );
    }
}
