//! The context: owner of the pool and the object lifecycle API.
//!
//! A [`Context`] is an explicit owned object, not a process-wide
//! singleton: callers construct one with [`Context::new`], pass it to
//! whatever needs to create or destroy objects, and finish with
//! [`Context::shutdown`] to collect teardown diagnostics. Double
//! initialization is unrepresentable; dropping a context without
//! calling `shutdown` still runs (and logs) the leak report.

use std::mem::needs_drop;
use std::ptr::{self, NonNull};

use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::{error, trace, warn};

use helio_collections::mem;
use helio_core::{ConfigError, MemoryMode, PoolError, StructKind, TypeAllocInfo};

use crate::block::BLOCK_ALIGN;
use crate::config::ContextCreateInfo;
use crate::handle::ObjectHandle;
use crate::handles;
use crate::pool::MemoryPool;

/// One kind's non-zero live-object count at teardown.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LeakRecord {
    /// The leaking kind.
    pub kind: StructKind,
    /// Objects created but never destroyed.
    pub count: usize,
}

/// Teardown diagnostics returned by [`Context::shutdown`].
#[derive(Clone, Debug, Default)]
pub struct ShutdownReport {
    /// Kinds with live objects at teardown, in kind order.
    pub leaks: SmallVec<[LeakRecord; 4]>,
    /// Global outstanding allocation count after the context released
    /// its memory. Non-zero values are warnings, not errors: other
    /// live containers in the process also count.
    pub live_allocations: isize,
}

impl ShutdownReport {
    /// Whether teardown found no leaked objects.
    pub fn is_clean(&self) -> bool {
        self.leaks.is_empty()
    }
}

/// Owner of the memory pool and the per-kind live-object counters.
#[derive(Debug)]
pub struct Context {
    app_name: String,
    mode: MemoryMode,
    base_infos: [TypeAllocInfo; StructKind::COUNT],
    block_infos: [TypeAllocInfo; StructKind::COUNT],
    pool: Option<MemoryPool>,
    live_counts: [usize; StructKind::COUNT],
    reported: bool,
}

impl Context {
    /// Validate the configuration and build the context.
    ///
    /// In pooled mode this sizes and allocates the base block
    /// immediately. A zero-count binding override is a configuration
    /// error; the error is logged and returned, and nothing is
    /// allocated.
    pub fn new(info: &ContextCreateInfo) -> Result<Self, ConfigError> {
        let mut base_infos = handles::default_alloc_infos();
        // The growth table starts from the defaults, not from the
        // base overrides.
        let mut block_infos = base_infos;

        for over in &info.memory.base_bindings {
            if over.count == 0 {
                error!(kind = %over.kind, "base binding override with zero count");
                return Err(ConfigError::ZeroBindingCount { kind: over.kind });
            }
            base_infos[over.kind.as_index()].count = over.count;
        }
        for over in &info.memory.block_bindings {
            if over.count == 0 {
                error!(kind = %over.kind, "block binding override with zero count");
                return Err(ConfigError::ZeroBindingCount { kind: over.kind });
            }
            block_infos[over.kind.as_index()].count = over.count;
        }

        let pool = match info.memory.mode {
            MemoryMode::Individual => None,
            MemoryMode::Pooled => Some(MemoryPool::new(&base_infos)),
        };

        trace!(
            app = %info.app_name,
            mode = %info.memory.mode,
            base_bytes = pool.as_ref().map_or(0, MemoryPool::base_bytes),
            "context created"
        );

        Ok(Self {
            app_name: info.app_name.clone(),
            mode: info.memory.mode,
            base_infos,
            block_infos,
            pool,
            live_counts: [0; StructKind::COUNT],
            reported: false,
        })
    }

    /// Application name the context was created with.
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Storage mode the context was created with.
    pub fn mode(&self) -> MemoryMode {
        self.mode
    }

    /// Allocate and default-construct one object tagged `kind`.
    ///
    /// In pooled mode the object is placement-constructed into a slot
    /// of `kind`'s binding chain, growing the chain by one block when
    /// it is exhausted; in individual mode it is a plain heap
    /// allocation. Either way the kind's live-object counter is
    /// incremented, and the returned handle must eventually be passed
    /// to [`destroy_object`](Self::destroy_object) with the same
    /// `kind` tag.
    pub fn create_object<T: Default>(
        &mut self,
        kind: StructKind,
    ) -> Result<ObjectHandle<T>, PoolError> {
        let ki = kind.as_index();
        let ptr = match self.mode {
            MemoryMode::Individual => {
                let boxed = Box::<T>::default();
                NonNull::from(Box::leak(boxed))
            }
            MemoryMode::Pooled => {
                let info = self.base_infos[ki];
                if std::mem::size_of::<T>() != info.size {
                    return Err(PoolError::SlotMismatch {
                        kind,
                        expected: info.size,
                        actual: std::mem::size_of::<T>(),
                    });
                }
                debug_assert!(std::mem::align_of::<T>() <= BLOCK_ALIGN);

                let pool = self.pool.as_mut().expect("pooled mode owns a pool");
                let binding_idx = match pool.find_empty(kind) {
                    Some(idx) => idx,
                    None => {
                        let grow = self.block_infos[ki];
                        trace!(kind = %kind, count = grow.count, "binding chain exhausted, growing");
                        pool.grow(kind, grow);
                        pool.find_empty(kind).expect("grown chain has vacancy")
                    }
                };
                let slot = pool.take(kind, binding_idx).cast::<T>();
                // SAFETY: the slot spans size_of::<T>() bytes, is
                // aligned (segments start on BLOCK_ALIGN and slot
                // size is a multiple of T's alignment), and is not
                // aliased until destroy_object releases it.
                unsafe { slot.as_ptr().write(T::default()) };
                slot
            }
        };
        self.live_counts[ki] += 1;
        Ok(ObjectHandle::new(ptr))
    }

    /// Destroy an object created by [`create_object`](Self::create_object)
    /// with the same `kind` tag.
    ///
    /// Runs the destructor (skipped when `T` needs no drop), returns
    /// the slot to its binding's free list (pooled) or frees the heap
    /// block (individual), and decrements the kind's counter. A
    /// pointer no binding of `kind` owns is rejected without touching
    /// the object; the handle is lost and the object stays live in the
    /// leak counters.
    pub fn destroy_object<T>(
        &mut self,
        handle: ObjectHandle<T>,
        kind: StructKind,
    ) -> Result<(), PoolError> {
        let ptr = handle.into_raw();
        match self.mode {
            MemoryMode::Individual => {
                // SAFETY: the pointer came from Box::leak in
                // create_object and is released exactly once.
                unsafe { drop(Box::from_raw(ptr.as_ptr())) };
            }
            MemoryMode::Pooled => {
                let pool = self.pool.as_mut().expect("pooled mode owns a pool");
                if let Err(err) = pool.release(kind, ptr.cast()) {
                    error!(kind = %kind, %err, "destroy_object rejected");
                    return Err(err);
                }
                if needs_drop::<T>() {
                    // SAFETY: the slot holds a live T constructed by
                    // create_object; nothing reuses it before the next
                    // create call.
                    unsafe { ptr::drop_in_place(ptr.as_ptr()) };
                }
            }
        }
        let ki = kind.as_index();
        debug_assert!(self.live_counts[ki] > 0, "destroy without matching create");
        self.live_counts[ki] = self.live_counts[ki].saturating_sub(1);
        Ok(())
    }

    /// Live-object count for one kind.
    pub fn live_count(&self, kind: StructKind) -> usize {
        self.live_counts[kind.as_index()]
    }

    /// Snapshot of every kind's live-object count, in kind order.
    pub fn object_counts(&self) -> IndexMap<StructKind, usize> {
        let mut counts = IndexMap::with_capacity(StructKind::COUNT);
        for kind in StructKind::ALL {
            counts.insert(kind, self.live_counts[kind.as_index()]);
        }
        counts
    }

    /// Number of bindings in `kind`'s chain. Zero in individual mode.
    pub fn binding_count(&self, kind: StructKind) -> usize {
        self.pool.as_ref().map_or(0, |p| p.binding_count(kind))
    }

    /// Number of chained blocks created for `kind` beyond the base
    /// block. Zero in individual mode.
    pub fn chained_block_count(&self, kind: StructKind) -> usize {
        self.pool
            .as_ref()
            .map_or(0, |p| p.chained_block_count(kind))
    }

    /// Number of bindings reachable by walking `next` from `kind`'s
    /// base binding. Zero in individual mode.
    pub fn chain_len(&self, kind: StructKind) -> usize {
        self.pool.as_ref().map_or(0, |p| p.chain_len(kind))
    }

    fn collect_leaks(&self) -> SmallVec<[LeakRecord; 4]> {
        let mut leaks = SmallVec::new();
        for kind in StructKind::ALL {
            let count = self.live_counts[kind.as_index()];
            if count > 0 {
                error!(
                    app = %self.app_name,
                    kind = %kind,
                    count,
                    "objects not destroyed before teardown"
                );
                leaks.push(LeakRecord { kind, count });
            }
        }
        leaks
    }

    /// Tear the context down and report leaks.
    ///
    /// Every kind with a non-zero live-object counter is logged and
    /// recorded; teardown completes regardless. Leaked pooled objects
    /// do not run their destructors: the blocks are released as raw
    /// bytes. After the pool is released the global allocation counter
    /// is sampled and a non-zero value logged as a warning.
    pub fn shutdown(mut self) -> ShutdownReport {
        let leaks = self.collect_leaks();
        self.reported = true;
        drop(self);

        let live_allocations = mem::live_allocations();
        if live_allocations != 0 {
            warn!(live_allocations, "allocations outstanding after context teardown");
        }
        ShutdownReport {
            leaks,
            live_allocations,
        }
    }
}

impl Drop for Context {
    fn drop(&mut self) {
        if !self.reported {
            let _ = self.collect_leaks();
        }
    }
}
