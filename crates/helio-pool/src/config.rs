//! Context creation configuration.

use smallvec::SmallVec;

use helio_core::{BindingInfo, MemoryMode, StructKind};

/// Per-kind slot-count overrides, inline up to one per kind.
pub type BindingOverrides = SmallVec<[BindingInfo; StructKind::COUNT]>;

/// Allocation configuration consumed at context creation.
///
/// `base_bindings` resizes the base pool; `block_bindings` resizes the
/// per-chain-link growth blocks created when a kind's chain is
/// exhausted. Kinds without an override keep their default counts.
/// Both tables are ignored in [`MemoryMode::Individual`].
#[derive(Clone, Debug)]
pub struct MemoryInfo {
    /// Storage mode for `create_object`/`destroy_object`.
    pub mode: MemoryMode,
    /// Overrides applied to the base pool sizing.
    pub base_bindings: BindingOverrides,
    /// Overrides applied to the chained-block sizing.
    pub block_bindings: BindingOverrides,
}

impl Default for MemoryInfo {
    fn default() -> Self {
        Self {
            mode: Self::DEFAULT_MODE,
            base_bindings: BindingOverrides::new(),
            block_bindings: BindingOverrides::new(),
        }
    }
}

impl MemoryInfo {
    /// Mode a default-constructed configuration starts in.
    pub const DEFAULT_MODE: MemoryMode = MemoryMode::Individual;

    /// Pooled-mode configuration with default counts.
    pub fn pooled() -> Self {
        Self {
            mode: MemoryMode::Pooled,
            ..Self::default()
        }
    }

    /// Override the base pool slot count for `kind`.
    pub fn with_base_binding(mut self, kind: StructKind, count: usize) -> Self {
        self.base_bindings.push(BindingInfo { kind, count });
        self
    }

    /// Override the chained-block slot count for `kind`.
    pub fn with_block_binding(mut self, kind: StructKind, count: usize) -> Self {
        self.block_bindings.push(BindingInfo { kind, count });
        self
    }
}

/// Everything a [`Context`](crate::Context) needs to construct.
#[derive(Clone, Debug, Default)]
pub struct ContextCreateInfo {
    /// Application name, carried into diagnostics.
    pub app_name: String,
    /// Allocation configuration.
    pub memory: MemoryInfo,
}

impl ContextCreateInfo {
    /// Configuration named `app_name`, individual mode, default
    /// counts.
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_owned(),
            memory: MemoryInfo::default(),
        }
    }
}
