//! Structure-kind tags and the allocation mode selector.

use std::fmt;

/// Tag identifying which kind of engine handle an allocation request
/// is for.
///
/// Every creatable handle type is tagged with exactly one kind, and the
/// kind selects the binding chain that serves the allocation in pooled
/// mode. The discriminants are stable and index the pool's per-kind
/// tables via [`StructKind::as_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum StructKind {
    /// OS window and its surface.
    Window = 0,
    /// Named logging channel.
    Logger = 1,
    /// Offscreen render target.
    FrameBuffer = 2,
    /// Compiled shader program.
    Shader = 3,
    /// Descriptor set layout.
    DescriptorLayout = 4,
    /// Graphics pipeline state object.
    Pipeline = 5,
    /// Vertex/index/uniform buffer.
    Buffer = 6,
    /// Texture sampler state.
    Sampler = 7,
    /// 2D texture image.
    Texture = 8,
    /// Six-faced cubemap image.
    Cubemap = 9,
    /// Loaded audio source.
    Sound = 10,
    /// Network socket.
    Socket = 11,
}

impl StructKind {
    /// Number of structure kinds.
    pub const COUNT: usize = 12;

    /// All kinds, in discriminant order.
    pub const ALL: [StructKind; Self::COUNT] = [
        StructKind::Window,
        StructKind::Logger,
        StructKind::FrameBuffer,
        StructKind::Shader,
        StructKind::DescriptorLayout,
        StructKind::Pipeline,
        StructKind::Buffer,
        StructKind::Sampler,
        StructKind::Texture,
        StructKind::Cubemap,
        StructKind::Sound,
        StructKind::Socket,
    ];

    /// Index of this kind into per-kind tables (`0..COUNT`).
    pub fn as_index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for StructKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Window => "window",
            Self::Logger => "logger",
            Self::FrameBuffer => "framebuffer",
            Self::Shader => "shader",
            Self::DescriptorLayout => "descriptor_layout",
            Self::Pipeline => "pipeline",
            Self::Buffer => "buffer",
            Self::Sampler => "sampler",
            Self::Texture => "texture",
            Self::Cubemap => "cubemap",
            Self::Sound => "sound",
            Self::Socket => "socket",
        };
        write!(f, "{name}")
    }
}

/// How `create_object`/`destroy_object` obtain backing storage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemoryMode {
    /// Each object is a plain heap allocation, freed on destroy.
    #[default]
    Individual,
    /// Objects are placement-constructed into pooled slots served by
    /// per-kind binding chains.
    Pooled,
}

impl fmt::Display for MemoryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => write!(f, "individual"),
            Self::Pooled => write!(f, "pooled"),
        }
    }
}
