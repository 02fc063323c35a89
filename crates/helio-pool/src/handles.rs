//! The engine handle types served by the pool, and their default
//! per-kind pool sizing.
//!
//! Handle internals belong to the collaborating subsystems (windowing,
//! rendering, audio, networking); only the boundary fields live here.
//! What this module owns is the mapping from each handle type to its
//! [`StructKind`] tag and the default slot counts the base pool and
//! chained blocks are sized with.

use std::mem::size_of;

use helio_core::{StructKind, TypeAllocInfo};

/// OS window and its surface.
#[derive(Clone, Debug, Default)]
pub struct Window {
    /// Framebuffer width in pixels.
    pub width: i32,
    /// Framebuffer height in pixels.
    pub height: i32,
    /// Title shown by the window manager.
    pub title: String,
    /// Whether presentation waits for vertical sync.
    pub vsync: bool,
}

/// Named logging channel.
#[derive(Clone, Debug, Default)]
pub struct Logger {
    /// Channel name.
    pub name: String,
    /// Minimum severity emitted, 0 = everything.
    pub level: u32,
}

/// Offscreen render target.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameBuffer {
    /// Attachment width in pixels.
    pub width: u32,
    /// Attachment height in pixels.
    pub height: u32,
    /// Number of color attachments.
    pub color_attachments: u32,
    /// Whether a depth attachment is present.
    pub has_depth: bool,
}

/// Compiled shader program.
#[derive(Clone, Debug, Default)]
pub struct Shader {
    /// Vertex stage source.
    pub vertex_src: String,
    /// Fragment stage source.
    pub fragment_src: String,
}

/// Descriptor set layout.
#[derive(Clone, Copy, Debug, Default)]
pub struct DescriptorLayout {
    /// Number of resource bindings in the set.
    pub binding_count: u32,
    /// Set index the layout occupies.
    pub set_index: u32,
}

/// Graphics pipeline state object.
#[derive(Clone, Copy, Debug, Default)]
pub struct Pipeline {
    /// Shader program backing the pipeline.
    pub shader_id: u64,
    /// Primitive topology selector.
    pub topology: u32,
    /// Whether depth testing is enabled.
    pub depth_test: bool,
}

/// Vertex/index/uniform buffer.
#[derive(Clone, Copy, Debug, Default)]
pub struct Buffer {
    /// Buffer size in bytes.
    pub byte_size: u64,
    /// Usage bits (vertex, index, uniform, ...).
    pub usage: u32,
    /// Per-element stride in bytes, 0 if unstructured.
    pub stride: u32,
}

/// Texture sampler state.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sampler {
    /// Minification filter selector.
    pub min_filter: u32,
    /// Magnification filter selector.
    pub mag_filter: u32,
    /// Wrap mode selector applied to every axis.
    pub wrap_mode: u32,
}

/// 2D texture image.
#[derive(Clone, Copy, Debug, Default)]
pub struct Texture {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Channels per pixel.
    pub channels: u32,
    /// Number of mip levels.
    pub mip_levels: u32,
}

/// Six-faced cubemap image.
#[derive(Clone, Copy, Debug, Default)]
pub struct Cubemap {
    /// Edge length of each face in pixels.
    pub face_size: u32,
    /// Channels per pixel.
    pub channels: u32,
}

/// Loaded audio source.
#[derive(Clone, Debug, Default)]
pub struct Sound {
    /// Path the source was loaded from.
    pub source_path: String,
    /// Playback volume, 1.0 = unattenuated.
    pub volume: f32,
    /// Playback pitch multiplier.
    pub pitch: f32,
}

/// Network socket.
#[derive(Clone, Debug, Default)]
pub struct Socket {
    /// Remote or bind address.
    pub address: String,
    /// Port number.
    pub port: u16,
}

/// Default pool sizing, indexed by [`StructKind::as_index`].
///
/// Slot sizes come from the handle types themselves; the counts are
/// the defaults both the base pool and chained blocks start from, per
/// kind, before any [`BindingInfo`](helio_core::BindingInfo) override.
pub fn default_alloc_infos() -> [TypeAllocInfo; StructKind::COUNT] {
    fn info(kind: StructKind, size: usize, count: usize) -> TypeAllocInfo {
        TypeAllocInfo { kind, size, count }
    }
    [
        info(StructKind::Window, size_of::<Window>(), 8),
        info(StructKind::Logger, size_of::<Logger>(), 8),
        info(StructKind::FrameBuffer, size_of::<FrameBuffer>(), 16),
        info(StructKind::Shader, size_of::<Shader>(), 32),
        info(
            StructKind::DescriptorLayout,
            size_of::<DescriptorLayout>(),
            64,
        ),
        info(StructKind::Pipeline, size_of::<Pipeline>(), 64),
        info(StructKind::Buffer, size_of::<Buffer>(), 256),
        info(StructKind::Sampler, size_of::<Sampler>(), 256),
        info(StructKind::Texture, size_of::<Texture>(), 256),
        info(StructKind::Cubemap, size_of::<Cubemap>(), 256),
        info(StructKind::Sound, size_of::<Sound>(), 32),
        info(StructKind::Socket, size_of::<Socket>(), 32),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BLOCK_ALIGN;

    #[test]
    fn table_covers_every_kind_in_order() {
        let infos = default_alloc_infos();
        assert_eq!(infos.len(), StructKind::COUNT);
        for (i, info) in infos.iter().enumerate() {
            assert_eq!(info.kind.as_index(), i);
            assert!(info.size > 0);
            assert!(info.count > 0);
        }
    }

    #[test]
    fn every_handle_alignment_fits_the_block_bound() {
        use std::mem::align_of;
        // Slot addresses are only guaranteed BLOCK_ALIGN-aligned, so no
        // handle type may require more.
        assert!(align_of::<Window>() <= BLOCK_ALIGN);
        assert!(align_of::<Logger>() <= BLOCK_ALIGN);
        assert!(align_of::<FrameBuffer>() <= BLOCK_ALIGN);
        assert!(align_of::<Shader>() <= BLOCK_ALIGN);
        assert!(align_of::<DescriptorLayout>() <= BLOCK_ALIGN);
        assert!(align_of::<Pipeline>() <= BLOCK_ALIGN);
        assert!(align_of::<Buffer>() <= BLOCK_ALIGN);
        assert!(align_of::<Sampler>() <= BLOCK_ALIGN);
        assert!(align_of::<Texture>() <= BLOCK_ALIGN);
        assert!(align_of::<Cubemap>() <= BLOCK_ALIGN);
        assert!(align_of::<Sound>() <= BLOCK_ALIGN);
        assert!(align_of::<Socket>() <= BLOCK_ALIGN);
    }
}
