//! Backend abstraction traits for the rendering system
//!
//! A backend provides three things: a drawable target, turning decoded image
//! data into a texture handle, and blitting a rectangle of a texture onto the
//! target. Everything above it (registries, text layout, scaling) is backend
//! independent.

use crate::assets::ImageData;
use crate::foundation::math::{Color, FRect, Rect};
use thiserror::Error;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Opaque handle to a texture stored in the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u64);

/// Errors reported by a render backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// The handle does not name a live texture
    #[error("Unknown texture {0:?}")]
    UnknownTexture(TextureHandle),

    /// Texture dimensions exceed what the backend supports
    #[error("Texture {width}x{height} exceeds the {max}px limit")]
    TextureTooLarge {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
        /// Largest supported edge
        max: u32,
    },

    /// The backend cannot hold any more textures
    #[error("Texture limit of {0} reached")]
    TextureLimit(usize),

    /// Any other refusal
    #[error("Backend rejected resource: {0}")]
    Rejected(String),
}

/// One blit: a source rectangle of a texture onto a destination rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blit {
    /// Source texture
    pub texture: TextureHandle,
    /// Source rectangle in texture pixels
    pub src: Rect,
    /// Destination rectangle in target pixels
    pub dst: FRect,
    /// Clockwise rotation in degrees about the destination centre
    pub rotation: f32,
    /// Colour modulation
    pub tint: Color,
}

/// Main rendering backend trait
pub trait RenderBackend {
    /// Size of the drawable target in pixels
    fn target_size(&self) -> (u32, u32);

    /// Upload decoded image data and return its handle
    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle>;

    /// Free a texture; unknown handles are ignored
    fn release_texture(&mut self, handle: TextureHandle);

    /// Draw one blit onto the target
    fn blit(&mut self, blit: &Blit) -> BackendResult<()>;
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn target_size(&self) -> (u32, u32) {
        (**self).target_size()
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle> {
        (**self).create_texture(image)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        (**self).release_texture(handle);
    }

    fn blit(&mut self, blit: &Blit) -> BackendResult<()> {
        (**self).blit(blit)
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for &mut B {
    fn target_size(&self) -> (u32, u32) {
        (**self).target_size()
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle> {
        (**self).create_texture(image)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        (**self).release_texture(handle);
    }

    fn blit(&mut self, blit: &Blit) -> BackendResult<()> {
        (**self).blit(blit)
    }
}
