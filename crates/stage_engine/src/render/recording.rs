//! Recording backend
//!
//! Keeps every blit it receives instead of drawing it. Used for headless runs
//! and for comparing draw sequences in tests.

use super::backend::{BackendError, BackendResult, Blit, RenderBackend, TextureHandle};
use crate::assets::ImageData;
use std::collections::HashMap;

/// Backend that records blits
#[derive(Debug, Default)]
pub struct RecordingBackend {
    target: (u32, u32),
    textures: HashMap<TextureHandle, (u32, u32)>,
    next_id: u64,
    max_textures: Option<usize>,
    blits: Vec<Blit>,
    released: Vec<TextureHandle>,
}

impl RecordingBackend {
    /// Create a recorder with a target of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: (width, height),
            ..Self::default()
        }
    }

    /// Refuse textures once `max` are alive
    pub fn with_texture_limit(mut self, max: usize) -> Self {
        self.max_textures = Some(max);
        self
    }

    /// Change the target size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.target = (width, height);
    }

    /// Blits recorded so far
    pub fn blits(&self) -> &[Blit] {
        &self.blits
    }

    /// Take the recorded blits, leaving the list empty
    pub fn take_blits(&mut self) -> Vec<Blit> {
        std::mem::take(&mut self.blits)
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    /// Handles released so far, in release order
    pub fn released(&self) -> &[TextureHandle] {
        &self.released
    }
}

impl RenderBackend for RecordingBackend {
    fn target_size(&self) -> (u32, u32) {
        self.target
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle> {
        if let Some(max) = self.max_textures {
            if self.textures.len() >= max {
                return Err(BackendError::TextureLimit(max));
            }
        }
        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.insert(handle, (image.width, image.height));
        Ok(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(&handle).is_some() {
            self.released.push(handle);
        }
    }

    fn blit(&mut self, blit: &Blit) -> BackendResult<()> {
        if !self.textures.contains_key(&blit.texture) {
            return Err(BackendError::UnknownTexture(blit.texture));
        }
        self.blits.push(*blit);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Color, FRect, Rect};

    #[test]
    fn test_texture_limit() {
        let mut backend = RecordingBackend::new(64, 64).with_texture_limit(1);
        let image = ImageData::solid_color(2, 2, [0, 0, 0, 255]);
        let first = backend.create_texture(&image).unwrap();
        assert_eq!(backend.create_texture(&image), Err(BackendError::TextureLimit(1)));

        backend.release_texture(first);
        assert_eq!(backend.released(), &[first]);
        assert!(backend.create_texture(&image).is_ok());
    }

    #[test]
    fn test_blit_requires_live_texture() {
        let mut backend = RecordingBackend::new(64, 64);
        let blit = Blit {
            texture: TextureHandle(9),
            src: Rect::new(0, 0, 1, 1),
            dst: FRect::new(0.0, 0.0, 1.0, 1.0),
            rotation: 0.0,
            tint: Color::WHITE,
        };
        assert_eq!(backend.blit(&blit), Err(BackendError::UnknownTexture(TextureHandle(9))));
        assert!(backend.blits().is_empty());
    }
}
