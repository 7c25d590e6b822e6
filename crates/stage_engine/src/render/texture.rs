//! Texture registry entries

use super::backend::{RenderBackend, TextureHandle};
use crate::assets::{AssetError, Handle, ImageData};
use std::path::Path;

/// Stable texture handle
pub type TextureId = Handle<Texture>;

/// A loaded texture: backend handle plus pixel size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Texture {
    /// Backend handle
    pub handle: TextureHandle,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Texture {
    /// Decode an image file and upload it to the backend
    pub fn load<B: RenderBackend + ?Sized>(backend: &mut B, path: &Path) -> Result<Self, AssetError> {
        let image = ImageData::from_file(path)?;
        Self::upload(backend, &image, path)
    }

    /// Upload already decoded pixels; `path` is only used for error reporting
    pub fn upload<B: RenderBackend + ?Sized>(
        backend: &mut B,
        image: &ImageData,
        path: &Path,
    ) -> Result<Self, AssetError> {
        let handle = backend
            .create_texture(image)
            .map_err(|source| AssetError::BackendRejected {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(Self {
            handle,
            width: image.width,
            height: image.height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{BackendError, RecordingBackend};

    #[test]
    fn test_backend_refusal_is_backend_rejected() {
        let mut backend = RecordingBackend::new(16, 16).with_texture_limit(0);
        let image = ImageData::solid_color(2, 2, [255; 4]);

        match Texture::upload(&mut backend, &image, Path::new("full.png")) {
            Err(AssetError::BackendRejected { path, source }) => {
                assert_eq!(path, Path::new("full.png"));
                assert_eq!(source, BackendError::TextureLimit(0));
            }
            other => panic!("expected BackendRejected, got {other:?}"),
        }
    }

    #[test]
    fn test_load_records_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprite.png");
        image::RgbaImage::new(5, 7).save(&path).unwrap();

        let mut backend = RecordingBackend::new(16, 16);
        let texture = Texture::load(&mut backend, &path).unwrap();
        assert_eq!((texture.width, texture.height), (5, 7));
        assert_eq!(backend.texture_count(), 1);
    }
}
