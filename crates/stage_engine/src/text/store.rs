//! Font store
//!
//! Loaded fonts live in a [`Registry`] and are addressed by [`FontId`]. Freeing a
//! font releases its atlas texture right away and leaves its slot empty; any
//! later lookup through the stale id fails with [`RegistryError::Released`].

use super::descriptor::FontDescriptor;
use super::font::Font;
use crate::assets::{AssetError, BulkLoadError, Handle, ImageData, Registry, RegistryError};
use crate::render::{RenderBackend, Texture};
use std::path::Path;

/// Stable font handle
pub type FontId = Handle<Font>;

/// Registry of loaded fonts
pub struct FontStore {
    fonts: Registry<Font>,
}

impl FontStore {
    /// Create an empty store
    pub const fn new() -> Self {
        Self {
            fonts: Registry::new("font"),
        }
    }

    /// Load one font descriptor plus its atlas and append it
    pub fn load_font<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, path: &Path) -> Result<FontId, AssetError> {
        let font = load_font_file(backend, path)?;
        let id = self.fonts.push(font);
        log::info!("Loaded font {:?} as font {}", path, id.index());
        Ok(id)
    }

    /// Load fonts in order, stopping at the first failure
    ///
    /// Fonts loaded before the failure stay registered.
    pub fn load_fonts<B, P>(&mut self, backend: &mut B, paths: &[P]) -> Result<usize, BulkLoadError>
    where
        B: RenderBackend + ?Sized,
        P: AsRef<Path>,
    {
        self.fonts.load_many(paths, |path| load_font_file(&mut *backend, path))
    }

    /// Look up a font
    pub fn get(&self, id: FontId) -> Result<&Font, RegistryError> {
        self.fonts.get(id)
    }

    /// Look up a font by raw index
    pub fn get_by_index(&self, index: i64) -> Result<&Font, RegistryError> {
        self.fonts.get_by_index(index)
    }

    /// Handle for a raw index
    pub fn id(&self, index: i64) -> Result<FontId, RegistryError> {
        self.fonts.handle(index)
    }

    /// Release a font and its atlas texture
    pub fn free_font<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, id: FontId) -> Result<(), RegistryError> {
        let font = self.fonts.release(id)?;
        backend.release_texture(font.atlas().handle);
        log::debug!("Released font {}", id.index());
        Ok(())
    }

    /// Release every remaining font
    pub fn clear<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        for font in self.fonts.drain() {
            backend.release_texture(font.atlas().handle);
        }
    }

    /// Number of font slots, including freed ones
    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    /// Whether no font was ever loaded
    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a descriptor and load the atlas it references
///
/// Atlas failures are reported as [`AssetError::AtlasLoadFailed`] wrapping the
/// texture load error.
pub fn load_font_file<B: RenderBackend + ?Sized>(backend: &mut B, path: &Path) -> Result<Font, AssetError> {
    let descriptor = FontDescriptor::from_file(path)?;
    let atlas_path = descriptor.atlas_path(path);

    let atlas_failed = |source: AssetError| AssetError::AtlasLoadFailed {
        font: path.to_path_buf(),
        source: Box::new(source),
    };

    let image = ImageData::from_file(&atlas_path).map_err(atlas_failed)?;
    descriptor.check_atlas_bounds(path, image.width, image.height)?;
    let atlas = Texture::upload(backend, &image, &atlas_path).map_err(atlas_failed)?;

    log::debug!(
        "Font {:?}: {} glyphs, {} kerning pairs, atlas {}x{}",
        path,
        descriptor.glyphs.len(),
        descriptor.kerning.len(),
        atlas.width,
        atlas.height
    );

    Ok(descriptor.into_font(atlas))
}
