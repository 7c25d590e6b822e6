//! Bitmap font data
//!
//! A [`Font`] owns its atlas texture handle, a map from character to glyph
//! metrics and a map from ordered character pair to kerning adjustment.

use crate::foundation::math::{Rect, Vector2};
use crate::render::Texture;
use std::collections::HashMap;

/// Result type for font operations
pub type FontResult<T> = Result<T, FontError>;

/// Errors that can occur during font lookups
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FontError {
    /// Requested character has no glyph in the atlas
    #[error("Character {0:?} not found in atlas")]
    UnknownGlyph(char),
}

/// Metrics for one glyph in the atlas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    /// Source rectangle within the atlas image
    pub rect: Rect,
    /// Rendering offset from the pen position (x) and line top (y)
    pub offset: Vector2<i32>,
    /// Horizontal advance
    pub width: i32,
}

/// Bitmap font: atlas, glyph metrics and kerning pairs
#[derive(Debug, Clone)]
pub struct Font {
    /// Atlas texture
    atlas: Texture,

    /// Glyph information lookup
    glyphs: HashMap<char, GlyphMetrics>,

    /// Kerning adjustment keyed by (left, right)
    kerning: HashMap<(char, char), i32>,

    /// Distance between line tops
    line_height: i32,
}

impl Font {
    /// Assemble a font from already validated parts
    pub fn new(
        atlas: Texture,
        glyphs: HashMap<char, GlyphMetrics>,
        kerning: HashMap<(char, char), i32>,
        line_height: i32,
    ) -> Self {
        Self {
            atlas,
            glyphs,
            kerning,
            line_height,
        }
    }

    /// Get glyph information for a character
    pub fn glyph(&self, ch: char) -> FontResult<&GlyphMetrics> {
        self.glyphs.get(&ch).ok_or(FontError::UnknownGlyph(ch))
    }

    /// Kerning adjustment for `left` followed by `right`; zero when no pair is defined
    pub fn kerning(&self, left: char, right: char) -> i32 {
        self.kerning.get(&(left, right)).copied().unwrap_or(0)
    }

    /// The atlas texture
    pub fn atlas(&self) -> &Texture {
        &self.atlas
    }

    /// Distance between consecutive lines
    pub fn line_height(&self) -> i32 {
        self.line_height
    }

    /// Number of glyphs in the atlas
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Number of kerning pairs
    pub fn kerning_pair_count(&self) -> usize {
        self.kerning.len()
    }
}
