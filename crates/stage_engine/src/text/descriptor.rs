//! Font descriptor files
//!
//! A descriptor names the atlas image (relative to the descriptor file) and
//! lists every glyph and kerning pair. Both RON and TOML are accepted, picked
//! by file extension:
//!
//! ```ron
//! (
//!     atlas: "main.png",
//!     line_height: Some(18),
//!     glyphs: [
//!         (ch: 'A', rect: (0, 0, 10, 16), offset: (0, 2), width: 11),
//!         (ch: 'V', rect: (10, 0, 10, 16), offset: (0, 2), width: 11),
//!     ],
//!     kerning: [
//!         (left: 'A', right: 'V', value: -2),
//!     ],
//! )
//! ```

use crate::assets::{read_source, AssetError};
use crate::config::ConfigFormat;
use crate::foundation::math::{Rect, Vector2};
use crate::render::Texture;
use super::font::{Font, GlyphMetrics};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Largest magnitude accepted for any glyph metric, kerning value or line height
pub const MAX_METRIC: i32 = u16::MAX as i32;

/// One glyph entry: character, atlas rectangle, offset and advance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphEntry {
    /// Character code
    pub ch: char,
    /// `[x, y, w, h]` within the atlas image
    pub rect: [i32; 4],
    /// `[x, y]` rendering offset
    #[serde(default)]
    pub offset: [i32; 2],
    /// Horizontal advance
    pub width: i32,
}

/// One kerning pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KerningEntry {
    /// First character of the pair
    pub left: char,
    /// Second character of the pair
    pub right: char,
    /// Signed advance adjustment in pixels
    pub value: i32,
}

/// Parsed font description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Atlas image, relative to the descriptor's directory
    pub atlas: PathBuf,
    /// Line spacing; defaults to the tallest glyph
    #[serde(default)]
    pub line_height: Option<i32>,
    /// Glyph set
    pub glyphs: Vec<GlyphEntry>,
    /// Kerning pairs
    #[serde(default)]
    pub kerning: Vec<KerningEntry>,
}

impl FontDescriptor {
    /// Read, parse and validate a descriptor file
    pub fn from_file(path: &Path) -> Result<Self, AssetError> {
        let bytes = read_source(path)?;
        let text = String::from_utf8(bytes).map_err(|_| malformed(path, "descriptor is not valid UTF-8"))?;
        let format = ConfigFormat::from_path(path)
            .map_err(|_| malformed(path, "descriptor must be a .ron or .toml file"))?;
        let descriptor: Self = format
            .parse(&text)
            .map_err(|e| malformed(path, e.to_string()))?;

        descriptor.validate(path)?;
        Ok(descriptor)
    }

    /// Check the structural invariants of the glyph and kerning tables
    pub fn validate(&self, path: &Path) -> Result<(), AssetError> {
        if self.glyphs.is_empty() {
            return Err(malformed(path, "font has no glyphs"));
        }

        let mut chars = HashSet::with_capacity(self.glyphs.len());
        for glyph in &self.glyphs {
            if !chars.insert(glyph.ch) {
                return Err(malformed(path, format!("duplicate glyph {:?}", glyph.ch)));
            }
            let [_, _, w, h] = glyph.rect;
            if w < 0 || h < 0 {
                return Err(malformed(path, format!("glyph {:?} has a negative size", glyph.ch)));
            }
            let in_range = glyph.rect.iter().all(|&v| (0..=MAX_METRIC).contains(&v))
                && glyph.offset.iter().all(|&v| within_metric(v))
                && within_metric(glyph.width);
            if !in_range {
                return Err(malformed(
                    path,
                    format!("glyph {:?} has a metric outside -{MAX_METRIC}..={MAX_METRIC}", glyph.ch),
                ));
            }
        }

        let mut pairs = HashSet::with_capacity(self.kerning.len());
        for pair in &self.kerning {
            if !pairs.insert((pair.left, pair.right)) {
                return Err(malformed(
                    path,
                    format!("duplicate kerning pair ({:?}, {:?})", pair.left, pair.right),
                ));
            }
            if !within_metric(pair.value) {
                return Err(malformed(
                    path,
                    format!("kerning pair ({:?}, {:?}) is out of range", pair.left, pair.right),
                ));
            }
            for ch in [pair.left, pair.right] {
                if !chars.contains(&ch) {
                    return Err(malformed(path, format!("kerning pair uses unknown glyph {ch:?}")));
                }
            }
        }

        if let Some(line_height) = self.line_height {
            if line_height < 0 {
                return Err(malformed(path, "line height is negative"));
            }
            if line_height > MAX_METRIC {
                return Err(malformed(path, "line height is out of range"));
            }
        }

        Ok(())
    }

    /// Check that every glyph rectangle lies inside the atlas image
    pub fn check_atlas_bounds(&self, path: &Path, width: u32, height: u32) -> Result<(), AssetError> {
        for glyph in &self.glyphs {
            if !to_rect(glyph.rect).fits_within(width, height) {
                return Err(malformed(
                    path,
                    format!("glyph {:?} lies outside the {}x{} atlas", glyph.ch, width, height),
                ));
            }
        }
        Ok(())
    }

    /// Atlas image path resolved against the descriptor's directory
    pub fn atlas_path(&self, descriptor_path: &Path) -> PathBuf {
        descriptor_path
            .parent()
            .map_or_else(|| self.atlas.clone(), |dir| dir.join(&self.atlas))
    }

    /// Build the runtime font around an uploaded atlas
    pub fn into_font(self, atlas: Texture) -> Font {
        let line_height = self
            .line_height
            .unwrap_or_else(|| self.glyphs.iter().map(|g| g.rect[3]).max().unwrap_or(0));

        let glyphs: HashMap<char, GlyphMetrics> = self
            .glyphs
            .into_iter()
            .map(|g| {
                let metrics = GlyphMetrics {
                    rect: to_rect(g.rect),
                    offset: Vector2::new(g.offset[0], g.offset[1]),
                    width: g.width,
                };
                (g.ch, metrics)
            })
            .collect();

        let kerning = self
            .kerning
            .into_iter()
            .map(|k| ((k.left, k.right), k.value))
            .collect();

        Font::new(atlas, glyphs, kerning, line_height)
    }
}

fn within_metric(value: i32) -> bool {
    (-MAX_METRIC..=MAX_METRIC).contains(&value)
}

fn to_rect([x, y, w, h]: [i32; 4]) -> Rect {
    Rect::new(x, y, w, h)
}

fn malformed(path: &Path, reason: impl Into<String>) -> AssetError {
    AssetError::MalformedDescriptor {
        path: path.to_path_buf(),
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::TextureHandle;

    fn glyph(ch: char, x: i32, width: i32) -> GlyphEntry {
        GlyphEntry { ch, rect: [x, 0, 8, 12], offset: [0, 0], width }
    }

    fn descriptor() -> FontDescriptor {
        FontDescriptor {
            atlas: PathBuf::from("atlas.png"),
            line_height: None,
            glyphs: vec![glyph('A', 0, 8), glyph('V', 8, 9)],
            kerning: vec![KerningEntry { left: 'A', right: 'V', value: -2 }],
        }
    }

    fn reason_of(result: Result<(), AssetError>) -> String {
        match result {
            Err(AssetError::MalformedDescriptor { reason, .. }) => reason,
            other => panic!("expected MalformedDescriptor, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_descriptor() {
        assert!(descriptor().validate(Path::new("f.ron")).is_ok());
    }

    #[test]
    fn test_duplicate_glyph_rejected() {
        let mut desc = descriptor();
        desc.glyphs.push(glyph('A', 16, 8));
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("duplicate glyph"));
    }

    #[test]
    fn test_duplicate_kerning_pair_rejected() {
        let mut desc = descriptor();
        desc.kerning.push(KerningEntry { left: 'A', right: 'V', value: 1 });
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("duplicate kerning"));
    }

    #[test]
    fn test_kerning_with_unknown_glyph_rejected() {
        let mut desc = descriptor();
        desc.kerning.push(KerningEntry { left: 'A', right: 'Q', value: 1 });
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("unknown glyph"));
    }

    #[test]
    fn test_oversized_metrics_rejected() {
        let mut desc = descriptor();
        desc.glyphs[0].rect = [i32::MAX, 0, 1, 1];
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("outside"));

        let mut desc = descriptor();
        desc.glyphs[1].width = 2_000_000_000;
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("outside"));

        let mut desc = descriptor();
        desc.glyphs[1].offset = [0, -MAX_METRIC - 1];
        assert!(desc.validate(Path::new("f.ron")).is_err());

        let mut desc = descriptor();
        desc.kerning[0].value = i32::MIN;
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("out of range"));

        let mut desc = descriptor();
        desc.line_height = Some(MAX_METRIC + 1);
        assert!(reason_of(desc.validate(Path::new("f.ron"))).contains("out of range"));

        let mut desc = descriptor();
        desc.glyphs[0].width = MAX_METRIC;
        desc.kerning[0].value = -MAX_METRIC;
        assert!(desc.validate(Path::new("f.ron")).is_ok());
    }

    #[test]
    fn test_atlas_bounds_with_extreme_rect() {
        let mut desc = descriptor();
        desc.glyphs[0].rect = [i32::MAX, 0, 1, 1];
        assert!(desc.check_atlas_bounds(Path::new("f.ron"), 16, 12).is_err());
    }

    #[test]
    fn test_atlas_bounds() {
        let desc = descriptor();
        assert!(desc.check_atlas_bounds(Path::new("f.ron"), 16, 12).is_ok());
        assert!(desc.check_atlas_bounds(Path::new("f.ron"), 15, 12).is_err());
    }

    #[test]
    fn test_atlas_path_is_relative_to_descriptor() {
        let desc = descriptor();
        assert_eq!(
            desc.atlas_path(Path::new("assets/fonts/main.ron")),
            PathBuf::from("assets/fonts/atlas.png")
        );
    }

    #[test]
    fn test_into_font_defaults_line_height() {
        let atlas = Texture { handle: TextureHandle(0), width: 16, height: 12 };
        let font = descriptor().into_font(atlas);
        assert_eq!(font.line_height(), 12);
        assert_eq!(font.glyph_count(), 2);
        assert_eq!(font.kerning('A', 'V'), -2);
    }

    #[test]
    fn test_parse_ron_and_toml_files() {
        let dir = tempfile::tempdir().unwrap();

        let ron_path = dir.path().join("main.ron");
        std::fs::write(
            &ron_path,
            r#"(
                atlas: "main.png",
                glyphs: [
                    (ch: 'A', rect: (0, 0, 8, 12), offset: (0, 1), width: 8),
                    (ch: 'V', rect: (8, 0, 8, 12), width: 9),
                ],
                kerning: [(left: 'A', right: 'V', value: -2)],
            )"#,
        )
        .unwrap();
        let from_ron = FontDescriptor::from_file(&ron_path).unwrap();
        assert_eq!(from_ron.glyphs.len(), 2);
        assert_eq!(from_ron.glyphs[0].offset, [0, 1]);
        assert_eq!(from_ron.glyphs[1].offset, [0, 0]);

        let toml_path = dir.path().join("main.toml");
        std::fs::write(
            &toml_path,
            r#"
atlas = "main.png"
line_height = 14

[[glyphs]]
ch = "A"
rect = [0, 0, 8, 12]
width = 8

[[glyphs]]
ch = "V"
rect = [8, 0, 8, 12]
width = 9

[[kerning]]
left = "A"
right = "V"
value = -2
"#,
        )
        .unwrap();
        let from_toml = FontDescriptor::from_file(&toml_path).unwrap();
        assert_eq!(from_toml.line_height, Some(14));
        assert_eq!(from_toml.kerning, from_ron.kerning);
    }

    #[test]
    fn test_unparseable_descriptor_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(atlas: ").unwrap();
        assert!(matches!(
            FontDescriptor::from_file(&path),
            Err(AssetError::MalformedDescriptor { .. })
        ));

        let missing = dir.path().join("missing.ron");
        assert!(matches!(
            FontDescriptor::from_file(&missing),
            Err(AssetError::SourceNotFound(_))
        ));
    }
}
