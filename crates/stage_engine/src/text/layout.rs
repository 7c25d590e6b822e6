//! Text layout engine
//!
//! Converts strings into positioned glyph draws. Handles kerning, horizontal
//! centering, multi-line text and drop shadows.
//!
//! # Layout Coordinate System
//!
//! - Origin is the top-left corner of the logical window
//! - +X points right, +Y points down
//! - `y` passed to [`TextLayout::layout`] is the top of the first line
//!
//! Kerning is applied when leaving a glyph: the advance from `a` to `b` is
//! `width(a) + kerning(a, b)`. Characters without a glyph contribute no width
//! and no draws.

use super::font::{Font, GlyphMetrics};
use crate::foundation::math::{Color, Rect, Vec2};
use crate::render::{DrawCommand, TextureHandle};
use bitflags::bitflags;

/// Shadow displacement in logical pixels at scale 1.0, on both axes
pub const SHADOW_OFFSET: f32 = 2.0;

bitflags! {
    /// Text drawing options
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextStyle: u8 {
        /// Draw a darker copy underneath, offset down and right
        const SHADOW = 1;
        /// Center each line horizontally on `x`
        const CENTER = 1 << 1;
    }
}

/// One positioned glyph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphDraw {
    /// Character this draw came from
    pub ch: char,
    /// Source rectangle within the atlas
    pub src: Rect,
    /// Top-left destination corner in logical pixels
    pub position: Vec2,
    /// Destination size in logical pixels
    pub size: Vec2,
    /// Colour modulation
    pub tint: Color,
    /// Part of the shadow pass
    pub shadow: bool,
}

impl GlyphDraw {
    /// Draw command sampling `atlas`; glyphs are never rotated
    pub fn to_command(&self, atlas: TextureHandle) -> DrawCommand {
        DrawCommand {
            texture: atlas,
            src: self.src,
            position: self.position,
            size: self.size,
            rotation: 0.0,
            tint: self.tint,
        }
    }
}

/// Text layout engine over one font
#[derive(Debug, Clone, Copy)]
pub struct TextLayout<'a> {
    /// Font for glyph lookup
    font: &'a Font,
}

impl<'a> TextLayout<'a> {
    /// Create a layout engine for a font
    pub fn new(font: &'a Font) -> Self {
        Self { font }
    }

    /// Unscaled width of `text`: the widest of its lines
    pub fn text_width(&self, text: &str) -> i32 {
        text.split('\n').map(|line| self.line_width(line)).max().unwrap_or(0)
    }

    /// Unscaled width of a single line
    ///
    /// Sum of glyph widths plus the kerning of every adjacent pair,
    /// saturating at the `i32` limits.
    pub fn line_width(&self, line: &str) -> i32 {
        let mut width = 0_i64;
        self.walk_line(line, |_, _, advance| width = width.saturating_add(advance));
        i32::try_from(width).unwrap_or(if width < 0 { i32::MIN } else { i32::MAX })
    }

    /// Lay out `text` with its first line's top at `y`
    ///
    /// Every width, offset and advance is multiplied by `scale`. With
    /// [`TextStyle::SHADOW`] the whole shadow pass comes first so it renders
    /// underneath.
    pub fn layout(&self, text: &str, x: f32, y: f32, scale: f32, color: Color, style: TextStyle) -> Vec<GlyphDraw> {
        let mut main = Vec::with_capacity(text.len());
        let line_advance = self.font.line_height() as f32 * scale;

        for (line_index, line) in text.split('\n').enumerate() {
            let start_x = if style.contains(TextStyle::CENTER) {
                x - (self.line_width(line) as f32 * scale) / 2.0
            } else {
                x
            };
            let line_y = y + line_index as f32 * line_advance;

            let mut pen_x = start_x;
            self.walk_line(line, |ch, glyph, advance| {
                main.push(GlyphDraw {
                    ch,
                    src: glyph.rect,
                    position: Vec2::new(
                        pen_x + glyph.offset.x as f32 * scale,
                        line_y + glyph.offset.y as f32 * scale,
                    ),
                    size: Vec2::new(glyph.rect.w as f32 * scale, glyph.rect.h as f32 * scale),
                    tint: color,
                    shadow: false,
                });
                pen_x += advance as f32 * scale;
            });
        }

        if !style.contains(TextStyle::SHADOW) {
            return main;
        }

        let offset = SHADOW_OFFSET * scale;
        let shadow_tint = shadow_color(color);
        let mut draws = Vec::with_capacity(main.len() * 2);
        draws.extend(main.iter().map(|draw| GlyphDraw {
            position: Vec2::new(draw.position.x + offset, draw.position.y + offset),
            tint: shadow_tint,
            shadow: true,
            ..*draw
        }));
        draws.extend(main);
        draws
    }

    /// Visit each drawable glyph of a line with its advance to the next character
    fn walk_line(&self, line: &str, mut visit: impl FnMut(char, &GlyphMetrics, i64)) {
        let mut chars = line.chars().peekable();
        while let Some(ch) = chars.next() {
            let glyph = match self.font.glyph(ch) {
                Ok(glyph) => glyph,
                Err(e) => {
                    log::trace!("{e}; skipped");
                    continue;
                }
            };
            let kerning = chars.peek().map_or(0, |&next| self.font.kerning(ch, next));
            visit(ch, glyph, i64::from(glyph.width) + i64::from(kerning));
        }
    }
}

/// Tint of the shadow pass: black at half the text alpha
pub fn shadow_color(color: Color) -> Color {
    Color::BLACK.with_alpha(color.a / 2)
}
