//! Text rendering system
//!
//! Bitmap fonts and kerning-aware text layout.
//!
//! # Architecture
//!
//! - [`Font`]: Glyph atlas texture, per-glyph metrics and kerning table
//! - [`FontDescriptor`]: On-disk font description (RON or TOML)
//! - [`FontStore`]: Registry of loaded fonts addressed by [`FontId`]
//! - [`TextLayout`]: Converts strings to positioned glyph draws
//!
//! # Example
//!
//! ```no_run
//! use stage_engine::render::RecordingBackend;
//! use stage_engine::text::{FontStore, TextLayout, TextStyle};
//! use stage_engine::foundation::math::Color;
//! use std::path::Path;
//!
//! let mut backend = RecordingBackend::new(1280, 720);
//! let mut fonts = FontStore::new();
//! let id = fonts.load_font(&mut backend, Path::new("fonts/main.ron"))?;
//!
//! let font = fonts.get(id)?;
//! let layout = TextLayout::new(font);
//! let width = layout.text_width("Hello World");
//! let glyphs = layout.layout("Hello World", 640.0, 32.0, 1.0, Color::WHITE, TextStyle::CENTER);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod descriptor;
pub mod font;
pub mod layout;
pub mod store;

pub use descriptor::{FontDescriptor, GlyphEntry, KerningEntry};
pub use font::{Font, FontError, GlyphMetrics};
pub use layout::{GlyphDraw, TextLayout, TextStyle, SHADOW_OFFSET};
pub use store::{FontId, FontStore};
