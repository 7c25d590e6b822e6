//! # Stage Engine
//!
//! A small 2D presentation engine: indexed media registries and
//! kerning-aware bitmap-font text, drawn against a fixed logical resolution.
//!
//! ## Features
//!
//! - **Indexed Registries**: Textures, fonts and sounds addressed by load order
//! - **Bitmap Fonts**: Atlas + glyph metrics + kerning pairs, described in RON or TOML
//! - **Text Layout**: Kerning, centering, drop shadows, scaling and multi-line text
//! - **Backend Agnostic**: Software canvas and recording backends included
//! - **Audio**: Sound, effect and music registries with a pluggable output
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use stage_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = EngineConfig::load_from_file("engine.toml")?;
//!     let mut engine = Engine::new(config, SoftwareCanvas::new(1280, 720))?;
//!
//!     let font = engine.load_font("main.ron")?;
//!     engine.draw_text_ext(
//!         "Hello World",
//!         font,
//!         Color::WHITE,
//!         TextStyle::SHADOW | TextStyle::CENTER,
//!         640.0,
//!         340.0,
//!     )?;
//!     engine.backend().save_png("frame.png")?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Core engine modules
pub mod core;
pub mod config;
pub mod foundation;

// Subsystems
pub mod assets;
pub mod audio;
pub mod render;
pub mod text;

mod engine;

pub use engine::{Engine, EngineError};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{AssetError, BulkLoadError, RegistryError},
        audio::{AudioOutput, SilentOutput, SoundId},
        config::Config,
        core::{AssetConfig, EngineConfig, Settings, WindowConfig},
        foundation::math::{Color, Rect, Vec2},
        render::{RecordingBackend, RenderBackend, SoftwareCanvas, TextureId},
        text::{FontId, TextStyle},
        Engine, EngineError,
    };
}
