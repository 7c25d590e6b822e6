//! # Unified Configuration System
//!
//! Configuration for the window surface, asset folders and logging, plus the
//! persisted user [`Settings`].
//!
//! ## Configuration Categories
//!
//! - **Window Config**: Title, fixed logical resolution, fullscreen
//! - **Asset Config**: Asset root and the per-kind sub-folders
//! - **Engine Config**: Top-level structure applications load from disk
//! - **Settings**: Volumes and fullscreen, saved between runs

use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

pub use crate::config::{Config, ConfigError};

/// Default logical window width in pixels
pub const LOGICAL_WIDTH: f32 = 1280.0;
/// Default logical window height in pixels
pub const LOGICAL_HEIGHT: f32 = 720.0;

/// # Window Configuration
///
/// All drawing happens against the fixed logical resolution; the draw
/// dispatcher scales to whatever size the backend target actually has.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Logical width every draw coordinate is expressed in
    pub logical_width: f32,
    /// Logical height every draw coordinate is expressed in
    pub logical_height: f32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
}

impl WindowConfig {
    /// Create a new window configuration
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            logical_width: LOGICAL_WIDTH,
            logical_height: LOGICAL_HEIGHT,
            fullscreen: false,
        }
    }

    /// Set the logical resolution
    pub fn with_logical_size(mut self, width: f32, height: f32) -> Self {
        self.logical_width = width;
        self.logical_height = height;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if !(self.logical_width > 0.0 && self.logical_height > 0.0) {
            return Err(format!(
                "Logical size must be positive, got {}x{}",
                self.logical_width, self.logical_height
            ));
        }
        Ok(())
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::new("Stage Engine")
    }
}

/// Kinds of media that live in their own asset sub-folder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Textures and font atlases
    Image,
    /// Font descriptors
    Font,
    /// Music tracks
    Music,
    /// Sound effects and samples
    Sound,
}

/// # Asset Configuration
///
/// Relative resource paths resolve to `root/<folder>/<path>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Base directory for assets
    pub root: PathBuf,
    /// Texture folder
    pub images: String,
    /// Font descriptor folder
    pub fonts: String,
    /// Music folder
    pub music: String,
    /// Sound folder
    pub sounds: String,
}

impl AssetConfig {
    /// Create a new asset configuration rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            images: "images".to_string(),
            fonts: "fonts".to_string(),
            music: "music".to_string(),
            sounds: "sounds".to_string(),
        }
    }

    /// Set assets root directory
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Folder for one kind of asset
    pub fn folder(&self, kind: AssetKind) -> &str {
        match kind {
            AssetKind::Image => &self.images,
            AssetKind::Font => &self.fonts,
            AssetKind::Music => &self.music,
            AssetKind::Sound => &self.sounds,
        }
    }

    /// Resolve a resource path; absolute paths are returned unchanged
    pub fn resolve(&self, kind: AssetKind, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            return path.to_path_buf();
        }
        self.root.join(self.folder(kind)).join(path)
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self::new(".")
    }
}

/// # Engine Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Default log filter when `RUST_LOG` is not set
    pub log_level: String,
    /// Window configuration
    pub window: WindowConfig,
    /// Asset system configuration
    pub assets: AssetConfig,
}

impl EngineConfig {
    /// Create a new engine configuration with defaults
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            log_level: "info".to_string(),
            window: WindowConfig::new(title),
            assets: AssetConfig::default(),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Set the asset configuration
    pub fn with_assets(mut self, assets: AssetConfig) -> Self {
        self.assets = assets;
        self
    }

    /// Set the window configuration
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), String> {
        self.window.validate()
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new("Stage Engine")
    }
}

impl Config for EngineConfig {}

/// # Settings
///
/// User settings persisted between runs. Volumes are in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Music volume
    pub music_volume: f32,
    /// Sound effect volume
    pub sound_volume: f32,
    /// Fullscreen mode
    pub fullscreen: bool,
}

impl Settings {
    /// Set the music volume, clamped to `[0, 1]`
    pub fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = clamp_volume(volume);
    }

    /// Set the sound volume, clamped to `[0, 1]`
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.sound_volume = clamp_volume(volume);
    }

    /// Clamp values read from disk back into range
    pub fn sanitized(mut self) -> Self {
        self.music_volume = clamp_volume(self.music_volume);
        self.sound_volume = clamp_volume(self.sound_volume);
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            music_volume: 1.0,
            sound_volume: 1.0,
            fullscreen: false,
        }
    }
}

impl Config for Settings {}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        return 0.0;
    }
    volume.clamp(0.0, 1.0)
}
