//! Core engine implementation
//!
//! [`Engine`] is the context object every drawing, loading and playback call
//! goes through. It owns the render backend, the texture, font and sound
//! registries, the logical-to-target scale and the user settings. Dropping it
//! releases every texture and font atlas still alive.

use crate::assets::{AssetError, BulkLoadError, Registry, RegistryError};
use crate::audio::{AudioError, AudioOutput, Channel, Playback, SilentOutput, SoundId, SoundLibrary, SoundSample};
use crate::config::{Config, ConfigError};
use crate::core::{AssetKind, EngineConfig, Settings};
use crate::foundation::math::{Color, Rect, Vec2};
use crate::render::{BackendError, DrawCommand, DrawDispatcher, RenderBackend, Texture, TextureId};
use crate::text::{Font, FontId, FontStore, TextLayout, TextStyle};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Configuration failed validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or settings file could not be read or written
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// A resource failed to load
    #[error(transparent)]
    Asset(#[from] AssetError),

    /// A bulk load stopped early
    #[error(transparent)]
    BulkLoad(#[from] BulkLoadError),

    /// Bad registry index or released entry
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// The render backend failed a draw
    #[error("Render backend error: {0}")]
    Backend(#[from] BackendError),

    /// Audio playback failed
    #[error(transparent)]
    Audio(#[from] AudioError),
}

/// Main engine context
pub struct Engine<B: RenderBackend> {
    backend: B,
    audio: Box<dyn AudioOutput>,
    config: EngineConfig,
    settings: Settings,
    dispatcher: DrawDispatcher,
    textures: Registry<Texture>,
    fonts: FontStore,
    sounds: SoundLibrary,
}

impl<B: RenderBackend> Engine<B> {
    /// Create an engine drawing into `backend`
    ///
    /// Audio goes to a [`SilentOutput`] until [`Engine::with_audio_output`] is used.
    pub fn new(config: EngineConfig, backend: B) -> Result<Self, EngineError> {
        config.validate().map_err(EngineError::InvalidConfig)?;
        log::info!("Initializing engine \"{}\"...", config.window.title);

        let dispatcher = DrawDispatcher::new(
            config.window.logical_width,
            config.window.logical_height,
            backend.target_size(),
        );

        Ok(Self {
            backend,
            audio: Box::new(SilentOutput::new()),
            settings: Settings {
                fullscreen: config.window.fullscreen,
                ..Settings::default()
            },
            config,
            dispatcher,
            textures: Registry::new("texture"),
            fonts: FontStore::new(),
            sounds: SoundLibrary::new(),
        })
    }

    /// Route audio to another output
    pub fn with_audio_output(mut self, output: impl AudioOutput + 'static) -> Self {
        self.audio.stop_all();
        self.audio = Box::new(output);
        self
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The render backend
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Mutable access to the render backend
    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Logical-to-target scaling
    pub fn dispatcher(&self) -> &DrawDispatcher {
        &self.dispatcher
    }

    /// Recompute the draw scale after the backend target changed size
    pub fn resize(&mut self) {
        self.dispatcher.resize(self.backend.target_size());
    }

    fn resolve_all<P: AsRef<Path>>(&self, kind: AssetKind, paths: &[P]) -> Vec<PathBuf> {
        paths.iter().map(|p| self.config.assets.resolve(kind, p)).collect()
    }

    // ---- Textures ----

    /// Load one image from the images folder
    pub fn load_texture(&mut self, path: impl AsRef<Path>) -> Result<TextureId, AssetError> {
        let path = self.config.assets.resolve(AssetKind::Image, path);
        let texture = Texture::load(&mut self.backend, &path)?;
        let id = self.textures.push(texture);
        log::debug!("Loaded texture {:?} as texture {}", path, id.index());
        Ok(id)
    }

    /// Load images in order, stopping at the first failure
    pub fn load_textures<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        let paths = self.resolve_all(AssetKind::Image, paths);
        let backend = &mut self.backend;
        self.textures.load_many(&paths, |path| Texture::load(&mut *backend, path))
    }

    /// Texture at a raw index
    pub fn texture(&self, index: i64) -> Result<&Texture, RegistryError> {
        self.textures.get_by_index(index)
    }

    /// Texture behind a handle
    pub fn texture_by_id(&self, id: TextureId) -> Result<&Texture, RegistryError> {
        self.textures.get(id)
    }

    /// Handle for a raw texture index
    pub fn texture_id(&self, index: i64) -> Result<TextureId, RegistryError> {
        self.textures.handle(index)
    }

    /// Draw a whole texture at its natural size with its top-left at (x, y)
    pub fn draw_texture(&mut self, id: TextureId, x: f32, y: f32) -> Result<(), EngineError> {
        self.draw_texture_rotated(id, x, y, 0.0)
    }

    /// Draw a whole texture rotated clockwise by `angle` degrees about its centre
    pub fn draw_texture_rotated(&mut self, id: TextureId, x: f32, y: f32, angle: f32) -> Result<(), EngineError> {
        let texture = *self.textures.get(id)?;
        let command = DrawCommand {
            texture: texture.handle,
            src: Rect::new(0, 0, texture.width as i32, texture.height as i32),
            position: Vec2::new(x, y),
            size: Vec2::new(texture.width as f32, texture.height as f32),
            rotation: angle,
            tint: Color::WHITE,
        };
        self.dispatcher.submit(&mut self.backend, &command)?;
        Ok(())
    }

    // ---- Fonts and text ----

    /// Load one font descriptor from the fonts folder
    pub fn load_font(&mut self, path: impl AsRef<Path>) -> Result<FontId, AssetError> {
        let path = self.config.assets.resolve(AssetKind::Font, path);
        self.fonts.load_font(&mut self.backend, &path)
    }

    /// Load fonts in order, stopping at the first failure
    pub fn load_fonts<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        let paths = self.resolve_all(AssetKind::Font, paths);
        self.fonts.load_fonts(&mut self.backend, &paths)
    }

    /// Release a font and its atlas
    ///
    /// The slot stays allocated; using `id` afterwards fails with
    /// [`RegistryError::Released`].
    pub fn free_font(&mut self, id: FontId) -> Result<(), RegistryError> {
        self.fonts.free_font(&mut self.backend, id)
    }

    /// Font at a raw index
    pub fn font(&self, index: i64) -> Result<&Font, RegistryError> {
        self.fonts.get_by_index(index)
    }

    /// Handle for a raw font index
    pub fn font_id(&self, index: i64) -> Result<FontId, RegistryError> {
        self.fonts.id(index)
    }

    /// Unscaled width of `text` in `font`
    pub fn text_width(&self, text: &str, font: FontId) -> Result<i32, RegistryError> {
        let font = self.fonts.get(font)?;
        Ok(TextLayout::new(font).text_width(text))
    }

    /// Draw white text without shadow or centering
    pub fn draw_text(&mut self, text: &str, font: FontId, x: f32, y: f32) -> Result<(), EngineError> {
        self.draw_text_ext(text, font, Color::WHITE, TextStyle::empty(), x, y)
    }

    /// Draw white text at a scale
    pub fn draw_text_scaled(&mut self, text: &str, font: FontId, scale: f32, x: f32, y: f32) -> Result<(), EngineError> {
        self.draw_text_ext_scale(text, font, scale, Color::WHITE, TextStyle::empty(), x, y)
    }

    /// Draw text with a colour and style at scale 1
    pub fn draw_text_ext(
        &mut self,
        text: &str,
        font: FontId,
        color: Color,
        style: TextStyle,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError> {
        self.draw_text_ext_scale(text, font, 1.0, color, style, x, y)
    }

    /// Draw text with a colour, style and scale
    ///
    /// One backend blit per glyph, shadow pass first. Characters missing from
    /// the font are skipped.
    pub fn draw_text_ext_scale(
        &mut self,
        text: &str,
        font: FontId,
        scale: f32,
        color: Color,
        style: TextStyle,
        x: f32,
        y: f32,
    ) -> Result<(), EngineError> {
        let font = self.fonts.get(font)?;
        let atlas = font.atlas().handle;
        let glyphs = TextLayout::new(font).layout(text, x, y, scale, color, style);

        for glyph in &glyphs {
            self.dispatcher.submit(&mut self.backend, &glyph.to_command(atlas))?;
        }
        Ok(())
    }

    // ---- Sound and music ----

    /// Load the music track from the music folder, replacing the current one
    pub fn load_music(&mut self, path: impl AsRef<Path>) -> Result<(), AssetError> {
        let path = self.config.assets.resolve(AssetKind::Music, path);
        self.sounds.load_music(&path)
    }

    /// Load one sound from the sounds folder
    pub fn load_sound(&mut self, path: impl AsRef<Path>) -> Result<SoundId, AssetError> {
        let path = self.config.assets.resolve(AssetKind::Sound, path);
        self.sounds.load_sound(&path)
    }

    /// Load sounds in order, stopping at the first failure
    pub fn load_sounds<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        let paths = self.resolve_all(AssetKind::Sound, paths);
        self.sounds.load_sounds(&paths)
    }

    /// Load one pitched effect from the sounds folder
    pub fn load_sound_sfx(&mut self, path: impl AsRef<Path>) -> Result<SoundId, AssetError> {
        let path = self.config.assets.resolve(AssetKind::Sound, path);
        self.sounds.load_sfx(&path)
    }

    /// Load pitched effects in order, stopping at the first failure
    pub fn load_sounds_sfx<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        let paths = self.resolve_all(AssetKind::Sound, paths);
        self.sounds.load_sfx_many(&paths)
    }

    /// Sound at a raw index
    pub fn sound_sample(&self, index: i64) -> Result<&SoundSample, RegistryError> {
        self.sounds.sound_by_index(index)
    }

    /// Handle for a raw sound index
    pub fn sound_id(&self, index: i64) -> Result<SoundId, RegistryError> {
        self.sounds.sound_handle(index)
    }

    /// Start the music track at the music volume
    pub fn play_music(&mut self, looped: bool) -> Result<(), EngineError> {
        let music = self.sounds.music().ok_or(AudioError::NoMusic)?;
        let playback = Playback {
            looped,
            ..Playback::once(self.settings.music_volume)
        };
        self.audio.play(Channel::Music, music, playback)?;
        Ok(())
    }

    /// Stop the music track
    pub fn stop_music(&mut self) {
        self.audio.stop(Channel::Music);
    }

    /// Play a sound once at the sound volume
    pub fn play_sound(&mut self, id: SoundId) -> Result<(), EngineError> {
        let sample = self.sounds.sound(id)?;
        self.audio
            .play(Channel::Sound(id.index()), sample, Playback::once(self.settings.sound_volume))?;
        Ok(())
    }

    /// Stop a sound
    pub fn stop_sound(&mut self, id: SoundId) {
        self.audio.stop(Channel::Sound(id.index()));
    }

    /// Play a pitched effect; `pitch` scales playback speed
    pub fn play_sound_sfx_pitch(&mut self, id: SoundId, pitch: f32) -> Result<(), EngineError> {
        if !(pitch.is_finite() && pitch > 0.0) {
            return Err(AudioError::PlaybackFailed(format!("invalid pitch {pitch}")).into());
        }
        let sample = self.sounds.sfx(id)?;
        let playback = Playback::once(self.settings.sound_volume).with_speed(pitch);
        self.audio.play(Channel::Sfx(id.index()), sample, playback)?;
        Ok(())
    }

    /// Stop a pitched effect
    pub fn stop_sound_sfx(&mut self, id: SoundId) {
        self.audio.stop(Channel::Sfx(id.index()));
    }

    // ---- Settings ----

    /// Current user settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Set the music volume, clamped to `[0, 1]`; applies from the next play
    pub fn set_music_volume(&mut self, volume: f32) {
        self.settings.set_music_volume(volume);
    }

    /// Set the sound volume, clamped to `[0, 1]`; applies from the next play
    pub fn set_sound_volume(&mut self, volume: f32) {
        self.settings.set_sound_volume(volume);
    }

    /// Set the fullscreen preference
    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.settings.fullscreen = fullscreen;
    }

    /// Write the settings to `path` (`.toml` or `.ron`)
    pub fn save_settings(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.settings.save_to_file(path)
    }

    /// Replace the settings with those stored at `path`
    pub fn load_settings(&mut self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        self.settings = Settings::load_from_file(path)?.sanitized();
        Ok(())
    }
}

impl<B: RenderBackend> Drop for Engine<B> {
    fn drop(&mut self) {
        self.audio.stop_all();
        for texture in self.textures.drain() {
            self.backend.release_texture(texture.handle);
        }
        self.fonts.clear(&mut self.backend);
        log::info!("Engine shut down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AssetConfig, WindowConfig};
    use crate::render::RecordingBackend;
    use approx::assert_relative_eq;

    fn engine_in(root: &Path, target: (u32, u32)) -> Engine<RecordingBackend> {
        let config = EngineConfig::new("test").with_assets(AssetConfig::new(root));
        Engine::new(config, RecordingBackend::new(target.0, target.1)).unwrap()
    }

    fn write_image(root: &Path, name: &str, w: u32, h: u32) {
        let dir = root.join("images");
        std::fs::create_dir_all(&dir).unwrap();
        image::RgbaImage::new(w, h).save(dir.join(name)).unwrap();
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig::new("bad").with_window(WindowConfig::new("bad").with_logical_size(0.0, 720.0));
        let result = Engine::new(config, RecordingBackend::new(10, 10));
        assert!(matches!(result, Err(EngineError::InvalidConfig(_))));
    }

    #[test]
    fn test_draw_texture_scales_to_target() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "ship.png", 16, 8);

        let mut engine = engine_in(dir.path(), (2560, 1440));
        let id = engine.load_texture("ship.png").unwrap();
        engine.draw_texture(id, 100.0, 50.0).unwrap();
        engine.draw_texture_rotated(id, 100.0, 50.0, 90.0).unwrap();

        let blits = engine.backend().blits();
        assert_eq!(blits.len(), 2);
        assert_relative_eq!(blits[0].dst.x, 200.0);
        assert_relative_eq!(blits[0].dst.w, 32.0);
        assert_relative_eq!(blits[0].dst.h, 16.0);
        assert_eq!(blits[0].src, Rect::new(0, 0, 16, 8));
        assert_relative_eq!(blits[1].rotation, 90.0);
    }

    #[test]
    fn test_texture_lookup_by_handle() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "wide.png", 12, 3);
        write_image(dir.path(), "tall.png", 2, 9);

        let mut engine = engine_in(dir.path(), (1280, 720));
        let wide = engine.load_texture("wide.png").unwrap();
        let tall = engine.load_texture("tall.png").unwrap();

        let texture = engine.texture_by_id(tall).unwrap();
        assert_eq!((texture.width, texture.height), (2, 9));
        assert_eq!(engine.texture_by_id(wide).unwrap().width, 12);
        assert_eq!(engine.texture_id(1).unwrap(), tall);
        assert!(matches!(
            engine.texture_by_id(TextureId::new(2)),
            Err(RegistryError::OutOfRange { index: 2, len: 2 })
        ));
    }

    #[test]
    fn test_resize_updates_scale() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = engine_in(dir.path(), (1280, 720));
        assert_relative_eq!(engine.dispatcher().scale_x(), 1.0);

        engine.backend_mut().resize(640, 360);
        engine.resize();
        assert_relative_eq!(engine.dispatcher().scale_x(), 0.5);
        assert_relative_eq!(engine.dispatcher().scale_y(), 0.5);
    }

    #[test]
    fn test_bulk_texture_load_keeps_prefix() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 2, 2);
        write_image(dir.path(), "c.png", 2, 2);

        let mut engine = engine_in(dir.path(), (1280, 720));
        let err = engine.load_textures(&["a.png", "b.png", "c.png"]).unwrap_err();
        assert_eq!(err.index, 1);
        assert!(matches!(err.source, AssetError::SourceNotFound(_)));
        assert!(engine.texture(0).is_ok());
        assert!(matches!(engine.texture(1), Err(RegistryError::OutOfRange { index: 1, len: 1 })));
    }

    #[derive(Default, Clone)]
    struct SharedOutput(std::rc::Rc<std::cell::RefCell<SilentOutput>>);

    impl AudioOutput for SharedOutput {
        fn play(&mut self, channel: Channel, sample: &SoundSample, playback: Playback) -> Result<(), AudioError> {
            self.0.borrow_mut().play(channel, sample, playback)
        }

        fn stop(&mut self, channel: Channel) {
            self.0.borrow_mut().stop(channel);
        }

        fn stop_all(&mut self) {
            self.0.borrow_mut().stop_all();
        }
    }

    #[test]
    fn test_sound_playback_uses_settings_volume() {
        let dir = tempfile::tempdir().unwrap();
        let sounds = dir.path().join("sounds");
        let music = dir.path().join("music");
        std::fs::create_dir_all(&sounds).unwrap();
        std::fs::create_dir_all(&music).unwrap();
        std::fs::write(sounds.join("hit.wav"), b"RIFF0000WAVE").unwrap();
        std::fs::write(music.join("theme.ogg"), b"OggS0000").unwrap();

        let output = SharedOutput::default();
        let mut engine = engine_in(dir.path(), (1280, 720)).with_audio_output(output.clone());
        let hit = engine.load_sound_sfx("hit.wav").unwrap();
        assert!(matches!(
            engine.play_music(true),
            Err(EngineError::Audio(AudioError::NoMusic))
        ));

        engine.set_sound_volume(0.25);
        engine.set_music_volume(2.0);
        engine.play_sound_sfx_pitch(hit, 1.5).unwrap();
        engine.load_music("theme.ogg").unwrap();
        engine.play_music(true).unwrap();

        let sfx = output.0.borrow().playback(Channel::Sfx(0)).unwrap();
        assert_relative_eq!(sfx.volume, 0.25);
        assert_relative_eq!(sfx.speed, 1.5);
        let theme = output.0.borrow().playback(Channel::Music).unwrap();
        assert_relative_eq!(theme.volume, 1.0);
        assert!(theme.looped);

        engine.stop_sound_sfx(hit);
        engine.stop_music();
        assert!(!output.0.borrow().is_playing(Channel::Sfx(0)));
        assert!(!output.0.borrow().is_playing(Channel::Music));

        assert!(engine.play_sound_sfx_pitch(hit, 0.0).is_err());
        // Nothing was loaded into the regular sound registry
        assert!(engine.play_sound(hit).is_err());
    }

    #[test]
    fn test_settings_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");

        let mut engine = engine_in(dir.path(), (1280, 720));
        engine.set_music_volume(0.3);
        engine.set_fullscreen(true);
        engine.save_settings(&path).unwrap();

        let mut other = engine_in(dir.path(), (1280, 720));
        other.load_settings(&path).unwrap();
        assert_eq!(other.settings(), engine.settings());
    }

    #[test]
    fn test_drop_releases_textures_and_atlases() {
        let dir = tempfile::tempdir().unwrap();
        write_image(dir.path(), "a.png", 2, 2);
        write_image(dir.path(), "b.png", 2, 2);

        let mut backend = RecordingBackend::new(1280, 720);
        {
            let config = EngineConfig::new("test").with_assets(AssetConfig::new(dir.path()));
            let mut engine = Engine::new(config, &mut backend).unwrap();
            assert_eq!(engine.load_textures(&["a.png", "b.png"]).unwrap(), 2);
            assert_eq!(engine.backend().texture_count(), 2);
        }
        assert_eq!(backend.texture_count(), 0);
        assert_eq!(backend.released().len(), 2);
    }
}
