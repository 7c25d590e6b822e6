//! Sound registries
//!
//! Regular sounds and pitched effects live in two independent registries that
//! follow the same append-only rules as textures. Music is a single slot that
//! each load replaces.

use super::sample::SoundSample;
use crate::assets::{AssetError, BulkLoadError, Handle, Registry, RegistryError};
use std::path::Path;

/// Handle to a loaded sample
pub type SoundId = Handle<SoundSample>;

/// Loaded sounds, effects and the current music track
pub struct SoundLibrary {
    sounds: Registry<SoundSample>,
    sfx: Registry<SoundSample>,
    music: Option<SoundSample>,
}

impl SoundLibrary {
    /// Create an empty library
    pub const fn new() -> Self {
        Self {
            sounds: Registry::new("sound"),
            sfx: Registry::new("sfx"),
            music: None,
        }
    }

    /// Load one sound
    pub fn load_sound(&mut self, path: &Path) -> Result<SoundId, AssetError> {
        let sample = SoundSample::load(path)?;
        Ok(self.sounds.push(sample))
    }

    /// Load sounds in order, stopping at the first failure
    pub fn load_sounds<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        self.sounds.load_many(paths, SoundSample::load)
    }

    /// Load one pitched effect
    pub fn load_sfx(&mut self, path: &Path) -> Result<SoundId, AssetError> {
        let sample = SoundSample::load(path)?;
        Ok(self.sfx.push(sample))
    }

    /// Load pitched effects in order, stopping at the first failure
    pub fn load_sfx_many<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize, BulkLoadError> {
        self.sfx.load_many(paths, SoundSample::load)
    }

    /// Replace the music track
    pub fn load_music(&mut self, path: &Path) -> Result<(), AssetError> {
        let sample = SoundSample::load(path)?;
        if self.music.replace(sample).is_some() {
            log::debug!("Replaced music track with {:?}", path);
        }
        Ok(())
    }

    /// Look up a sound
    pub fn sound(&self, id: SoundId) -> Result<&SoundSample, RegistryError> {
        self.sounds.get(id)
    }

    /// Look up a sound by raw index
    pub fn sound_by_index(&self, index: i64) -> Result<&SoundSample, RegistryError> {
        self.sounds.get_by_index(index)
    }

    /// Handle for a raw sound index
    pub fn sound_handle(&self, index: i64) -> Result<SoundId, RegistryError> {
        self.sounds.handle(index)
    }

    /// Look up a pitched effect
    pub fn sfx(&self, id: SoundId) -> Result<&SoundSample, RegistryError> {
        self.sfx.get(id)
    }

    /// Look up a pitched effect by raw index
    pub fn sfx_by_index(&self, index: i64) -> Result<&SoundSample, RegistryError> {
        self.sfx.get_by_index(index)
    }

    /// Current music track
    pub fn music(&self) -> Option<&SoundSample> {
        self.music.as_ref()
    }

    /// Number of loaded sounds
    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    /// Number of loaded pitched effects
    pub fn sfx_count(&self) -> usize {
        self.sfx.len()
    }
}

impl Default for SoundLibrary {
    fn default() -> Self {
        Self::new()
    }
}
