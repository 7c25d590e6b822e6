//! Audio system
//!
//! Sound and music registries plus the [`AudioOutput`] seam that plays them.
//! [`SilentOutput`] is always available; a device-backed `RodioOutput` is
//! compiled in with the `rodio` feature.

pub mod library;
pub mod output;
#[cfg(feature = "rodio")]
pub mod rodio_output;
pub mod sample;

pub use library::{SoundId, SoundLibrary};
pub use output::{AudioOutput, Channel, Playback, SilentOutput};
#[cfg(feature = "rodio")]
pub use rodio_output::RodioOutput;
pub use sample::{AudioFormat, SoundSample};

use thiserror::Error;

/// Audio errors
#[derive(Error, Debug)]
pub enum AudioError {
    /// The output device could not be opened
    #[error("Audio backend initialization failed: {0}")]
    BackendInitFailed(String),

    /// The output failed to start a sample
    #[error("Playback failed: {0}")]
    PlaybackFailed(String),

    /// No music track has been loaded
    #[error("No music loaded")]
    NoMusic,
}
