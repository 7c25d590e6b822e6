//! Audio outputs
//!
//! An [`AudioOutput`] plays samples on named channels. Starting a channel
//! that is already playing replaces what it was playing.

use super::sample::SoundSample;
use super::AudioError;
use std::collections::HashMap;

/// Playback channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// The music track
    Music,
    /// Channel owned by the sound at this index
    Sound(usize),
    /// Channel owned by the pitched effect at this index
    Sfx(usize),
}

/// Playback parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Playback {
    /// Volume in `[0, 1]`
    pub volume: f32,
    /// Playback speed; also shifts pitch
    pub speed: f32,
    /// Repeat until stopped
    pub looped: bool,
}

impl Playback {
    /// Play once at normal speed
    pub fn once(volume: f32) -> Self {
        Self {
            volume,
            speed: 1.0,
            looped: false,
        }
    }

    /// Repeat at normal speed
    pub fn looped(volume: f32) -> Self {
        Self {
            looped: true,
            ..Self::once(volume)
        }
    }

    /// Same parameters at another speed
    pub fn with_speed(self, speed: f32) -> Self {
        Self { speed, ..self }
    }
}

/// Something that can play samples
pub trait AudioOutput {
    /// Start `sample` on `channel`
    fn play(&mut self, channel: Channel, sample: &SoundSample, playback: Playback) -> Result<(), AudioError>;

    /// Stop a channel; stopping an idle channel does nothing
    fn stop(&mut self, channel: Channel);

    /// Stop every channel
    fn stop_all(&mut self);
}

impl<O: AudioOutput + ?Sized> AudioOutput for Box<O> {
    fn play(&mut self, channel: Channel, sample: &SoundSample, playback: Playback) -> Result<(), AudioError> {
        (**self).play(channel, sample, playback)
    }

    fn stop(&mut self, channel: Channel) {
        (**self).stop(channel)
    }

    fn stop_all(&mut self) {
        (**self).stop_all()
    }
}

/// Output without a device
///
/// Tracks which channels would be playing so headless runs and tests can
/// observe playback requests.
#[derive(Debug, Default)]
pub struct SilentOutput {
    active: HashMap<Channel, Playback>,
}

impl SilentOutput {
    /// Create a silent output
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of the request active on `channel`
    pub fn playback(&self, channel: Channel) -> Option<Playback> {
        self.active.get(&channel).copied()
    }

    /// Whether `channel` has an active request
    pub fn is_playing(&self, channel: Channel) -> bool {
        self.active.contains_key(&channel)
    }
}

impl AudioOutput for SilentOutput {
    fn play(&mut self, channel: Channel, _sample: &SoundSample, playback: Playback) -> Result<(), AudioError> {
        self.active.insert(channel, playback);
        Ok(())
    }

    fn stop(&mut self, channel: Channel) {
        self.active.remove(&channel);
    }

    fn stop_all(&mut self) {
        self.active.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silent_output_tracks_channels() {
        let sample = SoundSample::from_bytes(b"RIFF0000".to_vec()).unwrap();
        let mut output = SilentOutput::new();

        output.play(Channel::Music, &sample, Playback::looped(0.5)).unwrap();
        output
            .play(Channel::Sfx(2), &sample, Playback::once(1.0).with_speed(1.5))
            .unwrap();
        assert!(output.playback(Channel::Music).unwrap().looped);
        assert_eq!(output.playback(Channel::Sfx(2)).unwrap().speed, 1.5);

        output.stop(Channel::Music);
        output.stop(Channel::Sound(7));
        assert!(!output.is_playing(Channel::Music));
        assert!(output.is_playing(Channel::Sfx(2)));

        output.stop_all();
        assert!(!output.is_playing(Channel::Sfx(2)));
    }
}
