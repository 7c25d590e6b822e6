//! Rodio audio output
//!
//! One [`Sink`] per active channel. Samples are decoded from their in-memory
//! bytes when played, so a sample that passed format sniffing can still fail
//! here with [`AudioError::PlaybackFailed`].

use super::output::{AudioOutput, Channel, Playback};
use super::sample::SoundSample;
use super::AudioError;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use std::collections::HashMap;
use std::io::Cursor;

/// Output on the default audio device
pub struct RodioOutput {
    /// Audio output stream (must be kept alive)
    _stream: OutputStream,
    /// Output stream handle for creating sinks
    handle: OutputStreamHandle,
    /// Active channel sinks
    sinks: HashMap<Channel, Sink>,
}

impl RodioOutput {
    /// Open the default output device
    pub fn new() -> Result<Self, AudioError> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| AudioError::BackendInitFailed(format!("Failed to create audio output: {}", e)))?;

        log::info!("Rodio audio output initialized");
        Ok(Self {
            _stream: stream,
            handle,
            sinks: HashMap::new(),
        })
    }

    /// Drop sinks whose sound has finished
    pub fn update(&mut self) {
        self.sinks.retain(|_, sink| !sink.empty());
    }
}

impl AudioOutput for RodioOutput {
    fn play(&mut self, channel: Channel, sample: &SoundSample, playback: Playback) -> Result<(), AudioError> {
        self.stop(channel);

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to create sink: {}", e)))?;
        let source = Decoder::new(Cursor::new(sample.shared_data()))
            .map_err(|e| AudioError::PlaybackFailed(format!("Failed to decode audio: {}", e)))?;

        if playback.looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        sink.set_volume(playback.volume);
        sink.set_speed(playback.speed);

        self.sinks.insert(channel, sink);
        Ok(())
    }

    fn stop(&mut self, channel: Channel) {
        if let Some(sink) = self.sinks.remove(&channel) {
            sink.stop();
        }
    }

    fn stop_all(&mut self) {
        for (_, sink) in self.sinks.drain() {
            sink.stop();
        }
    }
}

impl Drop for RodioOutput {
    fn drop(&mut self) {
        self.stop_all();
    }
}
