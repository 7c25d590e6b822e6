//! Sound samples
//!
//! A [`SoundSample`] keeps the encoded file bytes; decoding happens in the
//! output at playback time. Loading only checks the container format by its
//! magic bytes.

use crate::assets::{read_source, AssetError};
use std::path::Path;
use std::sync::Arc;

/// Supported audio formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    /// WAV uncompressed
    Wav,
    /// OGG Vorbis compressed
    Ogg,
    /// MP3 compressed
    Mp3,
    /// FLAC lossless
    Flac,
}

impl AudioFormat {
    /// Detect the format from leading magic bytes
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        match &bytes[0..4] {
            b"RIFF" => Some(Self::Wav),
            b"OggS" => Some(Self::Ogg),
            b"fLaC" => Some(Self::Flac),
            // ID3 tag or bare frame sync
            [b'I', b'D', b'3', _] | [0xFF, 0xFB, _, _] | [0xFF, 0xFA, _, _] | [0xFF, 0xF3, _, _] => {
                Some(Self::Mp3)
            }
            _ => None,
        }
    }
}

/// Encoded audio data ready to be handed to an output
#[derive(Debug, Clone)]
pub struct SoundSample {
    data: Arc<[u8]>,
    format: AudioFormat,
}

impl SoundSample {
    /// Read and sniff an audio file
    pub fn load(path: &Path) -> Result<Self, AssetError> {
        let bytes = read_source(path)?;
        Self::from_bytes(bytes).map_err(|reason| AssetError::DecodeFailed {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Wrap in-memory file bytes
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("empty audio file".to_string());
        }
        let format = AudioFormat::detect(&bytes).ok_or_else(|| "unknown audio format".to_string())?;
        Ok(Self {
            data: bytes.into(),
            format,
        })
    }

    /// Raw encoded bytes
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Shared handle to the encoded bytes
    pub fn shared_data(&self) -> Arc<[u8]> {
        Arc::clone(&self.data)
    }

    /// Container format
    pub fn format(&self) -> AudioFormat {
        self.format
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_detection() {
        assert_eq!(AudioFormat::detect(b"RIFF....WAVE"), Some(AudioFormat::Wav));
        assert_eq!(AudioFormat::detect(b"OggS...."), Some(AudioFormat::Ogg));
        assert_eq!(AudioFormat::detect(b"fLaC...."), Some(AudioFormat::Flac));
        assert_eq!(AudioFormat::detect(b"ID3\x04...."), Some(AudioFormat::Mp3));
        assert_eq!(AudioFormat::detect(b"ABCD"), None);
        assert_eq!(AudioFormat::detect(b"RI"), None);
    }

    #[test]
    fn test_empty_data_fails() {
        assert!(SoundSample::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn test_load_reports_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("noise.wav");
        std::fs::write(&path, b"not audio at all").unwrap();

        match SoundSample::load(&path) {
            Err(AssetError::DecodeFailed { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected DecodeFailed, got {other:?}"),
        }
        assert!(matches!(
            SoundSample::load(&dir.path().join("missing.wav")),
            Err(AssetError::SourceNotFound(_))
        ));
    }

    #[test]
    fn test_load_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("click.ogg");
        std::fs::write(&path, b"OggS\0\0\0\0").unwrap();

        let sample = SoundSample::load(&path).unwrap();
        assert_eq!(sample.format(), AudioFormat::Ogg);
        assert_eq!(sample.data(), b"OggS\0\0\0\0");
    }
}
