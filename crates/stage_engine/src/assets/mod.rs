//! Asset management system
//!
//! Media is kept in append-only [`Registry`] tables and addressed by the
//! index it was given at load time.

pub mod image_loader;
pub mod registry;

pub use image_loader::ImageData;
pub use registry::{BulkLoadError, Handle, Registry, RegistryError};

use crate::render::BackendError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Asset loading errors
#[derive(Error, Debug)]
pub enum AssetError {
    /// Path does not resolve to a file
    #[error("Asset not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    /// Data is present but malformed for its expected format
    #[error("Failed to decode {}: {reason}", path.display())]
    DecodeFailed {
        /// Offending file
        path: PathBuf,
        /// Decoder message
        reason: String,
    },

    /// The backend refused the decoded resource
    #[error("Backend rejected {}: {source}", path.display())]
    BackendRejected {
        /// Offending file
        path: PathBuf,
        /// Backend error
        #[source]
        source: BackendError,
    },

    /// Structurally invalid font metadata
    #[error("Malformed font descriptor {}: {reason}", path.display())]
    MalformedDescriptor {
        /// Descriptor file
        path: PathBuf,
        /// What is wrong with it
        reason: String,
    },

    /// The glyph atlas referenced by a font failed to load
    #[error("Failed to load atlas for font {}: {source}", font.display())]
    AtlasLoadFailed {
        /// Descriptor file
        font: PathBuf,
        /// The texture load error
        #[source]
        source: Box<AssetError>,
    },

    /// IO error during asset loading
    #[error("IO error reading {}: {source}", path.display())]
    Io {
        /// File being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl AssetError {
    /// Path of the file the error is about
    pub fn path(&self) -> &Path {
        match self {
            Self::SourceNotFound(path) => path,
            Self::DecodeFailed { path, .. }
            | Self::BackendRejected { path, .. }
            | Self::MalformedDescriptor { path, .. }
            | Self::Io { path, .. } => path,
            Self::AtlasLoadFailed { font, .. } => font,
        }
    }
}

/// Read a whole file, mapping a missing file to [`AssetError::SourceNotFound`]
pub fn read_source(path: &Path) -> Result<Vec<u8>, AssetError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => AssetError::SourceNotFound(path.to_path_buf()),
        _ => AssetError::Io { path: path.to_path_buf(), source: e },
    })
}
