//! # Core Engine Module
//!
//! Shared configuration for every engine subsystem.
//!
//! ## Organization
//!
//! - **Config**: Window, asset folder and logging configuration
//! - **Settings**: Persisted user settings (volumes, fullscreen)

pub mod config;

// Re-export commonly used config types
pub use config::{
    AssetConfig,
    AssetKind,
    EngineConfig,
    Settings,
    WindowConfig,
    Config,
    ConfigError,
};
