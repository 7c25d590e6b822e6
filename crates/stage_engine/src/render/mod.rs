//! # Rendering System
//!
//! Backend-agnostic drawing for the engine.
//!
//! ## Architecture
//!
//! - **Backend**: [`RenderBackend`] trait, the only thing that touches pixels
//! - **Dispatcher**: [`DrawDispatcher`], one logical draw command to one scaled blit
//! - **Software canvas**: framebuffer backend with PNG export
//! - **Recording backend**: captures blits for headless runs and tests

pub mod backend;
pub mod dispatch;
pub mod recording;
pub mod software;
pub mod texture;

pub use backend::{BackendError, BackendResult, Blit, RenderBackend, TextureHandle};
pub use dispatch::{DrawCommand, DrawDispatcher};
pub use recording::RecordingBackend;
pub use software::SoftwareCanvas;
pub use texture::{Texture, TextureId};
