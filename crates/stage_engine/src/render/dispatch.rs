//! Draw dispatcher
//!
//! Turns one [`DrawCommand`] expressed in logical window coordinates into
//! exactly one backend blit. The only state is the logical-to-target scale,
//! so games can draw against a fixed logical resolution whatever the real
//! window size is.

use super::backend::{BackendResult, Blit, RenderBackend, TextureHandle};
use crate::foundation::math::{Color, FRect, Rect, Vec2};

/// One draw request in logical coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    /// Source texture
    pub texture: TextureHandle,
    /// Source rectangle in texture pixels
    pub src: Rect,
    /// Top-left destination corner
    pub position: Vec2,
    /// Destination size
    pub size: Vec2,
    /// Clockwise rotation in degrees about the destination centre
    pub rotation: f32,
    /// Colour modulation
    pub tint: Color,
}

/// Logical-to-target scaling for draw calls
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawDispatcher {
    logical_size: Vec2,
    scale: Vec2,
}

impl DrawDispatcher {
    /// Create a dispatcher for a logical resolution and a target size
    pub fn new(logical_width: f32, logical_height: f32, target: (u32, u32)) -> Self {
        let mut dispatcher = Self {
            logical_size: Vec2::new(logical_width, logical_height),
            scale: Vec2::new(1.0, 1.0),
        };
        dispatcher.resize(target);
        dispatcher
    }

    /// Recompute the scale after the target changed size
    pub fn resize(&mut self, target: (u32, u32)) {
        self.scale = Vec2::new(
            target.0 as f32 / self.logical_size.x,
            target.1 as f32 / self.logical_size.y,
        );
        log::debug!(
            "Draw scale {:.3}x{:.3} for target {}x{}",
            self.scale.x,
            self.scale.y,
            target.0,
            target.1
        );
    }

    /// Horizontal logical-to-target factor
    pub fn scale_x(&self) -> f32 {
        self.scale.x
    }

    /// Vertical logical-to-target factor
    pub fn scale_y(&self) -> f32 {
        self.scale.y
    }

    /// Logical resolution
    pub fn logical_size(&self) -> Vec2 {
        self.logical_size
    }

    /// Map a logical rectangle to target pixels
    pub fn to_target(&self, position: Vec2, size: Vec2) -> FRect {
        FRect::new(
            position.x * self.scale.x,
            position.y * self.scale.y,
            size.x * self.scale.x,
            size.y * self.scale.y,
        )
    }

    /// Issue one backend blit for `command`
    pub fn submit<B: RenderBackend + ?Sized>(&self, backend: &mut B, command: &DrawCommand) -> BackendResult<()> {
        backend.blit(&Blit {
            texture: command.texture,
            src: command.src,
            dst: self.to_target(command.position, command.size),
            rotation: command.rotation,
            tint: command.tint,
        })
    }
}
