//! Math utilities and types
//!
//! Provides the small set of 2D types shared by the registries, the text
//! layout engine and the render backends, plus a few scalar helpers.

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use nalgebra::Vector2;

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// Integer rectangle in texture (pixel) space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub w: i32,
    /// Height in pixels
    pub h: i32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (exclusive)
    pub const fn right(&self) -> i64 {
        self.x as i64 + self.w as i64
    }

    /// Bottom edge (exclusive)
    pub const fn bottom(&self) -> i64 {
        self.y as i64 + self.h as i64
    }

    /// Whether the rectangle lies inside a `width` x `height` image
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.w >= 0
            && self.h >= 0
            && self.right() <= i64::from(width)
            && self.bottom() <= i64::from(height)
    }
}

/// Floating point rectangle in destination space
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl FRect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Centre point of the rectangle
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w * 0.5, self.y + self.h * 0.5)
    }
}

/// 8-bit RGBA colour used for tints
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha
    pub a: u8,
}

impl Color {
    /// Opaque white (no tint)
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque black
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);

    /// Create a colour from its components
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// The same colour with a different alpha
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Components as an array, in RGBA order
    pub const fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Linear interpolation between `start` and `end`
pub fn lerp(start: f32, end: f32, val: f32) -> f32 {
    start + (end - start) * val
}

/// Sign of `x` as -1.0, 0.0 or 1.0
///
/// Unlike [`f32::signum`], zero maps to zero.
pub fn fsign(x: f32) -> f32 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Random integer in the inclusive range `[min, max]`
///
/// The bounds may be given in either order.
pub fn rand_int(min: i32, max: i32) -> i32 {
    let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
    rand::thread_rng().gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_lerp() {
        assert_relative_eq!(lerp(0.0, 10.0, 0.5), 5.0);
        assert_relative_eq!(lerp(2.0, 4.0, 0.0), 2.0);
        assert_relative_eq!(lerp(2.0, 4.0, 1.0), 4.0);
    }

    #[test]
    fn test_fsign() {
        assert_eq!(fsign(3.5), 1.0);
        assert_eq!(fsign(-0.1), -1.0);
        assert_eq!(fsign(0.0), 0.0);
    }

    #[test]
    fn test_rand_int_bounds() {
        for _ in 0..100 {
            let v = rand_int(3, 5);
            assert!((3..=5).contains(&v));
        }
        assert_eq!(rand_int(7, 7), 7);
        let swapped = rand_int(5, 3);
        assert!((3..=5).contains(&swapped));
    }

    #[test]
    fn test_rect_fits_within() {
        assert!(Rect::new(0, 0, 8, 8).fits_within(8, 8));
        assert!(!Rect::new(1, 0, 8, 8).fits_within(8, 8));
        assert!(!Rect::new(-1, 0, 2, 2).fits_within(8, 8));
        assert!(!Rect::new(0, 0, -2, 2).fits_within(8, 8));
    }

    #[test]
    fn test_rect_edges_at_i32_limits() {
        let rect = Rect::new(i32::MAX, i32::MAX, 1, 1);
        assert_eq!(rect.right(), i64::from(i32::MAX) + 1);
        assert!(!rect.fits_within(u32::MAX, u32::MAX));
        assert!(Rect::new(0, 0, i32::MAX, 1).fits_within(u32::MAX, 1));
    }
}
