//! Software canvas backend
//!
//! Renders into an in-memory RGBA framebuffer using nearest-neighbour
//! sampling. Supports rotation, tinting and straight alpha blending, which is
//! everything the engine asks of a backend. The frame can be written out as a
//! PNG for screenshots.

use super::backend::{BackendError, BackendResult, Blit, RenderBackend, TextureHandle};
use crate::assets::ImageData;
use crate::foundation::math::Color;
use image::{ImageFormat, Rgba, RgbaImage};
use std::collections::HashMap;
use std::path::Path;

/// Framebuffer-backed render backend
pub struct SoftwareCanvas {
    target: RgbaImage,
    textures: HashMap<TextureHandle, RgbaImage>,
    next_id: u64,
    max_texture_size: u32,
}

impl SoftwareCanvas {
    /// Largest texture edge accepted by default
    pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 8192;

    /// Create a transparent canvas
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: RgbaImage::new(width, height),
            textures: HashMap::new(),
            next_id: 0,
            max_texture_size: Self::DEFAULT_MAX_TEXTURE_SIZE,
        }
    }

    /// Limit the size of accepted textures
    pub fn with_max_texture_size(mut self, max: u32) -> Self {
        self.max_texture_size = max;
        self
    }

    /// Fill the whole frame with one colour
    pub fn clear(&mut self, color: Color) {
        for pixel in self.target.pixels_mut() {
            *pixel = Rgba(color.to_array());
        }
    }

    /// Replace the framebuffer with a cleared one of a new size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.target = RgbaImage::new(width, height);
    }

    /// Current frame contents
    pub fn frame(&self) -> &RgbaImage {
        &self.target
    }

    /// Write the current frame as a PNG
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        self.target.save_with_format(path, ImageFormat::Png)
    }

    /// Number of live textures
    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }
}

impl RenderBackend for SoftwareCanvas {
    fn target_size(&self) -> (u32, u32) {
        self.target.dimensions()
    }

    fn create_texture(&mut self, image: &ImageData) -> BackendResult<TextureHandle> {
        if image.width > self.max_texture_size || image.height > self.max_texture_size {
            return Err(BackendError::TextureTooLarge {
                width: image.width,
                height: image.height,
                max: self.max_texture_size,
            });
        }
        if image.width == 0 || image.height == 0 {
            return Err(BackendError::Rejected("empty texture".to_string()));
        }

        let pixels = RgbaImage::from_raw(image.width, image.height, image.data.clone())
            .ok_or_else(|| BackendError::Rejected("pixel buffer does not match dimensions".to_string()))?;

        let handle = TextureHandle(self.next_id);
        self.next_id += 1;
        self.textures.insert(handle, pixels);
        log::trace!("Software canvas: created texture {:?} ({}x{})", handle, image.width, image.height);
        Ok(handle)
    }

    fn release_texture(&mut self, handle: TextureHandle) {
        self.textures.remove(&handle);
    }

    fn blit(&mut self, blit: &Blit) -> BackendResult<()> {
        let texture = self
            .textures
            .get(&blit.texture)
            .ok_or(BackendError::UnknownTexture(blit.texture))?;

        let dst = blit.dst;
        let src = blit.src;
        if dst.w <= 0.0 || dst.h <= 0.0 || src.w <= 0 || src.h <= 0 {
            return Ok(());
        }

        let center = dst.center();
        let half_w = dst.w * 0.5;
        let half_h = dst.h * 0.5;
        let (sin, cos) = blit.rotation.to_radians().sin_cos();

        // Axis-aligned bounds of the rotated destination rectangle
        let extent_x = half_w * cos.abs() + half_h * sin.abs();
        let extent_y = half_w * sin.abs() + half_h * cos.abs();
        let (target_w, target_h) = self.target.dimensions();
        let x0 = (center.x - extent_x).floor().clamp(0.0, target_w as f32) as u32;
        let x1 = (center.x + extent_x).ceil().clamp(0.0, target_w as f32) as u32;
        let y0 = (center.y - extent_y).floor().clamp(0.0, target_h as f32) as u32;
        let y1 = (center.y + extent_y).ceil().clamp(0.0, target_h as f32) as u32;

        let tint = blit.tint.to_array();

        for py in y0..y1 {
            for px in x0..x1 {
                let dx = px as f32 + 0.5 - center.x;
                let dy = py as f32 + 0.5 - center.y;

                // Undo the rotation to land in the unrotated destination rect
                let local_x = dx * cos + dy * sin;
                let local_y = -dx * sin + dy * cos;
                let u = (local_x + half_w) / dst.w;
                let v = (local_y + half_h) / dst.h;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }

                let sx = src.x + ((u * src.w as f32) as i32).min(src.w - 1);
                let sy = src.y + ((v * src.h as f32) as i32).min(src.h - 1);
                if sx < 0 || sy < 0 || sx as u32 >= texture.width() || sy as u32 >= texture.height() {
                    continue;
                }

                let texel = texture.get_pixel(sx as u32, sy as u32).0;
                let mut color = [0u8; 4];
                for (channel, value) in color.iter_mut().enumerate() {
                    *value = (u32::from(texel[channel]) * u32::from(tint[channel]) / 255) as u8;
                }

                blend_over(&mut self.target.get_pixel_mut(px, py).0, color);
            }
        }

        Ok(())
    }
}

/// Straight-alpha "source over" blend
fn blend_over(dst: &mut [u8; 4], src: [u8; 4]) {
    let src_alpha = u32::from(src[3]);
    if src_alpha == 0 {
        return;
    }
    let inv = 255 - src_alpha;
    for channel in 0..3 {
        dst[channel] = ((u32::from(src[channel]) * src_alpha + u32::from(dst[channel]) * inv) / 255) as u8;
    }
    dst[3] = (src_alpha + u32::from(dst[3]) * inv / 255) as u8;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{FRect, Rect};

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLUE: [u8; 4] = [0, 0, 255, 255];

    fn two_texel_texture(canvas: &mut SoftwareCanvas) -> TextureHandle {
        let mut data = Vec::new();
        data.extend_from_slice(&RED);
        data.extend_from_slice(&BLUE);
        canvas
            .create_texture(&ImageData { data, width: 2, height: 1 })
            .unwrap()
    }

    #[test]
    fn test_scaled_blit_fills_destination() {
        let mut canvas = SoftwareCanvas::new(4, 4);
        let texture = canvas
            .create_texture(&ImageData::solid_color(1, 1, RED))
            .unwrap();

        canvas
            .blit(&Blit {
                texture,
                src: Rect::new(0, 0, 1, 1),
                dst: FRect::new(1.0, 1.0, 2.0, 2.0),
                rotation: 0.0,
                tint: Color::WHITE,
            })
            .unwrap();

        let frame = canvas.frame();
        assert_eq!(frame.get_pixel(1, 1).0, RED);
        assert_eq!(frame.get_pixel(2, 2).0, RED);
        assert_eq!(frame.get_pixel(0, 0).0, [0, 0, 0, 0]);
        assert_eq!(frame.get_pixel(3, 3).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_rotated_blit_flips_texels() {
        let mut canvas = SoftwareCanvas::new(4, 4);
        let texture = two_texel_texture(&mut canvas);

        canvas
            .blit(&Blit {
                texture,
                src: Rect::new(0, 0, 2, 1),
                dst: FRect::new(1.0, 1.0, 2.0, 1.0),
                rotation: 180.0,
                tint: Color::WHITE,
            })
            .unwrap();

        let frame = canvas.frame();
        assert_eq!(frame.get_pixel(1, 1).0, BLUE);
        assert_eq!(frame.get_pixel(2, 1).0, RED);
    }

    #[test]
    fn test_tint_and_blend() {
        let mut canvas = SoftwareCanvas::new(1, 1);
        canvas.clear(Color::WHITE);
        let texture = canvas
            .create_texture(&ImageData::solid_color(1, 1, [255, 255, 255, 255]))
            .unwrap();

        canvas
            .blit(&Blit {
                texture,
                src: Rect::new(0, 0, 1, 1),
                dst: FRect::new(0.0, 0.0, 1.0, 1.0),
                rotation: 0.0,
                tint: Color::rgba(0, 0, 0, 255),
            })
            .unwrap();
        assert_eq!(canvas.frame().get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_oversized_texture_rejected() {
        let mut canvas = SoftwareCanvas::new(1, 1).with_max_texture_size(4);
        let result = canvas.create_texture(&ImageData::solid_color(8, 2, RED));
        assert_eq!(
            result,
            Err(BackendError::TextureTooLarge { width: 8, height: 2, max: 4 })
        );
        assert_eq!(canvas.texture_count(), 0);
    }

    #[test]
    fn test_unknown_texture() {
        let mut canvas = SoftwareCanvas::new(1, 1);
        let handle = two_texel_texture(&mut canvas);
        canvas.release_texture(handle);
        let err = canvas
            .blit(&Blit {
                texture: handle,
                src: Rect::new(0, 0, 1, 1),
                dst: FRect::new(0.0, 0.0, 1.0, 1.0),
                rotation: 0.0,
                tint: Color::WHITE,
            })
            .unwrap_err();
        assert_eq!(err, BackendError::UnknownTexture(handle));
    }
}
