use super::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::bitmap::Bitmap;
use crate::color::blend_over;
use crate::geometry::{distance, Vec2i};

// ============================================================================
// Sprite blit parameters
// ============================================================================

/// One sprite-frame blit: which part of which bitmap goes where
#[derive(Debug, Clone, Copy)]
pub struct SpriteBlit<'a> {
    pub bitmap: &'a Bitmap,
    /// Size of one frame inside `bitmap`
    pub frame_size: Vec2i,
    /// Column/row of the frame inside `bitmap`
    pub frame: Vec2i,
    /// Destination center (world space; the camera offset is subtracted)
    pub center: Vec2i,
    /// Destination half-size
    pub half_size: Vec2i,
    /// Mirror horizontally
    pub reversed: bool,
}

// ============================================================================
// PixelBuffer
// ============================================================================

/// Packed 32-bit framebuffer for software rendering.
/// Row-major, origin top-left, `pixels.len() == width * height` at all times.
pub struct PixelBuffer {
    pixels: Vec<u32>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Create a new pixel buffer with default resolution
    pub fn new() -> Self {
        Self::with_size(DEFAULT_WIDTH, DEFAULT_HEIGHT)
    }

    /// Create a new pixel buffer with custom resolution
    pub fn with_size(width: u32, height: u32) -> Self {
        Self {
            pixels: vec![0; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Reallocate for a new client size. Dimensions and storage change together,
    /// so a frame never sees a mismatched width/height pair.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        *self = Self::with_size(width, height);
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// True for a zero-area buffer (minimized window); every draw is a no-op
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Check if coordinates are within bounds
    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    #[inline]
    fn pixel_index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Fill the whole buffer with one color
    pub fn clear(&mut self, color: u32) {
        self.pixels.fill(color);
    }

    /// Set a single pixel (bounds checked)
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Read a pixel from the buffer (bounds checked)
    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        if self.in_bounds(x, y) {
            Some(self.pixels[self.pixel_index(x as u32, y as u32)])
        } else {
            None
        }
    }

    /// Composite one color over the pixel at (x, y) using its alpha byte
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, color: u32) {
        if self.in_bounds(x, y) {
            let idx = self.pixel_index(x as u32, y as u32);
            self.pixels[idx] = blend_over(self.pixels[idx], color);
        }
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Raw bytes for texture upload (native-endian packed words)
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    /// Clip a half-open box to the buffer. None when nothing is left.
    #[inline]
    fn clip(&self, x0: i32, y0: i32, x1: i32, y1: i32) -> Option<(i32, i32, i32, i32)> {
        let w = self.width as i32;
        let h = self.height as i32;
        let cx0 = x0.clamp(0, w);
        let cy0 = y0.clamp(0, h);
        let cx1 = x1.clamp(0, w);
        let cy1 = y1.clamp(0, h);
        if cx0 >= cx1 || cy0 >= cy1 {
            None
        } else {
            Some((cx0, cy0, cx1, cy1))
        }
    }

    // ========================================================================
    // Rectangles
    // ========================================================================

    /// Opaque filled rectangle given its center and half-size
    pub fn fill_rect(&mut self, center: Vec2i, half_size: Vec2i, color: u32) {
        let Some((x0, y0, x1, y1)) = self.clip(
            center.x - half_size.x,
            center.y - half_size.y,
            center.x + half_size.x,
            center.y + half_size.y,
        ) else {
            return;
        };

        for y in y0..y1 {
            let start = self.pixel_index(x0 as u32, y as u32);
            let end = start + (x1 - x0) as usize;
            self.pixels[start..end].fill(color);
        }
    }

    /// Filled rectangle with quarter-circle corner cuts.
    /// Corner geometry comes from the unclipped rectangle, so a partially
    /// visible rect keeps its corners where they are.
    pub fn fill_rounded_rect(&mut self, center: Vec2i, half_size: Vec2i, radius: i32, color: u32) {
        let rx0 = center.x - half_size.x;
        let ry0 = center.y - half_size.y;
        let rx1 = center.x + half_size.x;
        let ry1 = center.y + half_size.y;
        if rx1 <= rx0 || ry1 <= ry0 {
            return;
        }

        let radius = radius.min((rx1 - rx0) / 2).min((ry1 - ry0) / 2);
        if radius <= 0 {
            self.fill_rect(center, half_size, color);
            return;
        }

        let Some((x0, y0, x1, y1)) = self.clip(rx0, ry0, rx1, ry1) else {
            return;
        };

        let mid_x = (rx0 + rx1) / 2;
        let mid_y = (ry0 + ry1) / 2;

        for y in y0..y1 {
            let corner_row = y < ry0 + radius || y >= ry1 - radius;
            let cy = if y < mid_y { ry0 + radius } else { ry1 - 1 - radius };
            let mut idx = self.pixel_index(x0 as u32, y as u32);
            for x in x0..x1 {
                if corner_row && (x < rx0 + radius || x >= rx1 - radius) {
                    // Nearest corner is picked by which quadrant (x, y) falls in
                    let cx = if x < mid_x { rx0 + radius } else { rx1 - 1 - radius };
                    if distance(Vec2i::new(cx, cy), Vec2i::new(x, y)) > radius as f32 {
                        idx += 1;
                        continue;
                    }
                }
                self.pixels[idx] = color;
                idx += 1;
            }
        }
    }

    // ========================================================================
    // Bitmaps
    // ========================================================================

    /// Scale one frame of a bitmap into a destination box, alpha compositing
    /// every texel over what is already in the buffer.
    ///
    /// UV is measured from the unclipped box origin, so a sprite hanging off
    /// the left or top edge shows exactly the texels the unclipped blit would
    /// have put there.
    pub fn blit_sprite(&mut self, blit: &SpriteBlit, camera: Vec2i) {
        let src = blit.bitmap;
        let fw = blit.frame_size.x;
        let fh = blit.frame_size.y;
        if src.is_empty() || fw <= 0 || fh <= 0 {
            return;
        }

        let x0 = blit.center.x - blit.half_size.x - camera.x;
        let y0 = blit.center.y - blit.half_size.y - camera.y;
        let x1 = blit.center.x + blit.half_size.x - camera.x;
        let y1 = blit.center.y + blit.half_size.y - camera.y;

        // Zero or negative extent; also guards the divisions below
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let x_range = (x1 - x0) as f32;
        let y_range = (y1 - y0) as f32;

        let Some((x0c, y0c, x1c, y1c)) = self.clip(x0, y0, x1, y1) else {
            return;
        };
        let u_shift = (x0c - x0) as f32 / x_range;
        let v_shift = (y0c - y0) as f32 / y_range;

        for y in y0c..y1c {
            let v = (y - y0c) as f32 / y_range + v_shift;
            let sy = ((v + blit.frame.y as f32) * fh as f32) as i32;
            if sy < 0 || sy >= src.height() as i32 {
                continue;
            }

            let mut idx = self.pixel_index(x0c as u32, y as u32);
            for x in x0c..x1c {
                let u = (x - x0c) as f32 / x_range + u_shift;
                let texel = (u * fw as f32) as i32;
                let sx = if blit.reversed {
                    (blit.frame.x + 1) * fw - texel - 1
                } else {
                    texel + blit.frame.x * fw
                };

                if let Some(color) = src.pixel(sx, sy) {
                    self.pixels[idx] = blend_over(self.pixels[idx], color);
                }
                idx += 1;
            }
        }
    }

    /// Blit one glyph cell of a font strip. Indices outside the strip draw nothing.
    pub fn blit_letter(
        &mut self,
        font: &Bitmap,
        letter_size: Vec2i,
        index: i32,
        center: Vec2i,
        half_size: Vec2i,
        camera: Vec2i,
    ) {
        if letter_size.x <= 0 || index < 0 || index >= font.width() as i32 / letter_size.x {
            return;
        }
        self.blit_sprite(
            &SpriteBlit {
                bitmap: font,
                frame_size: letter_size,
                frame: Vec2i::new(index, 0),
                center,
                half_size,
                reversed: false,
            },
            camera,
        );
    }
}

impl Default for PixelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{pack, rgb};

    const BG: u32 = 0x0010_2030;

    /// 8x1 strip where texel i has red channel i * 10, fully opaque
    fn gradient_strip() -> Bitmap {
        let pixels = (0..8).map(|i| rgb(i * 10, 0, 0)).collect();
        Bitmap::from_pixels(8, 1, pixels).unwrap()
    }

    fn red_at(buffer: &PixelBuffer, x: i32, y: i32) -> u8 {
        (buffer.get_pixel(x, y).unwrap() >> 16) as u8
    }

    #[test]
    fn test_resize_keeps_length_invariant() {
        let mut buffer = PixelBuffer::with_size(4, 3);
        assert_eq!(buffer.pixels().len(), 12);
        buffer.resize(10, 7);
        assert_eq!(buffer.size(), (10, 7));
        assert_eq!(buffer.pixels().len(), 70);
        buffer.resize(0, 0);
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_pixel_access_is_bounds_checked() {
        let mut buffer = PixelBuffer::with_size(2, 2);
        buffer.set_pixel(1, 1, 5);
        buffer.set_pixel(2, 0, 5);
        buffer.set_pixel(-1, 0, 5);
        assert_eq!(buffer.get_pixel(1, 1), Some(5));
        assert_eq!(buffer.get_pixel(2, 0), None);
        assert_eq!(buffer.pixels().iter().filter(|&&p| p == 5).count(), 1);

        buffer.blend_pixel(0, 0, pack(255, 255, 255, 255));
        assert_eq!(buffer.get_pixel(0, 0), Some(0x00ff_ffff));
        assert_eq!(PixelBuffer::new().size(), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
    }

    #[test]
    fn test_fill_rect_clips_and_overwrites() {
        let mut buffer = PixelBuffer::with_size(10, 10);
        buffer.clear(BG);
        buffer.fill_rect(Vec2i::new(0, 0), Vec2i::new(3, 3), 0x00ff_0000);
        assert_eq!(buffer.get_pixel(0, 0), Some(0x00ff_0000));
        assert_eq!(buffer.get_pixel(2, 2), Some(0x00ff_0000));
        assert_eq!(buffer.get_pixel(3, 3), Some(BG));
    }

    #[test]
    fn test_fill_rect_fully_outside_is_noop() {
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(BG);
        buffer.fill_rect(Vec2i::new(-50, 2), Vec2i::new(3, 3), 1);
        buffer.fill_rect(Vec2i::new(2, 2), Vec2i::new(0, 5), 1);
        assert!(buffer.pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn test_rounded_rect_cuts_corners_only() {
        let mut buffer = PixelBuffer::with_size(20, 20);
        buffer.clear(BG);
        buffer.fill_rounded_rect(Vec2i::new(10, 10), Vec2i::new(8, 8), 4, 7);
        // Corners untouched
        assert_eq!(buffer.get_pixel(2, 2), Some(BG));
        assert_eq!(buffer.get_pixel(17, 2), Some(BG));
        assert_eq!(buffer.get_pixel(2, 17), Some(BG));
        assert_eq!(buffer.get_pixel(17, 17), Some(BG));
        // Edge midpoints and center filled
        assert_eq!(buffer.get_pixel(10, 2), Some(7));
        assert_eq!(buffer.get_pixel(2, 10), Some(7));
        assert_eq!(buffer.get_pixel(10, 10), Some(7));
        // Inside the corner arc
        assert_eq!(buffer.get_pixel(5, 5), Some(7));
    }

    #[test]
    fn test_rounded_rect_zero_radius_matches_fill_rect() {
        let mut a = PixelBuffer::with_size(12, 12);
        let mut b = PixelBuffer::with_size(12, 12);
        a.fill_rounded_rect(Vec2i::new(6, 6), Vec2i::new(4, 3), 0, 9);
        b.fill_rect(Vec2i::new(6, 6), Vec2i::new(4, 3), 9);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_blit_scales_frame_into_box() {
        let strip = gradient_strip();
        let mut buffer = PixelBuffer::with_size(16, 2);
        buffer.clear(BG);
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &strip,
                frame_size: Vec2i::new(8, 1),
                frame: Vec2i::ZERO,
                center: Vec2i::new(8, 1),
                half_size: Vec2i::new(8, 1),
                reversed: false,
            },
            Vec2i::ZERO,
        );
        // Each texel covers two destination pixels
        for x in 0..16 {
            assert_eq!(red_at(&buffer, x, 0), (x / 2) as u8 * 10);
        }
    }

    #[test]
    fn test_blit_reversed_mirrors() {
        let strip = gradient_strip();
        let mut buffer = PixelBuffer::with_size(8, 1);
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &strip,
                frame_size: Vec2i::new(8, 1),
                frame: Vec2i::ZERO,
                center: Vec2i::new(4, 0),
                half_size: Vec2i::new(4, 1),
                reversed: true,
            },
            Vec2i::ZERO,
        );
        for x in 0..8 {
            assert_eq!(red_at(&buffer, x, 0), (7 - x) as u8 * 10);
        }
    }

    #[test]
    fn test_blit_clipping_is_continuous() {
        let strip = gradient_strip();
        let blit = |center: Vec2i| SpriteBlit {
            bitmap: &strip,
            frame_size: Vec2i::new(8, 1),
            frame: Vec2i::ZERO,
            center,
            half_size: Vec2i::new(8, 1),
            reversed: false,
        };

        // Reference: the whole 16-pixel sprite fits in a wide buffer
        let mut wide = PixelBuffer::with_size(32, 1);
        wide.blit_sprite(&blit(Vec2i::new(8, 0)), Vec2i::ZERO);

        // Same sprite hanging 6 pixels off the left edge
        let mut narrow = PixelBuffer::with_size(32, 1);
        narrow.blit_sprite(&blit(Vec2i::new(2, 0)), Vec2i::ZERO);
        for x in 0..10 {
            assert_eq!(
                narrow.get_pixel(x, 0),
                wide.get_pixel(x + 6, 0),
                "pixel {} shifted by clipping",
                x
            );
        }

        // Camera offset clipping the top edge behaves the same vertically
        let column = Bitmap::from_pixels(1, 4, (0..4).map(|i| rgb(0, i * 50, 0)).collect()).unwrap();
        let mut tall = PixelBuffer::with_size(1, 8);
        let vblit = SpriteBlit {
            bitmap: &column,
            frame_size: Vec2i::new(1, 4),
            frame: Vec2i::ZERO,
            center: Vec2i::new(0, 4),
            half_size: Vec2i::new(1, 4),
            reversed: false,
        };
        tall.blit_sprite(&vblit, Vec2i::ZERO);
        let mut shifted = PixelBuffer::with_size(1, 8);
        shifted.blit_sprite(&vblit, Vec2i::new(0, 2));
        for y in 0..6 {
            assert_eq!(shifted.get_pixel(0, y), tall.get_pixel(0, y + 2));
        }
    }

    #[test]
    fn test_blit_clipping_on_two_edges_at_once() {
        // Every texel distinct in both axes
        let pixels = (0..16).map(|i| rgb((i % 4) as u8 * 60, (i / 4) as u8 * 60, 7)).collect();
        let grid = Bitmap::from_pixels(4, 4, pixels).unwrap();
        let blit = |center: Vec2i| SpriteBlit {
            bitmap: &grid,
            frame_size: Vec2i::new(4, 4),
            frame: Vec2i::ZERO,
            center,
            half_size: Vec2i::new(4, 4),
            reversed: false,
        };

        // Reference: the 8x8 sprite drawn whole, top-left at (8, 8)
        let mut whole = PixelBuffer::with_size(24, 24);
        whole.blit_sprite(&blit(Vec2i::new(12, 12)), Vec2i::ZERO);

        // Top-left at (-3, -3): clipped on the left and top edges
        let mut corner = PixelBuffer::with_size(10, 10);
        corner.blit_sprite(&blit(Vec2i::new(1, 1)), Vec2i::ZERO);
        for y in 0..5 {
            for x in 0..5 {
                assert_eq!(
                    corner.get_pixel(x, y),
                    whole.get_pixel(x + 11, y + 11),
                    "top-left clip shifted pixel ({}, {})",
                    x,
                    y
                );
            }
        }

        // Top-left at (5, 5): clipped on the right and bottom edges
        let mut corner = PixelBuffer::with_size(10, 10);
        corner.blit_sprite(&blit(Vec2i::new(9, 9)), Vec2i::ZERO);
        for y in 5..10 {
            for x in 5..10 {
                assert_eq!(
                    corner.get_pixel(x, y),
                    whole.get_pixel(x + 3, y + 3),
                    "bottom-right clip shifted pixel ({}, {})",
                    x,
                    y
                );
            }
        }
    }

    #[test]
    fn test_blit_alpha_blends_over_destination() {
        let bmp = Bitmap::from_pixels(
            3,
            1,
            vec![pack(200, 100, 50, 255), pack(200, 100, 50, 0), pack(255, 255, 255, 128)],
        )
        .unwrap();
        let mut buffer = PixelBuffer::with_size(3, 1);
        buffer.clear(pack(0, 0, 0, 0));
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &bmp,
                frame_size: Vec2i::new(3, 1),
                frame: Vec2i::ZERO,
                center: Vec2i::new(1, 0),
                half_size: Vec2i::new(1, 1),
                reversed: false,
            },
            Vec2i::new(-1, -1),
        );
        // Box is x in [1, 3) after the camera shift; pixel 0 keeps its color
        assert_eq!(buffer.get_pixel(0, 0), Some(0));
        assert_eq!(buffer.get_pixel(1, 0), Some(pack(200, 100, 50, 0)));
        assert_eq!(buffer.get_pixel(2, 0), Some(0));

        let mut direct = PixelBuffer::with_size(3, 1);
        direct.clear(rgb(10, 20, 30) & 0x00ff_ffff);
        direct.blit_sprite(
            &SpriteBlit {
                bitmap: &bmp,
                frame_size: Vec2i::new(3, 1),
                frame: Vec2i::ZERO,
                center: Vec2i::new(1, 0),
                half_size: Vec2i::new(2, 1),
                reversed: false,
            },
            Vec2i::ZERO,
        );
        // Box is x in [-1, 3): pixel 0 samples texel 0 (u = 1/4 * 3 = 0.75)
        assert_eq!(direct.get_pixel(0, 0), Some(pack(200, 100, 50, 0)));
        // Pixel 1 samples texel 1, fully transparent
        assert_eq!(direct.get_pixel(1, 0), Some(pack(10, 20, 30, 0)));
        // Pixel 2 samples texel 2 at alpha 128
        let (r, g, b, _) = crate::color::unpack(direct.get_pixel(2, 0).unwrap());
        assert!((r as i32 - 133).abs() <= 1);
        assert!((g as i32 - 138).abs() <= 1);
        assert!((b as i32 - 143).abs() <= 1);
    }

    #[test]
    fn test_blit_degenerate_inputs_are_noops() {
        let strip = gradient_strip();
        let empty = Bitmap::empty();
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(BG);

        let base = SpriteBlit {
            bitmap: &strip,
            frame_size: Vec2i::new(8, 1),
            frame: Vec2i::ZERO,
            center: Vec2i::new(2, 2),
            half_size: Vec2i::new(0, 2),
            reversed: false,
        };
        buffer.blit_sprite(&base, Vec2i::ZERO);
        buffer.blit_sprite(
            &SpriteBlit {
                half_size: Vec2i::new(-3, 2),
                ..base
            },
            Vec2i::ZERO,
        );
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &empty,
                half_size: Vec2i::new(2, 2),
                ..base
            },
            Vec2i::ZERO,
        );
        buffer.blit_sprite(
            &SpriteBlit {
                frame_size: Vec2i::ZERO,
                half_size: Vec2i::new(2, 2),
                ..base
            },
            Vec2i::ZERO,
        );
        assert!(buffer.pixels().iter().all(|&p| p == BG));

        let mut nothing = PixelBuffer::with_size(0, 0);
        nothing.blit_sprite(
            &SpriteBlit {
                half_size: Vec2i::new(2, 2),
                ..base
            },
            Vec2i::ZERO,
        );
        nothing.fill_rect(Vec2i::ZERO, Vec2i::new(5, 5), 1);
        assert!(nothing.is_empty());
    }

    #[test]
    fn test_blit_frame_outside_sheet_reads_nothing() {
        let strip = gradient_strip();
        let mut buffer = PixelBuffer::with_size(4, 4);
        buffer.clear(BG);
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &strip,
                frame_size: Vec2i::new(4, 1),
                frame: Vec2i::new(5, 3),
                center: Vec2i::new(2, 2),
                half_size: Vec2i::new(2, 2),
                reversed: false,
            },
            Vec2i::ZERO,
        );
        assert!(buffer.pixels().iter().all(|&p| p == BG));
    }

    #[test]
    fn test_blit_letter_selects_cell() {
        // Two 2x1 cells: cell 0 red, cell 1 green
        let font = Bitmap::from_pixels(
            4,
            1,
            vec![rgb(255, 0, 0), rgb(255, 0, 0), rgb(0, 255, 0), rgb(0, 255, 0)],
        )
        .unwrap();
        let mut buffer = PixelBuffer::with_size(2, 1);
        buffer.blit_letter(&font, Vec2i::new(2, 1), 1, Vec2i::new(1, 0), Vec2i::new(1, 1), Vec2i::ZERO);
        assert_eq!(buffer.get_pixel(0, 0), Some(0x0000_ff00));
        assert_eq!(buffer.get_pixel(1, 0), Some(0x0000_ff00));

        buffer.clear(BG);
        buffer.blit_letter(&font, Vec2i::new(2, 1), 2, Vec2i::new(1, 0), Vec2i::new(1, 1), Vec2i::ZERO);
        buffer.blit_letter(&font, Vec2i::new(2, 1), -3, Vec2i::new(1, 0), Vec2i::new(1, 1), Vec2i::ZERO);
        assert!(buffer.pixels().iter().all(|&p| p == BG));
    }
}
