//! Decoded images
//!
//! A `Bitmap` is immutable once built. Sprites, tilemaps and fonts share one
//! through `Rc<Bitmap>`; animations own their frames outright.

/// Packed-pixel image, row-major, origin top-left
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<u32>,
}

impl Bitmap {
    /// The zero-sized bitmap a failed decode degrades to. Drawing it is a no-op.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a bitmap from engine-packed pixels.
    /// Returns None if the pixel count does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u32>) -> Option<Self> {
        if pixels.len() == width as usize * height as usize {
            Some(Self {
                width,
                height,
                pixels,
            })
        } else {
            None
        }
    }

    /// Single-color bitmap
    pub fn solid(width: u32, height: u32, color: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
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
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    #[inline]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Bounds-checked texel read
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }
}
