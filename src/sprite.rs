//! Drawable entities
//!
//! Everything the compositor can draw is one variant of [`Drawable`]. Gameplay
//! keeps a [`SpriteRef`] to the entities it mutates between frames and hands a
//! clone of the handle to the render queue each frame.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use crate::assets;
use crate::bitmap::Bitmap;
use crate::display::{PixelBuffer, SpriteBlit};
use crate::error::{Error, Result};
use crate::geometry::Vec2i;
use crate::text::Text;

/// Shared, mutable handle to a drawable
pub type SpriteRef = Rc<RefCell<Drawable>>;

/// Wrap a drawable in a shared handle
pub fn share(drawable: impl Into<Drawable>) -> SpriteRef {
    Rc::new(RefCell::new(drawable.into()))
}

fn bitmap_size(bitmap: &Bitmap) -> Vec2i {
    Vec2i::new(bitmap.width() as i32, bitmap.height() as i32)
}

/// Draw-order anchor shared by every sprite kind
fn ground_anchor(position: Vec2i, size: Vec2i, scale: f32, center_offset: i32) -> i32 {
    position.y - (size.y as f32 * scale) as i32 + (center_offset as f32 * scale * 2.0) as i32
}

// ============================================================================
// Rect
// ============================================================================

/// Flat-colored box. A positive radius rounds the corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub position: Vec2i,
    pub half_size: Vec2i,
    pub color: u32,
    pub radius: i32,
}

impl Rect {
    pub fn new(position: Vec2i, half_size: Vec2i, color: u32) -> Self {
        Self {
            position,
            half_size,
            color,
            radius: 0,
        }
    }

    pub fn rounded(position: Vec2i, half_size: Vec2i, radius: i32, color: u32) -> Self {
        Self {
            position,
            half_size,
            color,
            radius,
        }
    }

    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        let center = self.position - camera;
        if self.radius > 0 {
            buffer.fill_rounded_rect(center, self.half_size, self.radius, self.color);
        } else {
            buffer.fill_rect(center, self.half_size, self.color);
        }
    }
}

// ============================================================================
// Sprite
// ============================================================================

/// A single image drawn centered on `position`, scaled by `scale`
#[derive(Debug, Clone)]
pub struct Sprite {
    pub position: Vec2i,
    /// Image dimensions
    size: Vec2i,
    pub scale: f32,
    image: Rc<Bitmap>,
    pub reversed: bool,
    /// Shifts the draw-order anchor only; never the drawn position
    pub center_offset: i32,
    pub last_layer: bool,
}

impl Sprite {
    pub fn new(position: Vec2i, scale: f32, image: Rc<Bitmap>) -> Self {
        Self {
            position,
            size: Vec2i::new(image.width() as i32, image.height() as i32),
            scale,
            image,
            reversed: false,
            center_offset: 0,
            last_layer: false,
        }
    }

    pub fn with_center_offset(mut self, offset: i32) -> Self {
        self.center_offset = offset;
        self
    }

    pub fn with_reversed(mut self, reversed: bool) -> Self {
        self.reversed = reversed;
        self
    }

    pub fn size(&self) -> Vec2i {
        self.size
    }

    /// On-screen half-size: the image is drawn at twice its scaled size
    pub fn half_size(&self) -> Vec2i {
        self.size * self.scale
    }

    pub fn image(&self) -> &Rc<Bitmap> {
        &self.image
    }

    pub fn set_image(&mut self, image: Rc<Bitmap>) {
        self.size = Vec2i::new(image.width() as i32, image.height() as i32);
        self.image = image;
    }

    pub fn ground_anchor(&self) -> i32 {
        ground_anchor(self.position, self.size, self.scale, self.center_offset)
    }

    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: &self.image,
                frame_size: self.size,
                frame: Vec2i::ZERO,
                center: self.position,
                half_size: self.half_size(),
                reversed: self.reversed,
            },
            camera,
        );
    }
}

// ============================================================================
// Animation
// ============================================================================

/// An immutable sequence of equally sized frames
#[derive(Debug, Clone)]
pub struct Animation {
    frames: Vec<Bitmap>,
    fps: u32,
    looping: bool,
    return_to_default: bool,
    frame_size: Vec2i,
}

impl Animation {
    /// Build from decoded frames. The first frame sets the frame size and
    /// every other frame must match it.
    pub fn new(frames: Vec<Bitmap>, fps: u32, looping: bool, return_to_default: bool) -> Result<Self> {
        let first = frames.first().ok_or(Error::NoFrames)?;
        let frame_size = bitmap_size(first);
        if let Some((index, found)) = frames
            .iter()
            .map(bitmap_size)
            .enumerate()
            .find(|&(_, size)| size != frame_size)
        {
            return Err(Error::FrameSizeMismatch {
                index,
                expected: frame_size,
                found,
            });
        }
        Ok(Self {
            frames,
            fps: fps.max(1),
            looping,
            return_to_default,
            frame_size,
        })
    }

    /// Load `0.png, 1.png, ...` from a folder
    pub fn from_folder(
        path: impl AsRef<Path>,
        fps: u32,
        looping: bool,
        return_to_default: bool,
    ) -> Result<Self> {
        let path = path.as_ref();
        let frames = assets::load_image_folder(path)?;
        Self::new(frames, fps, looping, return_to_default).map_err(|e| match e {
            Error::NoFrames => Error::EmptyAnimation(path.to_path_buf()),
            e => {
                log::warn!("Rejecting animation {}: {}", path.display(), e);
                e
            },
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }

    /// Seconds each frame stays on screen
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps as f32
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn returns_to_default(&self) -> bool {
        self.return_to_default
    }

    pub fn frame_size(&self) -> Vec2i {
        self.frame_size
    }

    /// Frame at `index`, clamped to the last frame
    pub fn frame(&self, index: usize) -> &Bitmap {
        &self.frames[index.min(self.frames.len() - 1)]
    }
}

// ============================================================================
// AnimatedSprite
// ============================================================================

/// Sprite that cycles through the frames of one of several animations.
/// Animation 0 is the default state.
#[derive(Debug, Clone)]
pub struct AnimatedSprite {
    pub position: Vec2i,
    pub scale: f32,
    pub reversed: bool,
    pub center_offset: i32,
    pub last_layer: bool,
    animations: Vec<Animation>,
    animation: usize,
    frame: usize,
    elapsed: f32,
    frame_duration: f32,
}

impl AnimatedSprite {
    pub fn new(position: Vec2i, scale: f32, animations: Vec<Animation>) -> Result<Self> {
        let first = animations.first().ok_or(Error::NoAnimations)?;
        let frame_duration = first.frame_duration();
        Ok(Self {
            position,
            scale,
            reversed: false,
            center_offset: 0,
            last_layer: false,
            animations,
            animation: 0,
            frame: 0,
            elapsed: 0.0,
            frame_duration,
        })
    }

    fn current(&self) -> &Animation {
        &self.animations[self.animation]
    }

    pub fn animation_index(&self) -> usize {
        self.animation
    }

    pub fn frame_index(&self) -> usize {
        self.frame
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Frame size of the current animation
    pub fn size(&self) -> Vec2i {
        self.current().frame_size()
    }

    pub fn half_size(&self) -> Vec2i {
        self.size() * self.scale
    }

    /// Switch to another animation, restarting it.
    /// Requesting the playing animation changes nothing.
    pub fn set_animation(&mut self, index: usize) {
        if index == self.animation {
            return;
        }
        if index >= self.animations.len() {
            log::warn!(
                "Animation index {} out of range ({} animations)",
                index,
                self.animations.len()
            );
            return;
        }
        self.animation = index;
        self.frame = 0;
        self.elapsed = 0.0;
        self.frame_duration = self.current().frame_duration();
    }

    /// Accumulate frame time and step at most one frame
    pub fn advance_animation(&mut self, dt: f32) {
        self.elapsed += dt;
        if self.elapsed < self.frame_duration {
            return;
        }
        self.elapsed = 0.0;

        let count = self.current().frame_count();
        self.frame = (self.frame + 1) % count;

        if self.frame == 0 && !self.current().is_looping() {
            if self.current().returns_to_default() {
                self.set_animation(0);
            } else {
                self.frame = count - 1;
            }
        }
    }

    pub fn ground_anchor(&self) -> i32 {
        ground_anchor(self.position, self.size(), self.scale, self.center_offset)
    }

    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        let animation = self.current();
        buffer.blit_sprite(
            &SpriteBlit {
                bitmap: animation.frame(self.frame),
                frame_size: animation.frame_size(),
                frame: Vec2i::ZERO,
                center: self.position,
                half_size: self.half_size(),
                reversed: self.reversed,
            },
            camera,
        );
    }
}

// ============================================================================
// Tilemap
// ============================================================================

/// Grid of cells drawn from a tile sheet. Always on the last layer.
#[derive(Debug, Clone)]
pub struct Tilemap {
    /// Center of the top-left cell
    pub position: Vec2i,
    pub scale: f32,
    sheet: Rc<Bitmap>,
    tile_size: Vec2i,
    /// Row-major tile indices, `-1` for an empty cell
    cells: Vec<i32>,
    grid: Vec2i,
}

impl Tilemap {
    pub const EMPTY: i32 = -1;

    pub fn new(position: Vec2i, scale: f32, sheet: Rc<Bitmap>, tile_size: Vec2i, cells: Vec<i32>, grid: Vec2i) -> Self {
        Self {
            position,
            scale,
            sheet,
            tile_size,
            cells,
            grid,
        }
    }

    pub fn set_cells(&mut self, cells: Vec<i32>, grid: Vec2i) {
        self.cells = cells;
        self.grid = grid;
    }

    pub fn cell(&self, x: i32, y: i32) -> Option<i32> {
        if x < 0 || y < 0 || x >= self.grid.x || y >= self.grid.y {
            return None;
        }
        self.cells.get((y * self.grid.x + x) as usize).copied()
    }

    /// Sheet column/row of a tile index
    fn sheet_cell(&self, index: i32) -> Option<Vec2i> {
        if self.tile_size.x <= 0 {
            return None;
        }
        let columns = self.sheet.width() as i32 / self.tile_size.x;
        if columns <= 0 {
            return None;
        }
        Some(Vec2i::new(index % columns, index / columns))
    }

    pub fn ground_anchor(&self) -> i32 {
        ground_anchor(self.position, self.tile_size, self.scale, 0)
    }

    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        let half_size = self.tile_size * self.scale;
        for y in 0..self.grid.y {
            for x in 0..self.grid.x {
                let Some(index) = self.cell(x, y).filter(|&i| i != Self::EMPTY) else {
                    continue;
                };
                let Some(frame) = self.sheet_cell(index) else {
                    continue;
                };
                let offset = Vec2i::new(half_size.x * x * 2, half_size.y * y * 2);
                buffer.blit_sprite(
                    &SpriteBlit {
                        bitmap: &self.sheet,
                        frame_size: self.tile_size,
                        frame,
                        center: self.position + offset,
                        half_size,
                        reversed: false,
                    },
                    camera,
                );
            }
        }
    }
}

// ============================================================================
// Drawable
// ============================================================================

#[derive(Debug, Clone)]
pub enum Drawable {
    Rect(Rect),
    Sprite(Sprite),
    Animated(AnimatedSprite),
    Tilemap(Tilemap),
    Text(Text),
}

impl Drawable {
    pub fn draw(&self, buffer: &mut PixelBuffer, camera: Vec2i) {
        match self {
            Drawable::Rect(r) => r.draw(buffer, camera),
            Drawable::Sprite(s) => s.draw(buffer, camera),
            Drawable::Animated(a) => a.draw(buffer, camera),
            Drawable::Tilemap(t) => t.draw(buffer, camera),
            Drawable::Text(t) => t.draw(buffer, camera),
        }
    }

    pub fn advance_animation(&mut self, dt: f32) {
        if let Drawable::Animated(a) = self {
            a.advance_animation(dt);
        }
    }

    pub fn ground_anchor(&self) -> i32 {
        match self {
            Drawable::Rect(r) => r.position.y - r.half_size.y,
            Drawable::Sprite(s) => s.ground_anchor(),
            Drawable::Animated(a) => a.ground_anchor(),
            Drawable::Tilemap(t) => t.ground_anchor(),
            Drawable::Text(t) => t.position.y,
        }
    }

    pub fn last_layer(&self) -> bool {
        match self {
            Drawable::Sprite(s) => s.last_layer,
            Drawable::Animated(a) => a.last_layer,
            Drawable::Tilemap(_) => true,
            Drawable::Rect(_) | Drawable::Text(_) => false,
        }
    }

    pub fn position(&self) -> Vec2i {
        match self {
            Drawable::Rect(r) => r.position,
            Drawable::Sprite(s) => s.position,
            Drawable::Animated(a) => a.position,
            Drawable::Tilemap(t) => t.position,
            Drawable::Text(t) => t.position,
        }
    }

    pub fn set_position(&mut self, position: Vec2i) {
        match self {
            Drawable::Rect(r) => r.position = position,
            Drawable::Sprite(s) => s.position = position,
            Drawable::Animated(a) => a.position = position,
            Drawable::Tilemap(t) => t.position = position,
            Drawable::Text(t) => t.position = position,
        }
    }

    pub fn as_animated_mut(&mut self) -> Option<&mut AnimatedSprite> {
        match self {
            Drawable::Animated(a) => Some(a),
            _ => None,
        }
    }
}

impl From<Rect> for Drawable {
    fn from(r: Rect) -> Self {
        Drawable::Rect(r)
    }
}

impl From<Sprite> for Drawable {
    fn from(s: Sprite) -> Self {
        Drawable::Sprite(s)
    }
}

impl From<AnimatedSprite> for Drawable {
    fn from(a: AnimatedSprite) -> Self {
        Drawable::Animated(a)
    }
}

impl From<Tilemap> for Drawable {
    fn from(t: Tilemap) -> Self {
        Drawable::Tilemap(t)
    }
}

impl From<Text> for Drawable {
    fn from(t: Text) -> Self {
        Drawable::Text(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::rgb;

    fn frames(n: usize) -> Vec<Bitmap> {
        (0..n).map(|i| Bitmap::solid(2, 2, rgb(i as u8, 0, 0))).collect()
    }

    fn animation(n: usize, fps: u32, looping: bool, return_to_default: bool) -> Animation {
        Animation::new(frames(n), fps, looping, return_to_default).unwrap()
    }

    #[test]
    fn test_looping_animation_wraps() {
        let mut sprite =
            AnimatedSprite::new(Vec2i::ZERO, 1.0, vec![animation(4, 10, true, false)]).unwrap();
        for _ in 0..6 {
            sprite.advance_animation(0.1);
        }
        assert_eq!(sprite.frame_index(), 2);
    }

    #[test]
    fn test_short_ticks_accumulate() {
        let mut sprite =
            AnimatedSprite::new(Vec2i::ZERO, 1.0, vec![animation(4, 10, true, false)]).unwrap();
        sprite.advance_animation(0.04);
        sprite.advance_animation(0.04);
        assert_eq!(sprite.frame_index(), 0);
        sprite.advance_animation(0.04);
        assert_eq!(sprite.frame_index(), 1);
    }

    #[test]
    fn test_non_looping_returns_to_default() {
        let mut sprite = AnimatedSprite::new(
            Vec2i::ZERO,
            1.0,
            vec![animation(4, 10, true, false), animation(3, 10, false, true)],
        )
        .unwrap();
        sprite.set_animation(1);
        for _ in 0..3 {
            sprite.advance_animation(0.1);
        }
        assert_eq!(sprite.animation_index(), 0);
        assert_eq!(sprite.frame_index(), 0);
    }

    #[test]
    fn test_non_looping_freezes_on_last_frame() {
        let mut sprite = AnimatedSprite::new(
            Vec2i::ZERO,
            1.0,
            vec![animation(4, 10, true, false), animation(3, 10, false, false)],
        )
        .unwrap();
        sprite.set_animation(1);
        for _ in 0..10 {
            sprite.advance_animation(0.1);
            assert!(sprite.frame_index() < 3);
        }
        assert_eq!(sprite.animation_index(), 1);
        assert_eq!(sprite.frame_index(), 2);
    }

    #[test]
    fn test_set_animation_same_index_is_noop() {
        let mut sprite = AnimatedSprite::new(
            Vec2i::ZERO,
            1.0,
            vec![animation(4, 10, true, false), animation(2, 5, true, false)],
        )
        .unwrap();
        sprite.advance_animation(0.1);
        sprite.advance_animation(0.05);
        sprite.set_animation(0);
        assert_eq!(sprite.frame_index(), 1);
        sprite.advance_animation(0.05);
        assert_eq!(sprite.frame_index(), 2);

        // Out of range is ignored
        sprite.set_animation(7);
        assert_eq!(sprite.animation_index(), 0);
    }

    #[test]
    fn test_animated_sprite_requires_animation() {
        assert!(matches!(
            AnimatedSprite::new(Vec2i::ZERO, 1.0, Vec::new()),
            Err(Error::NoAnimations)
        ));
        assert!(matches!(
            Animation::new(Vec::new(), 10, true, false),
            Err(Error::NoFrames)
        ));
    }

    #[test]
    fn test_animation_rejects_mismatched_frames() {
        let frames = vec![Bitmap::solid(4, 4, 0), Bitmap::solid(4, 4, 0), Bitmap::solid(2, 2, 0)];
        match Animation::new(frames, 10, true, false) {
            Err(Error::FrameSizeMismatch {
                index,
                expected,
                found,
            }) => {
                assert_eq!(index, 2);
                assert_eq!(expected, Vec2i::new(4, 4));
                assert_eq!(found, Vec2i::new(2, 2));
            },
            other => panic!("expected a frame size mismatch, got {:?}", other.map(|a| a.frame_count())),
        }
    }

    #[test]
    fn test_set_animation_uses_new_frame_duration() {
        let mut sprite = AnimatedSprite::new(
            Vec2i::ZERO,
            1.0,
            vec![animation(4, 10, true, false), animation(3, 2, true, false)],
        )
        .unwrap();
        sprite.advance_animation(0.09);
        sprite.set_animation(1);
        assert_eq!(sprite.animation_index(), 1);
        assert_eq!(sprite.frame_index(), 0);

        // 0.3 s is a full frame at 10 fps but not at 2 fps
        sprite.advance_animation(0.3);
        assert_eq!(sprite.frame_index(), 0);
        // The 0.09 s from before the switch was dropped
        sprite.advance_animation(0.15);
        assert_eq!(sprite.frame_index(), 0);
        sprite.advance_animation(0.1);
        assert_eq!(sprite.frame_index(), 1);
    }

    #[test]
    fn test_ground_anchor() {
        let sprite = Sprite::new(Vec2i::new(0, 100), 0.5, Rc::new(Bitmap::solid(10, 40, 0)))
            .with_center_offset(6);
        // 100 - 40 * 0.5 + 6 * 0.5 * 2
        assert_eq!(sprite.ground_anchor(), 86);
        assert!(!Drawable::from(sprite).last_layer());
    }

    #[test]
    fn test_tilemap_is_last_layer_and_skips_empty_cells() {
        // 2x1 sheet of 1x1 tiles: tile 0 red, tile 1 green
        let sheet = Rc::new(Bitmap::from_pixels(2, 1, vec![rgb(255, 0, 0), rgb(0, 255, 0)]).unwrap());
        let map = Tilemap::new(
            Vec2i::new(1, 1),
            1.0,
            sheet,
            Vec2i::new(1, 1),
            vec![1, Tilemap::EMPTY, 0, 1],
            Vec2i::new(2, 2),
        );
        let drawable = Drawable::from(map);
        assert!(drawable.last_layer());

        let mut buffer = PixelBuffer::with_size(6, 6);
        buffer.clear(0);
        drawable.draw(&mut buffer, Vec2i::ZERO);
        assert_eq!(buffer.get_pixel(0, 0), Some(0x0000_ff00));
        assert_eq!(buffer.get_pixel(2, 0), Some(0));
        assert_eq!(buffer.get_pixel(0, 2), Some(0x00ff_0000));
        assert_eq!(buffer.get_pixel(3, 3), Some(0x0000_ff00));
    }

    #[test]
    fn test_only_animated_sprites_advance() {
        let mut rect = Drawable::from(Rect::new(Vec2i::ZERO, Vec2i::new(1, 1), 5));
        rect.advance_animation(1.0);
        let mut animated = Drawable::from(
            AnimatedSprite::new(Vec2i::ZERO, 1.0, vec![animation(3, 10, true, false)]).unwrap(),
        );
        animated.advance_animation(0.1);
        assert_eq!(animated.as_animated_mut().map(|a| a.frame_index()), Some(1));
    }
}
