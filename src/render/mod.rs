//! The compositor
//!
//! Gameplay fills the queues during a frame; `run_frame` draws them into the
//! pixel buffer in a fixed order and empties them.

mod camera;
mod queue;

pub use camera::{Camera, DEFAULT_CAMERA_SPEED};
pub use queue::{draw_order, RenderQueue};

use crate::display::PixelBuffer;
use crate::geometry::Vec2i;
use crate::sprite::{Rect, SpriteRef};
use crate::text::Text;

/// Rendering context: owns the buffer, the camera and the frame queues
pub struct Renderer {
    buffer: PixelBuffer,
    camera: Camera,
    queue: RenderQueue,
    background: u32,
}

impl Renderer {
    pub fn new(width: u32, height: u32, background: u32, camera_speed: f32) -> Self {
        Self {
            buffer: PixelBuffer::with_size(width, height),
            camera: Camera::new(camera_speed),
            queue: RenderQueue::new(),
            background,
        }
    }

    // ========================================================================
    // Queues
    // ========================================================================

    /// World-space rectangle
    pub fn enqueue_rect(&mut self, rect: Rect) {
        self.queue.rects.push(rect);
    }

    /// World-space sprite, sorted by draw order and animated each frame
    pub fn enqueue_sprite(&mut self, sprite: SpriteRef) {
        self.queue.sprites.push(sprite);
    }

    /// Screen-space sprite, drawn last and unaffected by the camera
    pub fn enqueue_ui_sprite(&mut self, sprite: SpriteRef) {
        self.queue.ui_sprites.push(sprite);
    }

    pub fn enqueue_text(&mut self, text: Text) {
        self.queue.text.push(text);
    }

    pub fn enqueue_ui_rect(&mut self, rect: Rect) {
        self.queue.ui_rects.push(rect);
    }

    pub fn enqueue_ui_text(&mut self, text: Text) {
        self.queue.ui_text.push(text);
    }

    // ========================================================================
    // Camera and buffer
    // ========================================================================

    pub fn translate_camera(&mut self, offset: Vec2i) {
        self.camera.translate(offset);
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn buffer_size(&self) -> Vec2i {
        Vec2i::new(self.buffer.width() as i32, self.buffer.height() as i32)
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn set_background(&mut self, color: u32) {
        self.background = color;
    }

    /// Swap in a buffer for the new client size
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.buffer.size() != (width, height) {
            log::debug!("Resizing frame buffer to {}x{}", width, height);
            self.buffer.resize(width, height);
        }
    }

    // ========================================================================
    // Frame
    // ========================================================================

    /// Composite everything queued this frame: clear, camera, sort, rects,
    /// world sprites, text, then the UI layer.
    pub fn run_frame(&mut self, dt: f32) {
        self.camera.tick(dt);

        if self.buffer.is_empty() {
            self.queue.clear();
            return;
        }

        self.buffer.clear(self.background);
        self.queue.sort_sprites();

        let camera = self.camera.current();
        let buffer = &mut self.buffer;

        for rect in &self.queue.rects {
            rect.draw(buffer, camera);
        }

        for sprite in &self.queue.sprites {
            let mut sprite = sprite.borrow_mut();
            sprite.advance_animation(dt);
            sprite.draw(buffer, camera);
        }

        for text in &self.queue.text {
            text.draw(buffer, camera);
        }

        for rect in &self.queue.ui_rects {
            rect.draw(buffer, Vec2i::ZERO);
        }

        for sprite in &self.queue.ui_sprites {
            sprite.borrow().draw(buffer, Vec2i::ZERO);
        }

        for text in &self.queue.ui_text {
            text.draw(buffer, Vec2i::ZERO);
        }

        self.queue.clear();
    }
}
