use super::input::{ButtonType, Input};
use super::platform::Platform;
use crate::geometry::Vec2i;
use crate::render::Renderer;
use crate::sprite::{Rect, SpriteRef};

pub const PLAYER_COLOR: u32 = 0xE6C440;

/// Horizontal speed, pixels per frame
const MOVE_SPEED: i32 = 5;
/// Upward speed while a jump lasts, pixels per frame
const JUMP_SPEED: i32 = 20;

pub struct Player {
    pub position: Vec2i,
    pub half_size: Vec2i,
    /// -1 facing left, 1 facing right
    pub facing: i32,
    jumping: bool,
    on_ground: bool,
    /// Downward speed, grows by one every airborne frame
    fall_speed: i32,
    /// Index of the platform being stood on
    platform: Option<usize>,
    ground_y: i32,
    moving: bool,
    sprite: Option<SpriteRef>,
}

impl Player {
    pub fn new(position: Vec2i, half_size: Vec2i, ground_y: i32) -> Self {
        Self {
            position,
            half_size,
            facing: 1,
            jumping: false,
            on_ground: position.y >= ground_y,
            fall_speed: 0,
            platform: None,
            ground_y,
            moving: false,
            sprite: None,
        }
    }

    /// Draw with an animated sprite instead of a box.
    /// Animation 0 plays while idle, animation 1 (if present) while moving.
    pub fn with_sprite(mut self, sprite: SpriteRef) -> Self {
        self.sprite = Some(sprite);
        self
    }

    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    pub fn platform(&self) -> Option<usize> {
        self.platform
    }

    /// One fixed step of movement, jumping, gravity and platform landing
    pub fn update(&mut self, input: &Input, platforms: &[Platform]) {
        let mut dx = 0;
        if input.down(ButtonType::Left) {
            dx -= MOVE_SPEED;
            self.facing = -1;
        }
        if input.down(ButtonType::Right) {
            dx += MOVE_SPEED;
            self.facing = 1;
        }
        self.moving = dx != 0;
        self.position.x = (self.position.x + dx).max(self.half_size.x);

        if input.pressed(ButtonType::Up) && !self.jumping && self.on_ground {
            self.jumping = true;
            self.on_ground = false;
            self.platform = None;
        }
        if self.jumping {
            self.position.y -= JUMP_SPEED;
        }

        if !self.on_ground {
            self.fall_speed += 1;
        }
        if self.position.y + self.fall_speed >= self.ground_y {
            self.land(self.ground_y);
            self.platform = None;
        }
        self.position.y += self.fall_speed;

        for (i, platform) in platforms.iter().enumerate() {
            let collision = platform.collides(self.position, self.half_size);
            if !collision && self.platform == Some(i) && self.position.y < self.ground_y {
                // Walked off the edge
                self.on_ground = false;
                self.platform = None;
            } else if collision
                && self.platform.is_none()
                && (!self.jumping || self.fall_speed > JUMP_SPEED)
            {
                self.land(platform.top() - self.half_size.y);
                self.platform = Some(i);
            }
        }
    }

    fn land(&mut self, y: i32) {
        self.position.y = y;
        self.on_ground = true;
        self.jumping = false;
        self.fall_speed = 0;
    }

    pub fn draw(&self, renderer: &mut Renderer) {
        match &self.sprite {
            Some(sprite) => {
                {
                    let mut drawable = sprite.borrow_mut();
                    drawable.set_position(self.position);
                    if let Some(animated) = drawable.as_animated_mut() {
                        animated.reversed = self.facing < 0;
                        let wanted = if self.moving && animated.animation_count() > 1 { 1 } else { 0 };
                        animated.set_animation(wanted);
                    }
                }
                renderer.enqueue_sprite(sprite.clone());
            },
            None => renderer.enqueue_rect(Rect::new(self.position, self.half_size, PLAYER_COLOR)),
        }
    }
}
