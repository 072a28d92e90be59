use std::rc::Rc;

use crate::bitmap::Bitmap;
use crate::geometry::Vec2i;
use crate::sprite::{share, Sprite, SpriteRef};
use crate::util::Rng;

/// Distance between lanes, and of the lowest lane from the bottom edge
const LANE_SPACING: i32 = 200;
const LANE_BASE: i32 = 100;
const LANES: i32 = 3;

/// Center y of a spawn lane for a view `height` pixels tall
pub fn lane_y(lane: i32, height: i32) -> i32 {
    height - (lane * LANE_SPACING + LANE_BASE)
}

/// A drifting target. Takes `life` hits, then respawns off the right edge.
pub struct Enemy {
    position: Vec2i,
    sprite: SpriteRef,
    size: Vec2i,
    life: i32,
    hit_points: i32,
}

impl Enemy {
    pub fn new(position: Vec2i, life: i32, image: Rc<Bitmap>, scale: f32) -> Self {
        let sprite = Sprite::new(position, scale, image);
        let size = sprite.half_size();
        Self {
            position,
            sprite: share(sprite),
            size,
            life,
            hit_points: life,
        }
    }

    pub fn position(&self) -> Vec2i {
        self.position
    }

    /// Scaled image size; also the sprite's on-screen half-size
    pub fn size(&self) -> Vec2i {
        self.size
    }

    /// Box bullets are tested against
    pub fn hit_box(&self) -> Vec2i {
        self.size * 1.5
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn sprite(&self) -> &SpriteRef {
        &self.sprite
    }

    /// Drift one pixel left
    pub fn update(&mut self) {
        self.position.x -= 1;
        self.sprite.borrow_mut().set_position(self.position);
    }

    /// Take one hit. Returns true when this hit defeats the enemy.
    pub fn hit(&mut self) -> bool {
        self.hit_points -= 1;
        self.hit_points <= 0
    }

    /// Move to a random lane just past `right`, with full hit points
    pub fn respawn(&mut self, right: i32, height: i32, rng: &mut Rng) {
        self.position = Vec2i::new(
            right + (self.size.x + 10) * 2,
            lane_y(rng.range_i32(0, LANES - 1), height),
        );
        self.hit_points = self.life;
        self.sprite.borrow_mut().set_position(self.position);
    }

    /// Fully past the left edge of the view
    pub fn out_of_bounds(&self, left: i32) -> bool {
        self.position.x + self.size.x / 2 < left
    }
}
