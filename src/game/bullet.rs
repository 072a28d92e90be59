use crate::geometry::Vec2i;
use crate::sprite::Rect;

pub const BULLET_COLOR: u32 = 0xE6C440;
const HALF_SIZE: Vec2i = Vec2i::new(3, 2);
/// Pixels per frame
const SPEED: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bullet {
    pub position: Vec2i,
    /// -1 or 1
    pub direction: i32,
    alive: bool,
}

impl Bullet {
    pub fn new(position: Vec2i, direction: i32) -> Self {
        Self {
            position,
            direction: direction.signum(),
            alive: true,
        }
    }

    /// Advance one frame. Leaving the visible span `[left, right)` kills the bullet.
    pub fn update(&mut self, left: i32, right: i32) {
        self.position.x += SPEED * self.direction;
        if self.position.x + HALF_SIZE.x >= right || self.position.x - HALF_SIZE.x < left {
            self.alive = false;
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    pub fn kill(&mut self) {
        self.alive = false;
    }

    /// Whether the path covered this frame crosses the target box
    pub fn hits(&self, center: Vec2i, half_size: Vec2i) -> bool {
        if (center.y - self.position.y).abs() > half_size.y + HALF_SIZE.y {
            return false;
        }
        let from = self.position.x - SPEED * self.direction;
        let (lo, hi) = (from.min(self.position.x), from.max(self.position.x));
        hi + HALF_SIZE.x >= center.x - half_size.x && lo - HALF_SIZE.x <= center.x + half_size.x
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.position, HALF_SIZE, BULLET_COLOR)
    }
}
