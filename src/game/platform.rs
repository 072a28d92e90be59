use crate::config::PlatformConfig;
use crate::geometry::Vec2i;
use crate::sprite::Rect;

pub const PLATFORM_COLOR: u32 = 0x6169FF;
const CORNER_RADIUS: i32 = 6;

/// Axis-aligned box the player can stand on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Platform {
    pub position: Vec2i,
    pub half_size: Vec2i,
}

impl Platform {
    pub fn new(position: Vec2i, half_size: Vec2i) -> Self {
        Self {
            position,
            half_size,
        }
    }

    /// Overlap test against a box, edges inclusive
    pub fn collides(&self, center: Vec2i, half_size: Vec2i) -> bool {
        (center.y - self.position.y).abs() <= half_size.y + self.half_size.y
            && (center.x - self.position.x).abs() <= half_size.x + self.half_size.x
    }

    /// y of the walkable surface
    pub fn top(&self) -> i32 {
        self.position.y - self.half_size.y
    }

    pub fn rect(&self) -> Rect {
        Rect::rounded(self.position, self.half_size, CORNER_RADIUS, PLATFORM_COLOR)
    }
}

impl From<PlatformConfig> for Platform {
    fn from(config: PlatformConfig) -> Self {
        Self::new(config.position, config.half_size)
    }
}
