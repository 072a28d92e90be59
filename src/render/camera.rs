use crate::geometry::{lerp, Vec2i};

/// Transition progress gained per second of frame time
pub const DEFAULT_CAMERA_SPEED: f32 = 0.5;

/// World-space offset subtracted from every world draw.
/// `translate` moves the target; `tick` eases the current offset toward it.
#[derive(Debug, Clone)]
pub struct Camera {
    current: Vec2i,
    desired: Vec2i,
    progress: f32,
    speed: f32,
}

impl Camera {
    pub fn new(speed: f32) -> Self {
        Self {
            current: Vec2i::ZERO,
            desired: Vec2i::ZERO,
            progress: 0.0,
            speed,
        }
    }

    /// Additive: moves the target by `offset`
    pub fn translate(&mut self, offset: Vec2i) {
        self.desired += offset;
    }

    /// Step the transition. Progress resets once the target is reached.
    pub fn tick(&mut self, dt: f32) {
        if self.desired == self.current {
            self.progress = 0.0;
            return;
        }
        self.progress = (self.progress + dt * self.speed).min(1.0);
        self.current = Vec2i::new(
            lerp(self.current.x as f32, self.desired.x as f32, self.progress).round() as i32,
            lerp(self.current.y as f32, self.desired.y as f32, self.progress).round() as i32,
        );
    }

    #[inline]
    pub fn current(&self) -> Vec2i {
        self.current
    }

    #[inline]
    pub fn desired(&self) -> Vec2i {
        self.desired
    }

    #[inline]
    pub fn progress(&self) -> f32 {
        self.progress
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(DEFAULT_CAMERA_SPEED)
    }
}
