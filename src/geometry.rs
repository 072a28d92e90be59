//! 2D vector types and the small amount of scalar math the game needs
//!
//! `Vec2i` is used for every screen/world position and half-extent.
//! `Vec2f` shows up where fractional directions are needed (normalize).

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Integer 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn magnitude(&self) -> f32 {
        magnitude(*self)
    }

    #[inline]
    pub fn to_f32(self) -> Vec2f {
        Vec2f::new(self.x as f32, self.y as f32)
    }
}

impl Add for Vec2i {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2i {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl AddAssign for Vec2i {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Vec2i {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Neg for Vec2i {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// Scales and truncates toward zero, e.g. `(10, 20) * 1.5 == (15, 30)`
impl Mul<f32> for Vec2i {
    type Output = Self;
    #[inline]
    fn mul(self, k: f32) -> Self {
        Self::new((self.x as f32 * k) as i32, (self.y as f32 * k) as i32)
    }
}

impl Div<f32> for Vec2i {
    type Output = Self;
    #[inline]
    fn div(self, k: f32) -> Self {
        Self::new((self.x as f32 / k) as i32, (self.y as f32 / k) as i32)
    }
}

/// Float 2D vector
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2f {
    pub x: f32,
    pub y: f32,
}

impl Vec2f {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Approximate equality check for floating point comparison
    #[inline]
    pub fn approx_eq(&self, other: &Self, epsilon: f32) -> bool {
        (self.x - other.x).abs() < epsilon && (self.y - other.y).abs() < epsilon
    }

    /// Round each component to the nearest integer
    #[inline]
    pub fn round(self) -> Vec2i {
        Vec2i::new(self.x.round() as i32, self.y.round() as i32)
    }
}

impl Add for Vec2f {
    type Output = Self;
    #[inline]
    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vec2f {
    type Output = Self;
    #[inline]
    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl Add<Vec2i> for Vec2f {
    type Output = Self;
    #[inline]
    fn add(self, other: Vec2i) -> Self {
        Self::new(self.x + other.x as f32, self.y + other.y as f32)
    }
}

impl Sub<Vec2i> for Vec2f {
    type Output = Self;
    #[inline]
    fn sub(self, other: Vec2i) -> Self {
        Self::new(self.x - other.x as f32, self.y - other.y as f32)
    }
}

impl AddAssign for Vec2f {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Vec2f {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f32> for Vec2f {
    type Output = Self;
    #[inline]
    fn mul(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k)
    }
}

impl Div<f32> for Vec2f {
    type Output = Self;
    #[inline]
    fn div(self, k: f32) -> Self {
        Self::new(self.x / k, self.y / k)
    }
}

/// Length of an integer vector
#[inline]
pub fn magnitude(u: Vec2i) -> f32 {
    ((u.x as f32).powi(2) + (u.y as f32).powi(2)).sqrt()
}

/// Unit vector in the direction of `u`, or zero for the zero vector
#[inline]
pub fn normalize(u: Vec2i) -> Vec2f {
    let len = magnitude(u);
    if len > 0.0 {
        Vec2f::new(u.x as f32 / len, u.y as f32 / len)
    } else {
        Vec2f::ZERO
    }
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2i, b: Vec2i) -> f32 {
    magnitude(b - a)
}

/// Linear interpolation between `a` and `b` by `w`
#[inline]
pub fn lerp(a: f32, b: f32, w: f32) -> f32 {
    (1.0 - w) * a + w * b
}

/// Move `val` toward `target` by at most `step`, never overshooting
#[inline]
pub fn move_to(val: f32, target: f32, step: f32) -> f32 {
    if val > target {
        (val - step).clamp(target, val)
    } else if val < target {
        (val + step).clamp(val, target)
    } else {
        val
    }
}

/// Sample a straight line from `(i0, d0)` to `(i1, d1)` at every integer step
/// between them, in either direction. Returns `[d0]` for a single-point range.
pub fn interpolate(i0: i32, d0: f32, i1: i32, d1: f32) -> Vec<f32> {
    let steps = (i1 - i0).unsigned_abs();
    if steps == 0 {
        return vec![d0];
    }
    let slope = (d1 - d0) / steps as f32;
    (0..=steps).map(|i| d0 + slope * i as f32).collect()
}
