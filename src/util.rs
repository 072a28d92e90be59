//! Shared utilities

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Simple deterministic RNG using xorshift64
pub struct Rng {
    state: u64,
}

impl Rng {
    /// Create a new RNG with the given seed
    pub fn new(seed: u64) -> Self {
        Self { state: seed.max(1) } // Ensure non-zero
    }

    /// Get the next random u64
    #[inline]
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Get a random i32 in [min, max]
    #[inline]
    pub fn range_i32(&mut self, min: i32, max: i32) -> i32 {
        if min >= max {
            return min;
        }
        let range = (max - min + 1) as u64;
        min + (self.next_u64() % range) as i32
    }
}

// ============================================================================
// Frame Clock
// ============================================================================

/// The dt a frame should see: clamped, and zero while the window is unfocused
#[inline]
pub fn frame_dt(raw: f32, max_frame_time: f32, focused: bool) -> f32 {
    if focused {
        raw.clamp(0.0, max_frame_time)
    } else {
        0.0
    }
}

/// How long to sleep so a frame that took `elapsed` lasts `target`
#[inline]
pub fn pacing_sleep(elapsed: Duration, target: Duration) -> Option<Duration> {
    target.checked_sub(elapsed).filter(|d| !d.is_zero())
}

/// Measures frame time, paces the loop when VSync is off, and keeps a
/// rolling average for the FPS readout
pub struct FrameClock {
    last_frame: Instant,
    target_frame_time: Duration,
    max_frame_time: f32,
    pace: bool,
    frame_times: VecDeque<f32>,
    sample_count: usize,
}

impl FrameClock {
    pub fn new(target_frame_time: f32, max_frame_time: f32, pace: bool) -> Self {
        Self {
            last_frame: Instant::now(),
            target_frame_time: Duration::from_secs_f32(target_frame_time.max(0.0)),
            max_frame_time,
            pace,
            frame_times: VecDeque::with_capacity(60),
            sample_count: 60,
        }
    }

    /// Call once per frame after presenting. Returns the dt for the next frame.
    pub fn tick(&mut self, focused: bool) -> f32 {
        if self.pace {
            if let Some(sleep) = pacing_sleep(self.last_frame.elapsed(), self.target_frame_time) {
                std::thread::sleep(sleep);
            }
        }

        let now = Instant::now();
        let raw = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.frame_times.push_back(raw);
        if self.frame_times.len() > self.sample_count {
            self.frame_times.pop_front();
        }

        frame_dt(raw, self.max_frame_time, focused)
    }

    /// Average frames per second over the sample window
    pub fn avg_fps(&self) -> f32 {
        let avg_dt: f32 =
            self.frame_times.iter().sum::<f32>() / self.frame_times.len().max(1) as f32;
        if avg_dt > 0.0 {
            1.0 / avg_dt
        } else {
            0.0
        }
    }
}
