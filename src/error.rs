use std::path::PathBuf;
use thiserror::Error;

use crate::geometry::Vec2i;

/// Errors raised at the asset, configuration and platform boundaries.
/// The compositor itself never fails; it clamps or skips instead.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
    #[error("No numbered frames found in {}", .0.display())]
    EmptyAnimation(PathBuf),
    #[error("Animation has no frames")]
    NoFrames,
    #[error(
        "Animation frame {index} is {}x{}, expected {}x{}",
        .found.x, .found.y, .expected.x, .expected.y
    )]
    FrameSizeMismatch {
        index: usize,
        expected: Vec2i,
        found: Vec2i,
    },
    #[error("Animated sprite needs at least one animation")]
    NoAnimations,
    #[error("SDL error: {0}")]
    Sdl(String),
}

pub type Result<T> = std::result::Result<T, Error>;
