//! Software-rendered 2D platform shooter
//!
//! The engine composites rectangles, sprites and bitmap-font text into a
//! packed 32-bit framebuffer on the CPU; SDL2 only shows the finished frame.

pub mod assets;
pub mod bitmap;
pub mod color;
pub mod config;
pub mod display;
pub mod error;
pub mod game;
pub mod geometry;
pub mod render;
pub mod sprite;
pub mod text;
pub mod util;

pub use bitmap::Bitmap;
pub use config::GameConfig;
pub use display::PixelBuffer;
pub use error::{Error, Result};
pub use geometry::{Vec2f, Vec2i};
pub use render::{Camera, Renderer};
pub use sprite::{AnimatedSprite, Animation, Drawable, Rect, Sprite, SpriteRef, Tilemap};
pub use text::{Font, Text, TextAlign};
