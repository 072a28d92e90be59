use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::display::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::error::Result;
use crate::geometry::Vec2i;
use crate::render::DEFAULT_CAMERA_SPEED;
use crate::text::FONT_COLUMNS;

pub const DEFAULT_CONFIG_PATH: &str = "mathshooter.json";

/// Top-level game configuration, read from JSON. Missing fields use defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub window: WindowConfig,
    pub render: RenderConfig,
    pub assets: AssetConfig,
    pub game: GameplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Packed clear color
    pub background: u32,
    /// Seconds per frame the loop paces to when VSync is off
    pub target_frame_time: f32,
    /// Upper bound on the dt handed to a frame
    pub max_frame_time: f32,
    /// Camera transition progress per second
    pub camera_speed: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    pub font: PathBuf,
    pub font_columns: u32,
    pub enemy_images: Vec<PathBuf>,
    /// Player animations; the first is the idle state. Empty draws a plain box.
    pub player_animations: Vec<AnimationConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnimationConfig {
    pub folder: PathBuf,
    pub fps: u32,
    #[serde(default = "default_true")]
    pub looping: bool,
    #[serde(default)]
    pub return_to_default: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformConfig {
    pub position: Vec2i,
    pub half_size: Vec2i,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameplayConfig {
    pub platforms: Vec<PlatformConfig>,
    pub player_spawn: Vec2i,
    pub player_half_size: Vec2i,
    /// Lowest y the player's center can reach
    pub ground_y: i32,
    pub player_life: i32,
    /// Hits an enemy takes before it respawns
    pub enemy_life: i32,
    pub enemy_scale: f32,
    /// Seed for enemy lane selection
    pub seed: u64,
}

fn default_true() -> bool {
    true
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Math Shooter".to_string(),
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            vsync: true,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            background: 0x242C66,
            target_frame_time: 1.0 / 60.0,
            max_frame_time: 0.1,
            camera_speed: DEFAULT_CAMERA_SPEED,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            font: PathBuf::from("res/font.png"),
            font_columns: FONT_COLUMNS,
            enemy_images: (1..=4)
                .map(|i| PathBuf::from(format!("res/equ{}.png", i)))
                .collect(),
            player_animations: Vec::new(),
        }
    }
}

impl Default for GameplayConfig {
    fn default() -> Self {
        let platform = |x, y, hw, hh| PlatformConfig {
            position: Vec2i::new(x, y),
            half_size: Vec2i::new(hw, hh),
        };
        Self {
            platforms: vec![
                platform(300, 520, 100, 10),
                platform(880, 450, 80, 10),
                platform(600, 370, 110, 10),
                platform(400, 250, 60, 10),
            ],
            player_spawn: Vec2i::new(100, 620),
            player_half_size: Vec2i::new(10, 20),
            ground_y: 620,
            player_life: 100,
            enemy_life: 5,
            enemy_scale: 0.15,
            seed: 0x5EED_CAFE,
        }
    }
}

impl GameConfig {
    /// Save configuration to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Load configuration, falling back to defaults when the file is missing or invalid
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded configuration from {}", path.display());
                config
            },
            Err(e) => {
                log::info!("Using default configuration ({}: {e})", path.display());
                Self::default()
            },
        }
    }
}
