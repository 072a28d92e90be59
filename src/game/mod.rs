//! Gameplay: the player jumps across platforms and shoots the equations
//! drifting in from the right before they get past.
//!
//! Gameplay runs in fixed per-frame steps and talks to the compositor only
//! through the `Renderer` queues and camera.

mod bullet;
mod enemy;
mod input;
mod platform;
mod player;

pub use bullet::Bullet;
pub use enemy::{lane_y, Enemy};
pub use input::{Button, ButtonType, Input};
pub use platform::Platform;
pub use player::Player;

use std::rc::Rc;

use crate::assets;
use crate::bitmap::Bitmap;
use crate::config::{AssetConfig, GameplayConfig};
use crate::error::Result;
use crate::geometry::Vec2i;
use crate::render::Renderer;
use crate::sprite::{share, AnimatedSprite, Animation, Rect};
use crate::text::{Font, Text, TextAlign};
use crate::util::Rng;

const FLOOR_COLOR: u32 = 0x4049E6;
const LIFE_BAR_BACK: u32 = 0x282C34;
const LIFE_BAR_FILL: u32 = 0xE6C440;
/// Half-width of the full life bar
const LIFE_BAR_HALF: i32 = 200;
/// Life lost when an enemy escapes
const ESCAPE_PENALTY: i32 = 10;
/// Horizontal spacing of the initial enemy wave
const WAVE_SPACING: i32 = 150;

/// Everything gameplay loads from disk
pub struct GameAssets {
    pub font: Font,
    pub enemy_images: Vec<Rc<Bitmap>>,
    pub player_animations: Vec<Animation>,
}

impl GameAssets {
    pub fn load(config: &AssetConfig) -> Result<Self> {
        let font = assets::load_font(&config.font, config.font_columns);
        let enemy_images = config
            .enemy_images
            .iter()
            .map(|path| Rc::new(assets::load_image(path)))
            .collect();
        let player_animations = config
            .player_animations
            .iter()
            .map(|a| Animation::from_folder(&a.folder, a.fps, a.looping, a.return_to_default))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            font,
            enemy_images,
            player_animations,
        })
    }
}

pub struct Game {
    player: Player,
    platforms: Vec<Platform>,
    bullets: Vec<Bullet>,
    enemies: Vec<Enemy>,
    font: Font,
    rng: Rng,
    ground_y: i32,
    life: i32,
    max_life: i32,
    defeated: u32,
    game_over: bool,
}

impl Game {
    /// Set up the level for a view of `view` pixels
    pub fn new(config: &GameplayConfig, assets: GameAssets, view: Vec2i) -> Result<Self> {
        let mut rng = Rng::new(config.seed);

        let mut player = Player::new(config.player_spawn, config.player_half_size, config.ground_y);
        if !assets.player_animations.is_empty() {
            let sprite = AnimatedSprite::new(config.player_spawn, 1.0, assets.player_animations)?;
            player = player.with_sprite(share(sprite));
        }

        let enemies = assets
            .enemy_images
            .into_iter()
            .enumerate()
            .map(|(i, image)| {
                let position = Vec2i::new(
                    view.x + WAVE_SPACING * i as i32,
                    lane_y(rng.range_i32(0, 2), view.y),
                );
                Enemy::new(position, config.enemy_life, image, config.enemy_scale)
            })
            .collect();

        Ok(Self {
            player,
            platforms: config.platforms.iter().copied().map(Platform::from).collect(),
            bullets: Vec::new(),
            enemies,
            font: assets.font,
            rng,
            ground_y: config.ground_y,
            life: config.player_life,
            max_life: config.player_life.max(1),
            defeated: 0,
            game_over: false,
        })
    }

    pub fn life(&self) -> i32 {
        self.life
    }

    pub fn is_over(&self) -> bool {
        self.game_over
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn defeated(&self) -> u32 {
        self.defeated
    }

    /// Advance one frame and queue everything for drawing
    pub fn update(&mut self, renderer: &mut Renderer, input: &Input) {
        if !self.game_over {
            self.step(renderer, input);
        }
        self.draw(renderer);
    }

    fn step(&mut self, renderer: &mut Renderer, input: &Input) {
        let view = renderer.buffer_size();
        let camera = renderer.camera().current();
        let left = camera.x;
        let right = camera.x + view.x;

        self.player.update(input, &self.platforms);

        if input.pressed(ButtonType::Space) {
            self.bullets.push(Bullet::new(self.player.position, self.player.facing));
        }

        for bullet in &mut self.bullets {
            bullet.update(left, right);
            if !bullet.is_alive() {
                continue;
            }
            if let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| bullet.hits(e.position(), e.hit_box()))
            {
                bullet.kill();
                if enemy.hit() {
                    self.defeated += 1;
                    log::debug!("Enemy defeated ({} total)", self.defeated);
                    enemy.respawn(right, view.y, &mut self.rng);
                }
            }
        }
        self.bullets.retain(Bullet::is_alive);

        for enemy in &mut self.enemies {
            enemy.update();
            if enemy.out_of_bounds(left) {
                enemy.respawn(right, view.y, &mut self.rng);
                self.life -= ESCAPE_PENALTY;
                log::debug!("Enemy escaped, life {}", self.life);
            }
        }

        if self.life <= 0 {
            self.life = 0;
            self.game_over = true;
            log::info!("Game over after defeating {} enemies", self.defeated);
        }

        self.follow_player(renderer);
    }

    /// Keep the player inside the middle third of the view
    fn follow_player(&self, renderer: &mut Renderer) {
        let width = renderer.buffer_size().x;
        let desired = renderer.camera().desired();
        let margin = width / 3;
        let on_screen = self.player.position.x - desired.x;

        let shift = if on_screen > width - margin {
            on_screen - (width - margin)
        } else if on_screen < margin {
            (on_screen - margin).max(-desired.x)
        } else {
            0
        };
        if shift != 0 {
            renderer.translate_camera(Vec2i::new(shift, 0));
        }
    }

    /// Queue the current state without advancing it
    pub fn draw(&self, renderer: &mut Renderer) {
        let view = renderer.buffer_size();
        let camera = renderer.camera().current();

        // Floor band from the player's feet to the bottom of the view
        let floor_top = self.ground_y + self.player.half_size.y;
        let floor_half = Vec2i::new(view.x / 2, (view.y - floor_top).max(0) / 2);
        renderer.enqueue_rect(Rect::new(
            Vec2i::new(camera.x + view.x / 2, floor_top + floor_half.y),
            floor_half,
            FLOOR_COLOR,
        ));

        for platform in &self.platforms {
            renderer.enqueue_rect(platform.rect());
        }
        for bullet in &self.bullets {
            renderer.enqueue_rect(bullet.rect());
        }
        for enemy in &self.enemies {
            renderer.enqueue_sprite(enemy.sprite().clone());
        }
        self.player.draw(renderer);

        self.draw_hud(renderer, view);
    }

    fn draw_hud(&self, renderer: &mut Renderer, view: Vec2i) {
        let bar_y = 20;
        let start = 20;
        renderer.enqueue_ui_rect(Rect::new(
            Vec2i::new(start + LIFE_BAR_HALF, bar_y),
            Vec2i::new(LIFE_BAR_HALF, 10),
            LIFE_BAR_BACK,
        ));
        let fill = self.life * LIFE_BAR_HALF / self.max_life;
        if fill > 0 {
            renderer.enqueue_ui_rect(Rect::new(
                Vec2i::new(start + fill, bar_y),
                Vec2i::new(fill, 10),
                LIFE_BAR_FILL,
            ));
        }

        if self.font.is_empty() {
            return;
        }
        renderer.enqueue_ui_text(Text::new(
            "LIFE",
            self.font.clone(),
            Vec2i::new(start + LIFE_BAR_HALF * 2 + 30, bar_y),
            1,
            TextAlign::Left,
        ));
        if self.game_over {
            renderer.enqueue_ui_text(Text::new(
                "GAME OVER!",
                self.font.clone(),
                Vec2i::new(view.x / 2, view.y / 2),
                2,
                TextAlign::Center,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::DEFAULT_CAMERA_SPEED;
    use crate::text::FONT_COLUMNS;

    fn assets(enemies: usize) -> GameAssets {
        GameAssets {
            font: Font::from_strip(Rc::new(Bitmap::solid(30, 1, 0xff00_0000)), FONT_COLUMNS),
            enemy_images: (0..enemies).map(|_| Rc::new(Bitmap::solid(100, 100, 0xffff_ffff))).collect(),
            player_animations: Vec::new(),
        }
    }

    fn setup(enemies: usize) -> (Game, Renderer) {
        let renderer = Renderer::new(1200, 720, 0, DEFAULT_CAMERA_SPEED);
        let game = Game::new(&GameplayConfig::default(), assets(enemies), renderer.buffer_size()).unwrap();
        (game, renderer)
    }

    #[test]
    fn test_initial_wave_off_screen_in_lanes() {
        let (game, _) = setup(4);
        assert_eq!(game.enemies().len(), 4);
        for (i, enemy) in game.enemies().iter().enumerate() {
            assert_eq!(enemy.position().x, 1200 + 150 * i as i32);
            assert!([620, 420, 220].contains(&enemy.position().y));
        }
    }

    #[test]
    fn test_fire_spawns_bullet_in_facing_direction() {
        let (mut game, mut renderer) = setup(0);
        let mut input = Input::new();
        input.set(ButtonType::Space, true);
        game.update(&mut renderer, &input);
        assert_eq!(game.bullets().len(), 1);
        assert_eq!(game.bullets()[0].direction, 1);
        renderer.run_frame(1.0 / 60.0);

        // Holding fire does not spawn more
        input.begin_frame();
        game.update(&mut renderer, &input);
        assert_eq!(game.bullets().len(), 1);
    }

    #[test]
    fn test_escaped_enemies_cost_life_until_game_over() {
        let mut renderer = Renderer::new(200, 120, 0, DEFAULT_CAMERA_SPEED);
        let mut game = Game::new(&GameplayConfig::default(), assets(1), renderer.buffer_size()).unwrap();
        let input = Input::new();
        let mut frames = 0;
        while !game.is_over() && frames < 10_000 {
            game.update(&mut renderer, &input);
            renderer.run_frame(1.0 / 60.0);
            frames += 1;
        }
        assert!(game.is_over());
        assert_eq!(game.life(), 0);

        // World freezes after game over
        let x = game.enemies()[0].position().x;
        game.update(&mut renderer, &input);
        assert_eq!(game.enemies()[0].position().x, x);
    }

    #[test]
    fn test_shooting_defeats_enemy() {
        let mut config = GameplayConfig::default();
        config.platforms.clear();
        config.enemy_life = 1;
        let mut renderer = Renderer::new(1200, 720, 0, DEFAULT_CAMERA_SPEED);
        let mut game = Game::new(&config, assets(1), renderer.buffer_size()).unwrap();

        // Stand in the enemy's lane
        let lane = game.enemies()[0].position().y;
        game.player = Player::new(Vec2i::new(100, lane), Vec2i::new(10, 20), lane);

        let mut input = Input::new();
        for frame in 0..400 {
            input.begin_frame();
            input.set(ButtonType::Space, frame % 20 == 0);
            game.update(&mut renderer, &input);
            renderer.run_frame(1.0 / 60.0);
            if game.defeated() > 0 {
                break;
            }
        }
        assert_eq!(game.defeated(), 1);
        assert!(game.enemies()[0].position().x >= 1200);
    }
}
