//! Player, enemies and bullets
//!
//! Every entity shares the same capabilities: advance one tick from the live
//! config, draw itself, and report its collision box (centered on position).

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::geometry::{Playfield, Rect};
use super::input::{InputState, Key};
use crate::config::Config;
use crate::consts::*;
use crate::renderer::Surface;

/// Per-frame values an entity may need while drawing
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    pub config: &'a Config,
    pub frame_count: u64,
    pub invulnerable: bool,
    pub invulnerable_timer: u32,
}

/// Common capability set of every simulated entity
pub trait Entity {
    /// Advance one tick (base speed × global game speed)
    fn update(&mut self, config: &Config);
    /// Render; never mutates state
    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>);
    /// Current collision box
    fn bounds(&self) -> Rect;
}

/// Movement and fire intent derived from held keys
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Intent {
    /// -1 (left), 0, or 1 (right)
    pub dx: f32,
    /// -1 (up), 0, or 1 (down)
    pub dy: f32,
    pub fire: bool,
}

impl Intent {
    pub fn from_input(input: &InputState) -> Self {
        let axis = |negative: Key, positive: Key| {
            let mut v = 0.0;
            if input.is_pressed(negative) {
                v -= 1.0;
            }
            if input.is_pressed(positive) {
                v += 1.0;
            }
            v
        };
        Self {
            dx: axis(Key::Left, Key::Right),
            dy: axis(Key::Up, Key::Down),
            fire: input.is_pressed(Key::Fire),
        }
    }
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center of the ship
    pub pos: Vec2,
    pub size: f32,
    /// Pixels per tick, captured at spawn
    pub speed: f32,
    pub color: String,
    /// Frame of the last shot (0 before the first)
    pub last_shot: u64,
    /// Band the ship may occupy, fixed for its lifetime
    playable_top: f32,
    playable_bottom: f32,
    field_width: f32,
    intent: Intent,
}

impl Player {
    /// Spawn at the bottom center using the current config
    pub fn spawn(config: &Config, field: &Playfield) -> Self {
        let playable_bottom = field.height - PLAYABLE_BOTTOM_INSET;
        Self {
            pos: Vec2::new(field.width / 2.0, playable_bottom),
            size: config.player_size,
            speed: config.player_speed,
            color: config.player_color.clone(),
            last_shot: 0,
            playable_top: field.height * PLAYABLE_TOP_FRACTION,
            playable_bottom,
            field_width: field.width,
            intent: Intent::default(),
        }
    }

    /// Latch the held keys; applied by the next `update`
    pub fn handle_input(&mut self, input: &InputState) {
        self.intent = Intent::from_input(input);
    }

    /// Vertical band (top, bottom) the ship is confined to
    pub fn playable_band(&self) -> (f32, f32) {
        (self.playable_top, self.playable_bottom)
    }

    /// Tip of the ship, where bullets appear
    pub fn nose(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size / 2.0)
    }

    /// Fire if the trigger is held and the cooldown has elapsed
    pub fn try_fire(&mut self, frame_count: u64, config: &Config) -> Option<Bullet> {
        if !self.intent.fire {
            return None;
        }
        let since_last = frame_count.saturating_sub(self.last_shot) as f64;
        if since_last < f64::from(config.bullet_cooldown) {
            return None;
        }
        self.last_shot = frame_count;
        Some(Bullet::spawn(self.nose(), config))
    }

    /// Keep the ship inside its band. Lower bounds are applied first so an
    /// oversized ship can't make the range inverted and panic
    fn clamp(&mut self) {
        let half = self.size / 2.0;
        self.pos.x = self.pos.x.max(half).min(self.field_width - half);
        self.pos.y = self
            .pos
            .y
            .max(self.playable_top + half)
            .min(self.playable_bottom - half);
    }

    /// Hidden on alternating half-cycles while invulnerable
    pub fn is_visible(ctx: &DrawContext<'_>) -> bool {
        !ctx.invulnerable || (ctx.invulnerable_timer as f32 * FLICKER_FREQUENCY).sin() > 0.0
    }

    /// Fill color for this frame (rainbow mode cycles the hue every tick)
    pub fn fill_color(&self, ctx: &DrawContext<'_>) -> String {
        if ctx.config.rainbow_mode {
            format!("hsl({}, 100%, 50%)", ctx.frame_count % 360)
        } else {
            self.color.clone()
        }
    }

    fn outline(&self) -> [Vec2; 3] {
        let half = self.size / 2.0;
        [
            Vec2::new(self.pos.x, self.pos.y - half),
            Vec2::new(self.pos.x - half, self.pos.y + half),
            Vec2::new(self.pos.x + half, self.pos.y + half),
        ]
    }
}

impl Entity for Player {
    fn update(&mut self, config: &Config) {
        let step = self.speed * config.game_speed;
        self.pos.x += self.intent.dx * step;
        self.pos.y += self.intent.dy * step;
        self.clamp();
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        if !Self::is_visible(ctx) {
            return;
        }
        let points = self.outline();
        surface.fill_triangle(points, &self.fill_color(ctx));
        surface.stroke_triangle(points, OUTLINE_COLOR, 2.0);
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size))
    }
}

/// A falling enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

impl Enemy {
    /// Spawn just above the top edge at a random column
    pub fn spawn(config: &Config, field: &Playfield, rng: &mut impl Rng) -> Self {
        let size = config.enemy_size;
        let x = rng.random::<f32>() * (field.width - size) + size / 2.0;
        Self {
            pos: Vec2::new(x, -size),
            size,
            speed: config.enemy_speed,
        }
    }

    /// Fully past the bottom edge
    pub fn is_off_screen(&self, field: &Playfield) -> bool {
        self.pos.y > field.height + self.size
    }
}

impl Entity for Enemy {
    fn update(&mut self, config: &Config) {
        self.pos.y += self.speed * config.game_speed;
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        let rect = self.bounds();
        surface.fill_rect(rect, &ctx.config.enemy_color);
        surface.stroke_rect(rect, OUTLINE_COLOR, 2.0);
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::splat(self.size))
    }
}

/// A player shot travelling upward
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Width; the bullet is twice as tall
    pub size: f32,
    pub speed: f32,
}

impl Bullet {
    pub fn spawn(pos: Vec2, config: &Config) -> Self {
        Self {
            pos,
            size: config.bullet_size,
            speed: config.bullet_speed,
        }
    }

    /// Fully past the top edge
    pub fn is_off_screen(&self) -> bool {
        self.pos.y < -self.size
    }
}

impl Entity for Bullet {
    fn update(&mut self, config: &Config) {
        self.pos.y -= self.speed * config.game_speed;
    }

    fn draw(&self, surface: &mut dyn Surface, ctx: &DrawContext<'_>) {
        let rect = self.bounds();
        surface.fill_rect(rect, &ctx.config.bullet_color);
        surface.stroke_rect(rect, OUTLINE_COLOR, 1.0);
    }

    fn bounds(&self) -> Rect {
        Rect::centered(self.pos, Vec2::new(self.size, self.size * 2.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{CommandBuffer, DrawCommand};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn field() -> Playfield {
        Playfield::new(800.0, 600.0)
    }

    fn ctx(config: &Config) -> DrawContext<'_> {
        DrawContext {
            config,
            frame_count: 0,
            invulnerable: false,
            invulnerable_timer: 0,
        }
    }

    #[test]
    fn test_player_spawn() {
        let config = Config::default();
        let player = Player::spawn(&config, &field());
        assert_eq!(player.pos, Vec2::new(400.0, 540.0));
        assert_eq!(player.playable_band(), (450.0, 540.0));
        assert_eq!(player.size, 40.0);
        assert_eq!(player.color, "green");
    }

    #[test]
    fn test_player_clamped_to_bottom_band() {
        let config = Config::default();
        let mut player = Player::spawn(&config, &field());
        let mut input = InputState::new();
        input.press(Key::Up);
        player.handle_input(&input);
        for _ in 0..100 {
            player.update(&config);
        }
        assert_eq!(player.pos.y, 470.0);

        input.release(Key::Up);
        input.press(Key::Down);
        input.press(Key::Left);
        player.handle_input(&input);
        for _ in 0..200 {
            player.update(&config);
        }
        assert_eq!(player.pos, Vec2::new(20.0, 520.0));
    }

    #[test]
    fn test_player_speed_uses_game_speed() {
        let mut config = Config::default();
        config.game_speed = 0.5;
        let mut player = Player::spawn(&config, &field());
        let mut input = InputState::new();
        input.press(Key::Right);
        player.handle_input(&input);
        player.update(&config);
        assert_eq!(player.pos.x, 402.5);
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut input = InputState::new();
        input.press(Key::Left);
        input.press(Key::Right);
        let intent = Intent::from_input(&input);
        assert_eq!(intent.dx, 0.0);
    }

    #[test]
    fn test_oversized_player_does_not_panic() {
        let mut config = Config::default();
        config.player_size = 5000.0;
        let mut player = Player::spawn(&config, &field());
        player.update(&config);
        assert!(player.pos.x.is_finite());
    }

    #[test]
    fn test_fire_cooldown() {
        let config = Config::default();
        let mut player = Player::spawn(&config, &field());
        let mut input = InputState::new();
        input.press(Key::Fire);
        player.handle_input(&input);

        assert!(player.try_fire(14, &config).is_none());
        let bullet = player.try_fire(15, &config).unwrap();
        assert_eq!(bullet.pos, player.nose());
        assert!(player.try_fire(29, &config).is_none());
        assert!(player.try_fire(30, &config).is_some());
    }

    #[test]
    fn test_player_flicker_while_invulnerable() {
        let config = Config::default();
        let mut c = ctx(&config);
        c.invulnerable = true;
        c.invulnerable_timer = 0;
        assert!(!Player::is_visible(&c));
        c.invulnerable_timer = 1;
        assert!(Player::is_visible(&c));
        // sin(0.3 * 11) < 0
        c.invulnerable_timer = 11;
        assert!(!Player::is_visible(&c));
    }

    #[test]
    fn test_rainbow_color_reads_live_flag() {
        let mut config = Config::default();
        let player = Player::spawn(&config, &field());
        config.rainbow_mode = true;
        let mut c = ctx(&config);
        c.frame_count = 725;
        assert_eq!(player.fill_color(&c), "hsl(5, 100%, 50%)");

        let mut buffer = CommandBuffer::new();
        player.draw(&mut buffer, &c);
        assert_eq!(buffer.triangle_fills(), vec!["hsl(5, 100%, 50%)"]);
    }

    #[test]
    fn test_enemy_spawns_above_top_within_columns() {
        let config = Config::default();
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let enemy = Enemy::spawn(&config, &field(), &mut rng);
            assert_eq!(enemy.pos.y, -30.0);
            assert!(enemy.pos.x >= 15.0 && enemy.pos.x <= 785.0);
        }
    }

    #[test]
    fn test_enemy_falls_and_leaves() {
        let config = Config::default();
        let mut enemy = Enemy {
            pos: Vec2::new(100.0, 629.5),
            size: 30.0,
            speed: 1.0,
        };
        assert!(!enemy.is_off_screen(&field()));
        enemy.update(&config);
        assert_eq!(enemy.pos.y, 630.5);
        assert!(enemy.is_off_screen(&field()));
    }

    #[test]
    fn test_enemy_color_is_live() {
        let mut config = Config::default();
        let enemy = Enemy {
            pos: Vec2::new(100.0, 100.0),
            size: 30.0,
            speed: 1.0,
        };
        config.enemy_color = "purple".to_string();
        let mut buffer = CommandBuffer::new();
        enemy.draw(&mut buffer, &ctx(&config));
        assert_eq!(
            buffer.commands[0],
            DrawCommand::FillRect {
                rect: Rect::new(85.0, 85.0, 30.0, 30.0),
                color: "purple".to_string(),
            }
        );
    }

    #[test]
    fn test_bullet_bounds_and_exit() {
        let config = Config::default();
        let mut bullet = Bullet::spawn(Vec2::new(50.0, 2.0), &config);
        assert_eq!(bullet.bounds(), Rect::new(47.5, -3.0, 5.0, 10.0));
        bullet.update(&config);
        assert_eq!(bullet.pos.y, -6.0);
        assert!(bullet.is_off_screen());
    }
}
