//! Per-frame simulation tick
//!
//! Advances the session by exactly one step. The host decides the cadence
//! (display refresh on the web, a plain loop in tests); the config is read
//! live on every call.

use super::entity::{DrawContext, Enemy, Entity};
use super::geometry::collides;
use super::input::InputState;
use super::state::{GamePhase, GameState};
use super::world::Body;
use crate::config::Config;
use crate::renderer::{Surface, draw_background};

/// True on ticks where a new enemy is due
pub fn spawn_due(frame_count: u64, spawn_rate: f32) -> bool {
    // A zero or NaN rate yields NaN here and never spawns
    (frame_count as f64) % f64::from(spawn_rate) == 0.0
}

/// Advance the game state by one tick
pub fn tick(
    state: &mut GameState,
    config: &Config,
    input: &InputState,
    surface: &mut dyn Surface,
) {
    // Idle, paused and ended sessions do no work; the host keeps calling
    if state.phase != GamePhase::Running {
        return;
    }

    state.frame_count += 1;

    if state.invulnerable {
        state.invulnerable_timer += 1;
        if state.invulnerable_timer as f32 >= config.invulnerability_time {
            state.invulnerable = false;
            state.invulnerable_timer = 0;
            log::debug!("Invulnerability over at frame {}", state.frame_count);
        }
    }

    let ctx = DrawContext {
        config,
        frame_count: state.frame_count,
        invulnerable: state.invulnerable,
        invulnerable_timer: state.invulnerable_timer,
    };

    draw_background(surface, &state.playfield, state.frame_count);

    update_player(state, config, input, surface, &ctx);
    spawn_enemies(state, config);
    if !update_enemies(state, config, surface, &ctx) {
        return;
    }
    update_bullets(state, config, surface, &ctx);
}

fn update_player(
    state: &mut GameState,
    config: &Config,
    input: &InputState,
    surface: &mut dyn Surface,
    ctx: &DrawContext<'_>,
) {
    let Some(player) = state.player.as_mut() else {
        return;
    };
    player.handle_input(input);
    player.update(config);
    if let Some(bullet) = player.try_fire(state.frame_count, config) {
        state.world.spawn(Body::Bullet(bullet));
    }
    player.draw(surface, ctx);
}

fn spawn_enemies(state: &mut GameState, config: &Config) {
    if !spawn_due(state.frame_count, config.enemy_spawn_rate) {
        return;
    }
    let playfield = state.playfield;
    let enemy = Enemy::spawn(config, &playfield, state.rng_mut());
    log::trace!("Enemy spawned at x={:.1} (frame {})", enemy.pos.x, state.frame_count);
    state.world.spawn(Body::Enemy(enemy));
}

/// Move, cull and collide enemies with the player.
///
/// Returns false once the session has ended; the rest of the tick is skipped.
fn update_enemies(
    state: &mut GameState,
    config: &Config,
    surface: &mut dyn Surface,
    ctx: &DrawContext<'_>,
) -> bool {
    for id in state.world.enemy_ids() {
        let Some(Body::Enemy(enemy)) = state.world.get_mut(id) else {
            continue;
        };
        enemy.update(config);
        enemy.draw(surface, ctx);

        if enemy.is_off_screen(&state.playfield) {
            state.world.remove(id);
            continue;
        }

        let bounds = enemy.bounds();
        let hit_player = !state.invulnerable
            && state
                .player
                .as_ref()
                .is_some_and(|player| collides(&bounds, &player.bounds()));
        if !hit_player {
            continue;
        }

        state.world.remove(id);
        state.lives = state.lives.saturating_sub(1);
        state.invulnerable = true;
        state.invulnerable_timer = 0;
        state.publish_hud();
        log::debug!(
            "Player hit at frame {} ({} lives left)",
            state.frame_count,
            state.lives
        );

        if state.lives == 0 {
            state.end(false);
            return false;
        }
    }
    true
}

/// Move bullets and resolve hits; each bullet kills at most one enemy
fn update_bullets(
    state: &mut GameState,
    config: &Config,
    surface: &mut dyn Surface,
    ctx: &DrawContext<'_>,
) {
    for id in state.world.bullet_ids() {
        let Some(Body::Bullet(bullet)) = state.world.get_mut(id) else {
            continue;
        };
        bullet.update(config);
        bullet.draw(surface, ctx);

        if bullet.is_off_screen() {
            state.world.remove(id);
            continue;
        }

        let bounds = bullet.bounds();
        let target = state
            .world
            .enemies()
            .find(|(_, enemy)| collides(&bounds, &enemy.bounds()))
            .map(|(enemy_id, _)| enemy_id);

        if let Some(enemy_id) = target {
            state.world.remove(id);
            state.world.remove(enemy_id);
            state.score = state.score.saturating_add_signed(config.points_per_kill());
            state.publish_hud();
            log::debug!("Enemy destroyed, score {}", state.score);
        }
    }
}
