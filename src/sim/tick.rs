//! Fixed timestep simulation tick
//!
//! Per tick: tutorial input, contact events (which resolve impacts on the
//! spot), state machines plus integration unless a hit-stop is running,
//! reaping, then level progression.

use std::cmp::Ordering;

use glam::Vec2;

use super::event::GameEvent;
use super::player::PlayerState;
use super::state::{GameState, World};
use crate::consts::ARENA_CENTER;

/// Input commands for a single tick
///
/// World coordinates are y-up: `up` moves toward +y.
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Charge (aim) button held
    pub charge: bool,
    /// Cursor position in world coordinates
    pub cursor: Vec2,
    /// Start/confirm pressed
    pub start: bool,
    /// Skip the tutorial
    pub skip_tutorial: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Unit movement direction from the axis buttons (zero when idle or cancelled out)
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.down, self.up)).normalize_or_zero()
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let GameState { colliders, world } = state;

    if world.game_over {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(world, &mut input);
    }

    if let Some(stage) = world.tutorial.update(&input, &world.player, world.time) {
        world.push_event(GameEvent::Tutorial(stage));
    }

    colliders.update(world);

    if world.hit_stop > 0 {
        world.hit_stop -= 1;
    } else {
        world.update_entities(colliders, &input, dt);
    }

    world.reap(colliders);
    world.advance_level(colliders);

    world.time += dt;
    world.time_ticks += 1;
}

/// Demo player: chase the nearest enemy, charge fully, dash at it, and drift
/// back toward the middle when close to the edge
fn autopilot(world: &World, input: &mut TickInput) {
    let player = &world.player;
    let pos = player.body.pos();

    input.skip_tutorial |= world.tutorial.is_active();

    let target = world
        .enemies
        .iter()
        .filter(|e| !e.is_down())
        .min_by(|a, b| {
            let dist_a = a.body.pos().distance(pos);
            let dist_b = b.body.pos().distance(pos);
            dist_a.partial_cmp(&dist_b).unwrap_or(Ordering::Equal)
        });

    let safe_radius = world.tuning.platform_radius * 0.5;
    let to_center = ARENA_CENTER - pos;
    let steer = if to_center.length() > safe_radius {
        to_center
    } else if let Some(enemy) = target {
        enemy.body.pos() - pos
    } else {
        Vec2::ZERO
    };
    input.right = steer.x > 1.0;
    input.left = steer.x < -1.0;
    input.up = steer.y > 1.0;
    input.down = steer.y < -1.0;

    input.charge = false;
    if let Some(enemy) = target {
        let enemy_pos = enemy.body.pos();
        input.cursor = enemy_pos;
        input.charge = match player.state {
            PlayerState::Move => {
                to_center.length() <= safe_radius && enemy_pos.distance(pos) < safe_radius
            }
            PlayerState::Aim { .. } => player.charge < 1.0,
            _ => false,
        };
    }
}
