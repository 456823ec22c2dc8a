//! Render snapshot
//!
//! The renderer never reads simulation internals. Each frame it asks for one
//! [`EntityView`] per live entity plus a [`Hud`] summary.

use serde::Serialize;

use crate::sim::{EnemyState, EntityTag, PlayerState, World};

/// Coarse animation state for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VisualState {
    Idle,
    Moving,
    Aiming,
    Dashing,
    KnockedBack,
    Recovering,
    Resting,
    Falling,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityView {
    pub tag: EntityTag,
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Facing, radians
    pub rotation: f32,
    pub visual: VisualState,
    /// Aim charge in `[0, 1]`
    pub charge: f32,
}

/// Session summary for overlays
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub score: u64,
    pub lives: u32,
    pub level: u32,
    pub combo: u32,
    /// Tutorial prompt identifier, if one is showing
    pub prompt: Option<&'static str>,
    pub game_over: bool,
}

/// One view per live entity: platform, player, then enemies by id
pub fn snapshot(world: &World) -> Vec<EntityView> {
    let mut views = Vec::with_capacity(2 + world.enemies.len());

    let platform = &world.platform;
    views.push(EntityView {
        tag: EntityTag::Platform,
        x: platform.pos().x,
        y: platform.pos().y,
        radius: platform.radius(),
        rotation: 0.0,
        visual: VisualState::Idle,
        charge: 0.0,
    });

    let player = &world.player;
    let visual = match player.state {
        PlayerState::Move if player.body.vel == glam::Vec2::ZERO => VisualState::Idle,
        PlayerState::Move => VisualState::Moving,
        PlayerState::Aim { .. } => VisualState::Aiming,
        PlayerState::Dash => VisualState::Dashing,
        PlayerState::KnockBack => VisualState::KnockedBack,
        PlayerState::Dead => VisualState::Falling,
    };
    views.push(EntityView {
        tag: EntityTag::Player,
        x: player.body.pos().x,
        y: player.body.pos().y,
        radius: player.body.radius(),
        rotation: player.rotation,
        visual,
        charge: player.charge,
    });

    for enemy in &world.enemies {
        let visual = match enemy.state {
            EnemyState::Aim => VisualState::Aiming,
            EnemyState::Dash => VisualState::Dashing,
            EnemyState::KnockBack | EnemyState::DashKnockBack => VisualState::KnockedBack,
            EnemyState::Recovery => VisualState::Recovering,
            EnemyState::Rest => VisualState::Resting,
            EnemyState::Dead => VisualState::Falling,
            EnemyState::Inactive => continue,
        };
        views.push(EntityView {
            tag: EntityTag::Enemy,
            x: enemy.body.pos().x,
            y: enemy.body.pos().y,
            radius: enemy.body.radius(),
            rotation: enemy.rotation,
            visual,
            charge: enemy.charge,
        });
    }

    views
}

pub fn hud(world: &World) -> Hud {
    Hud {
        score: world.score,
        lives: world.player.lives,
        level: world.level,
        combo: world.combo.value(),
        prompt: world.tutorial.prompt(world.player.is_dead()),
        game_over: world.game_over,
    }
}
