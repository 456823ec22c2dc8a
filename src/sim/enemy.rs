//! Enemy state machine
//!
//! `Aim → Dash → Recovery → Rest → Aim`. `KnockBack`/`DashKnockBack`
//! interrupt any live state and settle into `Rest`. Falling off the platform
//! leads to `Dead → Inactive`, after which the enemy is reaped.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collider::{ColliderRegistry, ContactKind};
use super::combat::{Knock, Stance};
use super::entity::{Body, EnemyId, Owner};
use super::event::GameEvent;
use super::vector::Vector2Ext;
use crate::audio::AudioCue;
use crate::consts::ARENA_CENTER;
use crate::tuning::Tuning;
use crate::{heading_to, normalize_angle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    Aim,
    Dash,
    KnockBack,
    DashKnockBack,
    Rest,
    Recovery,
    Dead,
    Inactive,
}

/// What the enemy needs to know about the player this tick
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub player_pos: Vec2,
    /// Player is neither knocked back nor dead
    pub player_open: bool,
    /// Session clock, seconds
    pub time: f32,
    pub dt: f32,
}

/// Result of an enemy leaving the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fall {
    /// Caught itself and bounced back
    Caught,
    /// Went over; carries the combo snapshot to score with
    Eliminated { combo: u32 },
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: EnemyId,
    pub body: Body,
    pub state: EnemyState,
    /// Facing, radians
    pub rotation: f32,
    /// Pull-back charge in `[0, 1]`
    pub charge: f32,
    /// Combo value snapshotted when last struck by a dash hit
    pub combo: u32,
    dash_end: Vec2,
    rest_until: f32,
}

impl Enemy {
    pub fn spawn(colliders: &mut ColliderRegistry, id: EnemyId, pos: Vec2, tuning: &Tuning) -> Self {
        let body = Body::spawn(
            colliders,
            Owner::Enemy(id),
            pos,
            tuning.enemy_radius,
            &[ContactKind::Enter, ContactKind::Exit],
        );
        Self {
            id,
            body,
            state: EnemyState::Aim,
            rotation: heading_to(pos, ARENA_CENTER),
            charge: 0.0,
            combo: 1,
            dash_end: pos,
            rest_until: 0.0,
        }
    }

    /// Dead or inactive
    #[inline]
    pub fn is_down(&self) -> bool {
        matches!(self.state, EnemyState::Dead | EnemyState::Inactive)
    }

    pub fn stance(&self) -> Stance {
        match self.state {
            EnemyState::Dash => Stance::Dashing,
            EnemyState::KnockBack => Stance::Reeling,
            EnemyState::DashKnockBack => Stance::DashReeling,
            EnemyState::Dead | EnemyState::Inactive => Stance::Down,
            EnemyState::Aim | EnemyState::Rest | EnemyState::Recovery => Stance::Neutral,
        }
    }

    pub fn dash_end(&self) -> Vec2 {
        self.dash_end
    }

    pub fn rest_until(&self) -> f32 {
        self.rest_until
    }

    /// Run one tick of state logic
    pub fn update<R: Rng>(
        &mut self,
        colliders: &mut ColliderRegistry,
        ctx: &EnemyContext,
        tuning: &Tuning,
        rng: &mut R,
        events: &mut Vec<GameEvent>,
    ) {
        match self.state {
            EnemyState::Aim => self.aim(ctx, tuning, events),
            EnemyState::Dash => {
                let arrived = self.body.pos().dist(self.dash_end) <= tuning.enemy_dash_arrive;
                let stalled = self.body.speed() < tuning.enemy_recover_speed;
                if arrived || stalled {
                    self.state = EnemyState::Recovery;
                }
            }
            EnemyState::Recovery | EnemyState::KnockBack | EnemyState::DashKnockBack => {
                if self.body.speed() < tuning.enemy_recover_speed {
                    let rest = rng.random_range(tuning.rest_min..=tuning.rest_max);
                    self.rest_until = ctx.time + rest;
                    self.state = EnemyState::Rest;
                }
            }
            EnemyState::Rest => {
                self.combo = 1;
                if ctx.time >= self.rest_until {
                    self.state = EnemyState::Aim;
                    self.charge = 0.0;
                }
            }
            EnemyState::Dead => {
                let next = (self.body.radius() - tuning.death_shrink).max(0.0);
                self.body.set_radius(colliders, next);
                if next <= 0.0 {
                    self.state = EnemyState::Inactive;
                }
            }
            EnemyState::Inactive => {}
        }
    }

    fn aim(&mut self, ctx: &EnemyContext, tuning: &Tuning, events: &mut Vec<GameEvent>) {
        let pos = self.body.pos();
        let desired = heading_to(pos, ctx.player_pos);

        // Turn along the shorter arc, without overshooting
        let diff = normalize_angle(desired - self.rotation);
        self.rotation = if diff.abs() <= tuning.enemy_turn_rate {
            desired
        } else {
            normalize_angle(self.rotation + tuning.enemy_turn_rate * diff.signum())
        };

        self.charge = (self.charge + ctx.dt / tuning.enemy_aim_time).min(1.0);

        let aligned = normalize_angle(desired - self.rotation).abs() <= tuning.enemy_align_tolerance;
        if self.charge >= 1.0 && aligned && ctx.player_open {
            let mut dir = Vec2::from_points(pos, ctx.player_pos).unit();
            if dir == Vec2::ZERO {
                dir = Vec2::from_heading(self.rotation);
            }
            self.body.vel = dir * tuning.enemy_dash_speed;
            self.dash_end = pos + dir * tuning.enemy_dash_distance;
            self.charge = 0.0;
            self.state = EnemyState::Dash;
            events.push(GameEvent::Cue(AudioCue::Dash));
        }
    }

    /// Apply a collision knockback
    pub fn knock(&mut self, vel: Vec2, knock: Knock) {
        if self.is_down() {
            return;
        }
        self.body.vel = vel;
        self.charge = 0.0;
        self.state = match knock {
            Knock::KnockBack => EnemyState::KnockBack,
            Knock::DashKnockBack => EnemyState::DashKnockBack,
        };
    }

    /// Handle leaving the platform
    ///
    /// Only a dashing or recovering enemy gets a catch roll. `None` when the
    /// enemy was already down.
    pub fn fall<R: Rng>(&mut self, rng: &mut R, tuning: &Tuning) -> Option<Fall> {
        if self.is_down() {
            return None;
        }

        let may_catch = matches!(self.state, EnemyState::Dash | EnemyState::Recovery);
        if may_catch && rng.random_bool(tuning.catch_chance) {
            let mut back = -self.body.vel.unit();
            if back == Vec2::ZERO {
                back = Vec2::from_points(self.body.pos(), ARENA_CENTER).unit();
            }
            self.body.vel = back * tuning.catch_speed;
            self.charge = 0.0;
            self.state = EnemyState::KnockBack;
            return Some(Fall::Caught);
        }

        self.state = EnemyState::Dead;
        self.charge = 0.0;
        Some(Fall::Eliminated { combo: self.combo })
    }
}
