//! Player state machine
//!
//! `Move → Aim → Dash → Move`, with `KnockBack` interrupting and `Dead`
//! entered on falling off the platform.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::{ColliderRegistry, ContactKind};
use super::combat::Stance;
use super::entity::{Body, Owner};
use super::event::GameEvent;
use super::tick::TickInput;
use super::vector::Vector2Ext;
use crate::audio::AudioCue;
use crate::consts::ARENA_CENTER;
use crate::heading_to;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerState {
    /// Walking under direct control
    Move,
    /// Holding charge; `started` is the session time the charge began
    Aim { started: f32 },
    /// Launched toward the cursor
    Dash,
    /// Struck; control returns once slowed down
    KnockBack,
    /// Fell off; shrinking toward a respawn or game over
    Dead,
}

#[derive(Debug, Clone)]
pub struct Player {
    pub body: Body,
    pub state: PlayerState,
    pub lives: u32,
    /// Aim charge in `[0, 1]`
    pub charge: f32,
    /// Facing, radians; tracks the cursor
    pub rotation: f32,
}

impl Player {
    /// Spawn at the arena center
    pub fn spawn(colliders: &mut ColliderRegistry, tuning: &Tuning) -> Self {
        let body = Body::spawn(
            colliders,
            Owner::Player,
            ARENA_CENTER,
            tuning.player_radius,
            &[ContactKind::Enter, ContactKind::Exit],
        );
        Self {
            body,
            state: PlayerState::Move,
            lives: tuning.player_lives,
            charge: 0.0,
            rotation: 0.0,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.state == PlayerState::Dead
    }

    pub fn stance(&self) -> Stance {
        match self.state {
            PlayerState::Dash => Stance::Dashing,
            PlayerState::KnockBack => Stance::Reeling,
            PlayerState::Dead => Stance::Down,
            PlayerState::Move | PlayerState::Aim { .. } => Stance::Neutral,
        }
    }

    fn begin_aim(&mut self, time: f32) {
        self.state = PlayerState::Aim { started: time };
        self.charge = 0.0;
    }

    /// Run one tick of state logic
    ///
    /// Returns true on the tick the death shrink reaches zero.
    pub fn update(
        &mut self,
        colliders: &mut ColliderRegistry,
        input: &TickInput,
        time: f32,
        tuning: &Tuning,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        let pos = self.body.pos();
        if self.state != PlayerState::Dead && pos.dist(input.cursor) > f32::EPSILON {
            self.rotation = heading_to(pos, input.cursor);
        }

        match self.state {
            PlayerState::Move => {
                self.body.vel = input.direction() * tuning.player_speed;
                if input.charge {
                    self.begin_aim(time);
                }
            }
            PlayerState::Aim { started } => {
                let elapsed = (time - started).max(0.0);
                self.charge = (elapsed / tuning.max_aim_time).sqrt().min(1.0);
                if !input.charge {
                    let dir = Vec2::from_points(pos, input.cursor).unit();
                    self.body.vel = dir * tuning.max_dash_speed * self.charge;
                    self.state = PlayerState::Dash;
                    events.push(GameEvent::Cue(AudioCue::Dash));
                }
            }
            PlayerState::Dash => {
                if input.charge {
                    self.begin_aim(time);
                } else if self.body.speed() < tuning.player_speed / 2.0 {
                    self.state = PlayerState::Move;
                }
            }
            PlayerState::KnockBack => {
                if self.body.speed() < tuning.knockback_end_speed {
                    self.state = PlayerState::Move;
                }
            }
            PlayerState::Dead => {
                let radius = self.body.radius();
                if radius <= 0.0 {
                    return false;
                }
                let next = (radius - tuning.death_shrink).max(0.0);
                self.body.set_radius(colliders, next);
                return next <= 0.0;
            }
        }
        false
    }

    /// Apply a collision knockback
    pub fn knock(&mut self, vel: Vec2) {
        if self.is_dead() {
            return;
        }
        self.body.vel = vel;
        self.state = PlayerState::KnockBack;
        self.charge = 0.0;
    }

    /// Enter `Dead`; false if already dead
    pub fn kill(&mut self) -> bool {
        if self.is_dead() {
            return false;
        }
        self.state = PlayerState::Dead;
        self.charge = 0.0;
        true
    }

    /// Back to the center at full size
    pub fn respawn(&mut self, colliders: &mut ColliderRegistry, tuning: &Tuning) {
        self.body.set_position(colliders, ARENA_CENTER);
        self.body.set_radius(colliders, tuning.player_radius);
        self.body.vel = Vec2::ZERO;
        self.state = PlayerState::Move;
        self.charge = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (ColliderRegistry, Tuning, Player) {
        let mut reg = ColliderRegistry::new();
        let tuning = Tuning::default();
        let player = Player::spawn(&mut reg, &tuning);
        (reg, tuning, player)
    }

    fn input(charge: bool, cursor: Vec2) -> TickInput {
        TickInput {
            charge,
            cursor,
            ..Default::default()
        }
    }

    #[test]
    fn test_move_follows_input() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        let inp = TickInput {
            right: true,
            down: true,
            ..Default::default()
        };
        player.update(&mut reg, &inp, 0.0, &tuning, &mut events);
        assert!((player.body.speed() - tuning.player_speed).abs() < 1e-4);
        assert!(player.body.vel.x > 0.0 && player.body.vel.y > 0.0);
    }

    #[test]
    fn test_charge_and_release_dashes_at_cursor() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        let cursor = Vec2::new(100.0, 0.0);

        player.update(&mut reg, &input(true, cursor), 0.0, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::Aim { started: 0.0 });

        // A quarter of the max aim time gives half charge
        player.update(&mut reg, &input(true, cursor), 0.25, &tuning, &mut events);
        assert!((player.charge - 0.5).abs() < 1e-5);

        // Held past the max, release at full charge
        player.update(&mut reg, &input(false, cursor), 2.0, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::Dash);
        assert!((player.body.vel - Vec2::new(tuning.max_dash_speed, 0.0)).length() < 1e-3);
        assert_eq!(events, vec![GameEvent::Cue(AudioCue::Dash)]);
    }

    #[test]
    fn test_dash_slows_into_move() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        player.state = PlayerState::Dash;
        player.body.vel = Vec2::new(tuning.player_speed / 2.0 - 0.1, 0.0);
        player.update(&mut reg, &TickInput::default(), 0.0, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::Move);
    }

    #[test]
    fn test_dash_can_chain_into_aim() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        player.state = PlayerState::Dash;
        player.body.vel = Vec2::new(30.0, 0.0);
        player.update(&mut reg, &input(true, Vec2::X), 1.5, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::Aim { started: 1.5 });
    }

    #[test]
    fn test_knockback_ends_when_slow() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        player.knock(Vec2::new(2.0, 0.0));
        player.update(&mut reg, &TickInput::default(), 0.0, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::KnockBack);

        player.body.vel = Vec2::new(0.4, 0.0);
        player.update(&mut reg, &TickInput::default(), 0.0, &tuning, &mut events);
        assert_eq!(player.state, PlayerState::Move);
    }

    #[test]
    fn test_dead_shrinks_then_signals_once() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        assert!(player.kill());
        assert!(!player.kill());

        let expected = (tuning.player_radius / tuning.death_shrink).ceil() as usize;
        let mut ticks = 0;
        while !player.update(&mut reg, &TickInput::default(), 0.0, &tuning, &mut events) {
            ticks += 1;
            assert!(ticks < 1000);
        }
        assert_eq!(ticks + 1, expected);
        assert_eq!(reg.get(player.body.collider()).unwrap().radius, 0.0);

        // Stays spent
        assert!(!player.update(&mut reg, &TickInput::default(), 0.0, &tuning, &mut events));
    }

    #[test]
    fn test_respawn_restores_body() {
        let (mut reg, tuning, mut player) = setup();
        player.body.set_position(&mut reg, Vec2::new(500.0, 0.0));
        player.body.vel = Vec2::new(3.0, 0.0);
        player.kill();
        player.body.set_radius(&mut reg, 0.0);

        player.respawn(&mut reg, &tuning);
        assert_eq!(player.state, PlayerState::Move);
        assert_eq!(player.body.pos(), ARENA_CENTER);
        assert_eq!(player.body.vel, Vec2::ZERO);
        assert_eq!(player.body.radius(), tuning.player_radius);
    }

    #[test]
    fn test_faces_cursor() {
        let (mut reg, tuning, mut player) = setup();
        let mut events = Vec::new();
        player.update(&mut reg, &input(false, Vec2::new(0.0, 10.0)), 0.0, &tuning, &mut events);
        assert!((player.rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    }
}
