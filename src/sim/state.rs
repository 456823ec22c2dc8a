//! Game state and the simulation context
//!
//! [`GameState`] splits into the collider registry and the [`World`] that owns
//! every entity plus the shared session values (combo, score, level, clock).
//! The split lets the registry borrow the world mutably as its contact
//! listener while it scans.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collider::{ColliderRegistry, Contact, ContactKind, ContactListener};
use super::combat::{Fighter, Reaction, Rebound, resolve_impact};
use super::combo::{Combo, elimination_bonus};
use super::enemy::{Enemy, EnemyContext, EnemyState, Fall};
use super::entity::{Body, EnemyId, EntityTag, Owner};
use super::event::GameEvent;
use super::player::{Player, PlayerState};
use super::tick::TickInput;
use super::tutorial::Tutorial;
use super::vector::Vector2Ext;
use crate::audio::AudioCue;
use crate::consts::ARENA_CENTER;
use crate::tuning::{Tuning, TuningError};
use crate::view::{self, EntityView, Hud};

/// Everything the simulation mutates, apart from the colliders
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    /// Run seed for reproducibility
    pub seed: u64,
    pub platform: Body,
    pub player: Player,
    /// Live enemies (sorted by id for determinism)
    pub enemies: Vec<Enemy>,
    /// Shared combo counter
    pub combo: Combo,
    pub score: u64,
    /// Current level (0 until the first wave spawns)
    pub level: u32,
    /// Ticks of hit-stop remaining
    pub hit_stop: u32,
    /// Session clock, seconds
    pub time: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Set once the last life is gone
    pub game_over: bool,
    pub tutorial: Tutorial,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_enemy_id: u32,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub colliders: ColliderRegistry,
    pub world: World,
}

impl GameState {
    /// Create a session with the stock tuning
    pub fn new(seed: u64) -> Self {
        Self::build(Tuning::default(), seed)
    }

    /// Create a session with custom tuning, rejecting values the simulation
    /// cannot run with
    pub fn with_tuning(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::build(tuning, seed))
    }

    /// Session that opens with the tutorial
    pub fn with_tutorial(tuning: Tuning, seed: u64) -> Result<Self, TuningError> {
        let mut state = Self::with_tuning(tuning, seed)?;
        state.world.tutorial = Tutorial::new(0.0);
        Ok(state)
    }

    fn build(tuning: Tuning, seed: u64) -> Self {
        let mut colliders = ColliderRegistry::new();
        let platform = Body::spawn(
            &mut colliders,
            Owner::Platform,
            ARENA_CENTER,
            tuning.platform_radius,
            &[],
        );
        let player = Player::spawn(&mut colliders, &tuning);

        log::info!("New session (seed {seed})");
        Self {
            colliders,
            world: World {
                tuning,
                seed,
                platform,
                player,
                enemies: Vec::new(),
                combo: Combo::new(),
                score: 0,
                level: 0,
                hit_stop: 0,
                time: 0.0,
                time_ticks: 0,
                game_over: false,
                tutorial: Tutorial::disabled(),
                events: Vec::new(),
                rng: Pcg32::seed_from_u64(seed),
                next_enemy_id: 1,
            },
        }
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.drain_events()
    }

    pub fn views(&self) -> Vec<EntityView> {
        view::snapshot(&self.world)
    }

    pub fn hud(&self) -> Hud {
        view::hud(&self.world)
    }
}

impl World {
    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.enemies[i])
    }

    pub fn enemy_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &mut self.enemies[i])
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    fn fighter(&self, owner: Owner) -> Option<Fighter> {
        match owner {
            Owner::Player => Some(Fighter {
                pos: self.player.body.pos(),
                vel: self.player.body.vel,
                stance: self.player.stance(),
            }),
            Owner::Enemy(id) => self.enemy(id).map(|e| Fighter {
                pos: e.body.pos(),
                vel: e.body.vel,
                stance: e.stance(),
            }),
            Owner::Platform => None,
        }
    }

    fn apply(&mut self, owner: Owner, reaction: Reaction) {
        match owner {
            Owner::Player => self.player.knock(reaction.vel),
            Owner::Enemy(id) => {
                if let Some(enemy) = self.enemy_mut(id) {
                    enemy.knock(reaction.vel, reaction.knock);
                }
            }
            Owner::Platform => {}
        }
    }

    fn impact(&mut self, colliders: &mut ColliderRegistry, contact: Contact, a: Owner, b: Owner) {
        let (Some(fa), Some(fb)) = (self.fighter(a), self.fighter(b)) else {
            return;
        };
        let rebound = Rebound {
            passive: self.tuning.rebound_speed,
            dash: self.tuning.dash_rebound_speed,
        };
        let Some(impact) = resolve_impact(&fa, &fb, rebound) else {
            return;
        };

        self.apply(a, impact.a);
        self.apply(b, impact.b);
        // The mirrored pair must not resolve this impact again
        colliders.mark_touching(contact.other, contact.collider);
        self.events.push(GameEvent::Cue(AudioCue::Hit));

        if impact.dash_hit {
            let value = self.combo.hit();
            let struck = if impact.a_faster { b } else { a };
            if let Owner::Enemy(id) = struck {
                if let Some(enemy) = self.enemy_mut(id) {
                    enemy.combo = value;
                }
            }
            if let Some(tier) = self.combo.tier() {
                log::debug!("Combo tier {tier} (x{value})");
                self.events.push(GameEvent::Cue(AudioCue::ComboTier(tier)));
            }
        }

        if impact.speed >= self.tuning.hit_stop_speed {
            self.hit_stop = self.hit_stop.max(self.tuning.hit_stop_frames);
        }

        log::debug!(
            "Impact {:?} -> {:?} at speed {:.1} (dash hit: {})",
            if impact.a_faster { a } else { b },
            if impact.a_faster { b } else { a },
            impact.speed,
            impact.dash_hit
        );
    }

    fn player_fell(&mut self) {
        if !self.player.kill() {
            return;
        }
        log::info!("Player fell off the platform");
        self.combo.reset();
        self.events.push(GameEvent::Cue(AudioCue::Fall));
    }

    fn enemy_fell(&mut self, id: EnemyId) {
        let Some(enemy) = self.enemies.iter_mut().find(|e| e.id == id) else {
            return;
        };
        match enemy.fall(&mut self.rng, &self.tuning) {
            Some(Fall::Caught) => {
                log::debug!("Enemy {} caught itself at the edge", id.0);
                self.events.push(GameEvent::EnemyCaught { id });
            }
            Some(Fall::Eliminated { combo }) => {
                let bonus = elimination_bonus(self.tuning.combo_base, combo);
                self.score = self.score.saturating_add(bonus);
                log::info!("Enemy {} eliminated (combo x{combo}, +{bonus})", id.0);
                self.events.push(GameEvent::Cue(AudioCue::Fall));
                self.events.push(GameEvent::EnemyEliminated { id, combo, bonus });
            }
            None => {}
        }
    }

    /// Death shrink finished: spend a life, then respawn or end the session
    fn player_vanished(&mut self, colliders: &mut ColliderRegistry) {
        self.events.push(GameEvent::Cue(AudioCue::Death));

        if !self.tutorial.is_active() {
            self.player.lives = self.player.lives.saturating_sub(1);
        }

        if self.player.lives > 0 {
            self.respawn_player(colliders);
            return;
        }

        log::info!("Lives exhausted, final score {}", self.score);
        self.events.push(GameEvent::LivesExhausted);
        if !self.game_over {
            self.game_over = true;
            self.events.push(GameEvent::GameOver { score: self.score });
        }
    }

    fn respawn_player(&mut self, colliders: &mut ColliderRegistry) {
        self.player.respawn(colliders, &self.tuning);
        self.combo.reset();

        // Push anything standing on the spawn point out of the way
        let crowding = colliders.circle_check(
            ARENA_CENTER,
            self.tuning.player_radius,
            Some(&[EntityTag::Enemy]),
        );
        let clear = self.tuning.respawn_clear_distance;
        for collider in crowding {
            let Some(Owner::Enemy(id)) = colliders.owner(collider) else {
                continue;
            };
            if let Some(enemy) = self.enemy_mut(id) {
                let mut dir = Vec2::from_points(ARENA_CENTER, enemy.body.pos()).unit();
                if dir == Vec2::ZERO {
                    dir = Vec2::X;
                }
                enemy.body.set_position(colliders, ARENA_CENTER + dir * clear);
            }
        }

        log::info!("Player respawned ({} lives left)", self.player.lives);
        self.events.push(GameEvent::PlayerRespawned {
            lives: self.player.lives,
        });
    }

    /// State logic then integration for every entity
    pub(crate) fn update_entities(&mut self, colliders: &mut ColliderRegistry, input: &TickInput, dt: f32) {
        let friction = self.tuning.friction;
        let epsilon = self.tuning.velocity_epsilon;

        if self.player.update(colliders, input, self.time, &self.tuning, &mut self.events) {
            self.player_vanished(colliders);
        }
        self.player.body.integrate(colliders, friction, epsilon);

        let ctx = EnemyContext {
            player_pos: self.player.body.pos(),
            player_open: !matches!(self.player.state, PlayerState::KnockBack | PlayerState::Dead),
            time: self.time,
            dt,
        };
        for enemy in &mut self.enemies {
            enemy.update(colliders, &ctx, &self.tuning, &mut self.rng, &mut self.events);
            if enemy.state != EnemyState::Inactive {
                enemy.body.integrate(colliders, friction, epsilon);
            }
        }
    }

    /// Remove inactive enemies and their colliders
    pub(crate) fn reap(&mut self, colliders: &mut ColliderRegistry) {
        self.enemies.retain_mut(|enemy| {
            if enemy.state == EnemyState::Inactive {
                enemy.body.destroy(colliders);
                false
            } else {
                true
            }
        });
    }

    /// Start the next level once the roster is empty
    pub(crate) fn advance_level(&mut self, colliders: &mut ColliderRegistry) {
        if self.game_over || self.tutorial.is_active() || !self.enemies.is_empty() {
            return;
        }

        self.level += 1;
        let count = self
            .tuning
            .enemies_per_level
            .saturating_mul(self.level)
            .min(self.tuning.max_enemies)
            .max(1);
        self.spawn_enemies(colliders, count);

        log::info!("Level {} ({} enemies)", self.level, count);
        self.events.push(GameEvent::Cue(AudioCue::LevelUp));
        self.events.push(GameEvent::LevelUp { level: self.level });
    }

    /// Spawn `count` enemies evenly spaced on the spawn ring
    fn spawn_enemies(&mut self, colliders: &mut ColliderRegistry, count: u32) {
        let ring = self.tuning.platform_radius * self.tuning.spawn_ring;
        let offset = self.rng.random_range(0.0..TAU);
        for i in 0..count {
            let angle = offset + i as f32 * TAU / count as f32;
            let pos = ARENA_CENTER + Vec2::from_heading(angle) * ring;
            let id = EnemyId(self.next_enemy_id);
            self.next_enemy_id += 1;
            self.enemies.push(Enemy::spawn(colliders, id, pos, &self.tuning));
        }
    }
}

impl ContactListener for World {
    fn on_contact(&mut self, colliders: &mut ColliderRegistry, contact: Contact) {
        let (Some(owner), Some(other)) = (colliders.owner(contact.collider), colliders.owner(contact.other)) else {
            return;
        };
        match (contact.kind, owner, other) {
            (ContactKind::Exit, Owner::Player, Owner::Platform) => self.player_fell(),
            (ContactKind::Exit, Owner::Enemy(id), Owner::Platform) => self.enemy_fell(id),
            (ContactKind::Enter, Owner::Player | Owner::Enemy(_), Owner::Player | Owner::Enemy(_)) => {
                self.impact(colliders, contact, owner, other)
            }
            _ => {}
        }
    }
}
