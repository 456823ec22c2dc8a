//! Data-driven game balance
//!
//! Every gameplay constant lives in [`Tuning`]. Defaults reproduce the stock
//! game; a JSON document may override any subset of fields. Velocities are in
//! world units per tick, durations in seconds.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating tuning data
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Balance constants for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Arena ===
    /// Platform (arena boundary) radius
    pub platform_radius: f32,
    /// Distance from center that enemies spawn at, as a fraction of the platform radius
    pub spawn_ring: f32,
    /// Enemies per level (level N spawns N * this, capped by `max_enemies`)
    pub enemies_per_level: u32,
    pub max_enemies: u32,

    // === Universal physics ===
    /// Velocity multiplier applied every tick
    pub friction: f32,
    /// Velocity components below this snap to zero
    pub velocity_epsilon: f32,
    /// Rebound speed for the faster party of a passive bump
    pub rebound_speed: f32,
    /// Rebound speed for a faster party that was dashing
    pub dash_rebound_speed: f32,
    /// Impact speed at or above which hit-stop kicks in
    pub hit_stop_speed: f32,
    /// Frames frozen by a hit-stop
    pub hit_stop_frames: u32,
    /// Radius lost per tick while falling
    pub death_shrink: f32,

    // === Player ===
    pub player_radius: f32,
    pub player_speed: f32,
    pub player_lives: u32,
    /// Seconds to reach full aim charge
    pub max_aim_time: f32,
    /// Dash speed at full charge
    pub max_dash_speed: f32,
    /// Speed under which knockback ends
    pub knockback_end_speed: f32,
    /// Enemies overlapping the spawn point are pushed out to this distance
    pub respawn_clear_distance: f32,

    // === Enemy ===
    pub enemy_radius: f32,
    /// Radians turned per tick while aiming
    pub enemy_turn_rate: f32,
    /// Seconds to charge the pull-back before a dash
    pub enemy_aim_time: f32,
    /// Heading error (radians) accepted as "aligned"
    pub enemy_align_tolerance: f32,
    pub enemy_dash_speed: f32,
    /// Distance from the dash origin to the dash-end point
    pub enemy_dash_distance: f32,
    /// Dash ends once this close to the dash-end point
    pub enemy_dash_arrive: f32,
    /// Speed under which recovery/knockback ends
    pub enemy_recover_speed: f32,
    pub rest_min: f32,
    pub rest_max: f32,
    /// Probability that a dashing/recovering enemy catches itself at the edge
    pub catch_chance: f64,
    /// Speed of the bounce back onto the platform after a catch
    pub catch_speed: f32,

    // === Scoring ===
    /// Elimination bonus is `combo_base * combo²`
    pub combo_base: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            platform_radius: 350.0,
            spawn_ring: 0.6,
            enemies_per_level: 1,
            max_enemies: 8,

            friction: 0.9,
            velocity_epsilon: 0.1,
            rebound_speed: 1.5,
            dash_rebound_speed: 4.0,
            hit_stop_speed: 20.0,
            hit_stop_frames: 4,
            death_shrink: 1.0,

            player_radius: 45.0,
            player_speed: 5.0,
            player_lives: 3,
            max_aim_time: 1.0,
            max_dash_speed: 40.0,
            knockback_end_speed: 0.5,
            respawn_clear_distance: 150.0,

            enemy_radius: 40.0,
            enemy_turn_rate: 0.08,
            enemy_aim_time: 1.0,
            enemy_align_tolerance: 0.1,
            enemy_dash_speed: 25.0,
            enemy_dash_distance: 200.0,
            enemy_dash_arrive: 20.0,
            enemy_recover_speed: 0.5,
            rest_min: 0.5,
            rest_max: 1.5,
            catch_chance: 0.8,
            catch_speed: 10.0,

            combo_base: 100,
        }
    }
}

impl Tuning {
    /// Parse and validate a (possibly partial) JSON document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load and validate a JSON tuning file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.as_ref().display());
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        positive("platform_radius", self.platform_radius)?;
        positive("player_radius", self.player_radius)?;
        positive("enemy_radius", self.enemy_radius)?;
        positive("player_speed", self.player_speed)?;
        positive("max_aim_time", self.max_aim_time)?;
        positive("enemy_aim_time", self.enemy_aim_time)?;
        positive("death_shrink", self.death_shrink)?;
        positive("velocity_epsilon", self.velocity_epsilon)?;
        positive("enemy_turn_rate", self.enemy_turn_rate)?;

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(invalid("friction", format!("{} is outside (0, 1)", self.friction)));
        }
        if !(0.0..=1.0).contains(&self.catch_chance) {
            return Err(invalid(
                "catch_chance",
                format!("{} is not a probability", self.catch_chance),
            ));
        }
        if !(self.spawn_ring > 0.0 && self.spawn_ring < 1.0) {
            return Err(invalid("spawn_ring", format!("{} is outside (0, 1)", self.spawn_ring)));
        }
        let rest_ok = self.rest_min >= 0.0 && self.rest_max >= self.rest_min && self.rest_max.is_finite();
        if !rest_ok {
            return Err(invalid(
                "rest_max",
                format!("rest range {}..{} is inverted or negative", self.rest_min, self.rest_max),
            ));
        }
        if self.player_lives == 0 {
            return Err(invalid("player_lives", "must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, format!("{value} must be positive")))
    }
}

fn invalid(field: &'static str, reason: String) -> TuningError {
    TuningError::Invalid { field, reason }
}
