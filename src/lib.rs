//! Sumo Brawl - a circular-platform arena brawler
//!
//! Core modules:
//! - `sim`: Collision registry, entity state machines, combat and combo scoring
//! - `tuning`: Data-driven game balance
//! - `audio`: Cue identifiers handed to the host's audio backend
//! - `view`: Per-entity render snapshot for the host's renderer
//! - `highscores`: Leaderboard fed by end-of-session scores

pub mod audio;
pub mod highscores;
pub mod sim;
pub mod tuning;
pub mod view;

pub use highscores::HighScores;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per animation frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Arena center (platform is centered on the origin)
    pub const ARENA_CENTER: glam::Vec2 = glam::Vec2::ZERO;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    angle = angle.rem_euclid(TAU);
    if angle >= PI {
        angle -= TAU;
    }
    angle
}

/// Heading (radians) of the direction from `from` toward `to`
#[inline]
pub fn heading_to(from: glam::Vec2, to: glam::Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normalize_angle_wraps() {
        assert!((normalize_angle(5.0 * PI / 2.0) - PI / 2.0).abs() < 1e-4);
        assert!((normalize_angle(3.0 * PI / 2.0) - (-PI / 2.0)).abs() < 1e-4);
        assert!((normalize_angle(-3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-4);
        assert_eq!(normalize_angle(0.0), 0.0);
        assert_eq!(normalize_angle(f32::NAN), 0.0);
    }

    #[test]
    fn test_heading_to() {
        let h = heading_to(glam::Vec2::ZERO, glam::Vec2::new(0.0, 10.0));
        assert!((h - PI / 2.0).abs() < 1e-5);
    }
}
