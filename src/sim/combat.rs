//! Impact resolution between two combatants
//!
//! Runs inside the enter callback of the colliding pair `(a, b)`. The faster
//! side hands its full speed to the slower side along the collision vector and
//! rebounds off it. Speeds that compare equal favor `a`, the side whose enter
//! listener fired.

use glam::Vec2;

use super::vector::Vector2Ext;

/// Combat-relevant summary of a combatant's state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stance {
    /// Moving, aiming, resting or recovering
    Neutral,
    /// Mid-dash
    Dashing,
    /// Knocked back by a passive bump
    Reeling,
    /// Knocked back by a dash hit
    DashReeling,
    /// Dead or inactive; takes no part in collisions
    Down,
}

impl Stance {
    fn dashing(self) -> bool {
        matches!(self, Stance::Dashing | Stance::DashReeling)
    }
}

/// Snapshot of one side of an impact
#[derive(Debug, Clone, Copy)]
pub struct Fighter {
    pub pos: Vec2,
    pub vel: Vec2,
    pub stance: Stance,
}

/// Knockback flavor applied to each side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Knock {
    KnockBack,
    DashKnockBack,
}

/// Outcome for one side
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reaction {
    pub vel: Vec2,
    pub knock: Knock,
}

/// Outcome of an impact between `a` (initiator) and `b`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub a: Reaction,
    pub b: Reaction,
    /// True when `a` was the faster (or equally fast) side
    pub a_faster: bool,
    /// At least one side was dashing: feeds the combo counter
    pub dash_hit: bool,
    /// Speed of the faster side
    pub speed: f32,
}

impl Impact {
    /// Reaction of the slower (struck) side
    pub fn struck(&self) -> &Reaction {
        if self.a_faster { &self.b } else { &self.a }
    }
}

/// Rebound speeds used by [`resolve_impact`]
#[derive(Debug, Clone, Copy)]
pub struct Rebound {
    /// Faster side bumped without dashing
    pub passive: f32,
    /// Faster side was dashing
    pub dash: f32,
}

/// Resolve an impact; `None` when either side is down
pub fn resolve_impact(a: &Fighter, b: &Fighter, rebound: Rebound) -> Option<Impact> {
    if a.stance == Stance::Down || b.stance == Stance::Down {
        return None;
    }

    // Points from a toward b; zero when centers coincide
    let collision = Vec2::from_points(a.pos, b.pos).unit();

    let speed_a = a.vel.mag();
    let speed_b = b.vel.mag();
    let a_faster = speed_a >= speed_b;

    let (faster, slower, away) = if a_faster {
        (a, b, collision)
    } else {
        (b, a, -collision)
    };
    let speed = faster.vel.mag();

    let faster_dashed = faster.stance == Stance::Dashing;
    let faster_reaction = Reaction {
        vel: -away * if faster_dashed { rebound.dash } else { rebound.passive },
        knock: if faster_dashed {
            Knock::DashKnockBack
        } else {
            Knock::KnockBack
        },
    };
    let slower_reaction = Reaction {
        vel: away * speed,
        knock: if faster_dashed && slower.stance != Stance::Neutral {
            Knock::DashKnockBack
        } else {
            Knock::KnockBack
        },
    };

    let (ra, rb) = if a_faster {
        (faster_reaction, slower_reaction)
    } else {
        (slower_reaction, faster_reaction)
    };

    Some(Impact {
        a: ra,
        b: rb,
        a_faster,
        dash_hit: a.stance.dashing() || b.stance.dashing(),
        speed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const REBOUND: Rebound = Rebound {
        passive: 1.5,
        dash: 4.0,
    };

    fn fighter(x: f32, vx: f32, stance: Stance) -> Fighter {
        Fighter {
            pos: Vec2::new(x, 0.0),
            vel: Vec2::new(vx, 0.0),
            stance,
        }
    }

    #[test]
    fn test_dash_into_resting_enemy() {
        let player = fighter(0.0, 40.0, Stance::Dashing);
        let enemy = fighter(50.0, 0.0, Stance::Neutral);

        let impact = resolve_impact(&player, &enemy, REBOUND).unwrap();
        assert!(impact.a_faster);
        assert!(impact.dash_hit);
        assert!((impact.b.vel.mag() - 40.0).abs() < 1e-4);
        assert!(impact.b.vel.x > 0.0, "struck side flies away from the dasher");
        assert_eq!(impact.b.knock, Knock::KnockBack);

        // Small fixed rebound, not zero
        assert!((impact.a.vel.mag() - REBOUND.dash).abs() < 1e-4);
        assert!(impact.a.vel.x < 0.0);
        assert_eq!(impact.a.knock, Knock::DashKnockBack);
    }

    #[test]
    fn test_passive_bump_uses_small_rebound() {
        let a = fighter(0.0, 0.0, Stance::Neutral);
        let b = fighter(30.0, -5.0, Stance::Neutral);

        let impact = resolve_impact(&a, &b, REBOUND).unwrap();
        assert!(!impact.a_faster);
        assert!(!impact.dash_hit);
        // a is pushed away from b (toward -x) at b's speed
        assert!((impact.a.vel - Vec2::new(-5.0, 0.0)).length() < 1e-4);
        // b rebounds away from a
        assert!((impact.b.vel - Vec2::new(1.5, 0.0)).length() < 1e-4);
        assert_eq!(impact.a.knock, Knock::KnockBack);
        assert_eq!(impact.b.knock, Knock::KnockBack);
        assert_eq!(impact.struck(), &impact.a);
    }

    #[test]
    fn test_equal_speeds_favor_initiator() {
        let a = fighter(0.0, 10.0, Stance::Neutral);
        let b = fighter(30.0, -10.0, Stance::Neutral);
        let impact = resolve_impact(&a, &b, REBOUND).unwrap();
        assert!(impact.a_faster);
        assert!((impact.b.vel - Vec2::new(10.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_dash_against_dash_is_dash_knockback() {
        let a = fighter(0.0, 30.0, Stance::Dashing);
        let b = fighter(40.0, -20.0, Stance::Dashing);
        let impact = resolve_impact(&a, &b, REBOUND).unwrap();
        assert_eq!(impact.a.knock, Knock::DashKnockBack);
        assert_eq!(impact.b.knock, Knock::DashKnockBack);

        let reeling = fighter(40.0, 0.0, Stance::Reeling);
        let impact = resolve_impact(&a, &reeling, REBOUND).unwrap();
        assert_eq!(impact.b.knock, Knock::DashKnockBack);
    }

    #[test]
    fn test_dash_reeling_side_counts_as_dash_hit() {
        let a = fighter(0.0, 12.0, Stance::DashReeling);
        let b = fighter(40.0, 0.0, Stance::Neutral);
        let impact = resolve_impact(&a, &b, REBOUND).unwrap();
        assert!(impact.dash_hit);
        // Only an actual dash earns the stronger rebound
        assert!((impact.a.vel.mag() - REBOUND.passive).abs() < 1e-4);
    }

    #[test]
    fn test_down_combatants_are_ignored() {
        let a = fighter(0.0, 30.0, Stance::Dashing);
        let b = fighter(40.0, 0.0, Stance::Down);
        assert!(resolve_impact(&a, &b, REBOUND).is_none());
        assert!(resolve_impact(&b, &a, REBOUND).is_none());
    }

    #[test]
    fn test_coincident_centers_stay_finite() {
        let a = fighter(0.0, 10.0, Stance::Dashing);
        let b = fighter(0.0, 0.0, Stance::Neutral);
        let impact = resolve_impact(&a, &b, REBOUND).unwrap();
        assert_eq!(impact.a.vel, Vec2::ZERO);
        assert_eq!(impact.b.vel, Vec2::ZERO);
        assert!(impact.a.vel.x.is_finite());
    }
}
