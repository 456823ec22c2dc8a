//! Entity identity and the shared physical body
//!
//! Entities are a closed set (platform, player, enemies). Collision callbacks
//! dispatch on [`Owner`] with `match` rather than comparing tag strings.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collider::{ColliderId, ColliderRegistry, ContactKind};
use super::vector::Vector2Ext;

/// Entity kind, as exposed to the host and used for spatial query filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityTag {
    Platform,
    Player,
    Enemy,
}

impl EntityTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityTag::Platform => "platform",
            EntityTag::Player => "player",
            EntityTag::Enemy => "enemy",
        }
    }
}

impl fmt::Display for EntityTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Enemy identifier, unique within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EnemyId(pub u32);

/// Back-reference from a collider to the entity that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Owner {
    Platform,
    Player,
    Enemy(EnemyId),
}

impl Owner {
    pub fn tag(self) -> EntityTag {
        match self {
            Owner::Platform => EntityTag::Platform,
            Owner::Player => EntityTag::Player,
            Owner::Enemy(_) => EntityTag::Enemy,
        }
    }
}

/// Position, velocity and the collider that mirrors them
///
/// The body is the single writer of its position and radius; every write goes
/// through [`Body::set_position`] / [`Body::set_radius`], which fan out to the
/// registered collider.
#[derive(Debug, Clone)]
pub struct Body {
    pos: Vec2,
    pub vel: Vec2,
    radius: f32,
    collider: ColliderId,
}

impl Body {
    /// Create the body and register its collider, subscribed to `listen`
    pub fn spawn(
        colliders: &mut ColliderRegistry,
        owner: Owner,
        pos: Vec2,
        radius: f32,
        listen: &[ContactKind],
    ) -> Self {
        let collider = colliders.register(owner, radius, pos);
        for kind in listen {
            colliders.on(collider, *kind);
        }
        Self {
            pos,
            vel: Vec2::ZERO,
            radius,
            collider,
        }
    }

    #[inline]
    pub fn pos(&self) -> Vec2 {
        self.pos
    }

    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[inline]
    pub fn collider(&self) -> ColliderId {
        self.collider
    }

    #[inline]
    pub fn speed(&self) -> f32 {
        self.vel.mag()
    }

    pub fn set_position(&mut self, colliders: &mut ColliderRegistry, pos: Vec2) {
        self.pos = pos;
        colliders.set_position(self.collider, pos);
    }

    pub fn set_radius(&mut self, colliders: &mut ColliderRegistry, radius: f32) {
        self.radius = radius.max(0.0);
        colliders.set_radius(self.collider, self.radius);
    }

    /// Universal integration step
    ///
    /// `position += velocity`, then `velocity *= friction`, then components
    /// under `epsilon` snap to zero so the body comes to a full stop.
    pub fn integrate(&mut self, colliders: &mut ColliderRegistry, friction: f32, epsilon: f32) {
        if self.vel == Vec2::ZERO {
            return;
        }
        let next = self.pos + self.vel;
        self.set_position(colliders, next);
        self.vel = damp(self.vel, friction, epsilon);
    }

    /// Unregister the collider; repeated calls are no-ops
    pub fn destroy(&mut self, colliders: &mut ColliderRegistry) -> bool {
        colliders.unregister(self.collider)
    }
}

/// One tick of friction with the epsilon snap
#[inline]
pub fn damp(vel: Vec2, friction: f32, epsilon: f32) -> Vec2 {
    let mut v = vel * friction;
    v.snap_small(epsilon);
    v
}
