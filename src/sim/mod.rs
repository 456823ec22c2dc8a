//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by collider / entity ID)
//! - No rendering, audio or platform dependencies

pub mod collider;
pub mod combat;
pub mod combo;
pub mod enemy;
pub mod entity;
pub mod event;
pub mod player;
pub mod state;
pub mod tick;
pub mod tutorial;
pub mod vector;

pub use collider::{
    Collider, ColliderId, ColliderRegistry, Contact, ContactKind, ContactListener, circles_overlap,
};
pub use combat::{Fighter, Impact, Knock, Reaction, Rebound, Stance, resolve_impact};
pub use combo::{COMBO_TIERS, Combo, elimination_bonus};
pub use enemy::{Enemy, EnemyContext, EnemyState, Fall};
pub use entity::{Body, EnemyId, EntityTag, Owner, damp};
pub use event::GameEvent;
pub use player::{Player, PlayerState};
pub use state::{GameState, World};
pub use tick::{TickInput, tick};
pub use tutorial::{CAREFUL_PROMPT, INTRO_DURATION, Tutorial, TutorialStage};
pub use vector::Vector2Ext;
