//! Outbound simulation events
//!
//! Accumulated during a tick and drained by the host afterwards.

use serde::{Deserialize, Serialize};

use super::entity::EnemyId;
use super::tutorial::TutorialStage;
use crate::audio::AudioCue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Fire-and-forget sound cue
    Cue(AudioCue),
    /// An enemy fell off the platform and was scored
    EnemyEliminated { id: EnemyId, combo: u32, bonus: u64 },
    /// An enemy caught itself at the edge
    EnemyCaught { id: EnemyId },
    /// The player respawned at the center
    PlayerRespawned { lives: u32 },
    /// A new level began
    LevelUp { level: u32 },
    /// The tutorial moved to a new stage
    Tutorial(TutorialStage),
    /// The player has no lives left
    LivesExhausted,
    /// Session over; emitted exactly once
    GameOver { score: u64 },
}
