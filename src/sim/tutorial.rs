//! Guided first session
//!
//! Stages advance on player input. While the tutorial runs no enemies spawn
//! and deaths do not cost lives. Each stage carries a prompt identifier the
//! host resolves to overlay text.

use serde::{Deserialize, Serialize};

use super::player::{Player, PlayerState};
use super::tick::TickInput;

/// Seconds the intro prompt stays up
pub const INTRO_DURATION: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TutorialStage {
    Intro,
    Movement,
    Aiming,
    FullCharge,
    Conclusion,
    Ended,
}

impl TutorialStage {
    pub fn prompt(&self) -> Option<&'static str> {
        match self {
            TutorialStage::Intro => Some("tutorial.intro"),
            TutorialStage::Movement => Some("tutorial.movement"),
            TutorialStage::Aiming => Some("tutorial.aiming"),
            TutorialStage::FullCharge => Some("tutorial.full_charge"),
            TutorialStage::Conclusion => Some("tutorial.conclusion"),
            TutorialStage::Ended => None,
        }
    }
}

/// Shown instead of the stage prompt while the player is dead
pub const CAREFUL_PROMPT: &str = "tutorial.careful";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tutorial {
    stage: TutorialStage,
    stage_started: f32,
    /// Directions tried so far: up, down, left, right
    moved: [bool; 4],
    charge_pressed: bool,
    full_charge_seen: bool,
}

impl Default for Tutorial {
    fn default() -> Self {
        Self::disabled()
    }
}

impl Tutorial {
    /// Start at the intro
    pub fn new(now: f32) -> Self {
        Self {
            stage: TutorialStage::Intro,
            stage_started: now,
            moved: [false; 4],
            charge_pressed: false,
            full_charge_seen: false,
        }
    }

    /// Already finished
    pub fn disabled() -> Self {
        Self {
            stage: TutorialStage::Ended,
            ..Self::new(0.0)
        }
    }

    #[inline]
    pub fn stage(&self) -> TutorialStage {
        self.stage
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.stage != TutorialStage::Ended
    }

    pub fn prompt(&self, player_dead: bool) -> Option<&'static str> {
        if self.is_active() && player_dead {
            return Some(CAREFUL_PROMPT);
        }
        self.stage.prompt()
    }

    /// Jump straight to the end; returns the new stage if it changed
    pub fn skip(&mut self, now: f32) -> Option<TutorialStage> {
        if !self.is_active() {
            return None;
        }
        self.enter(TutorialStage::Ended, now)
    }

    fn enter(&mut self, stage: TutorialStage, now: f32) -> Option<TutorialStage> {
        log::info!("Tutorial: {:?} -> {:?}", self.stage, stage);
        self.stage = stage;
        self.stage_started = now;
        Some(stage)
    }

    /// Advance on this tick's input; returns the new stage if it changed
    pub fn update(&mut self, input: &TickInput, player: &Player, now: f32) -> Option<TutorialStage> {
        if !self.is_active() {
            return None;
        }
        if input.skip_tutorial {
            return self.skip(now);
        }

        match self.stage {
            TutorialStage::Intro => {
                if now - self.stage_started >= INTRO_DURATION {
                    return self.enter(TutorialStage::Movement, now);
                }
            }
            TutorialStage::Movement => {
                let dirs = [input.up, input.down, input.left, input.right];
                for (seen, pressed) in self.moved.iter_mut().zip(dirs) {
                    *seen |= pressed;
                }
                if self.moved.iter().all(|m| *m) {
                    return self.enter(TutorialStage::Aiming, now);
                }
            }
            TutorialStage::Aiming => {
                if input.charge {
                    self.charge_pressed = true;
                } else if self.charge_pressed {
                    return self.enter(TutorialStage::FullCharge, now);
                }
            }
            TutorialStage::FullCharge => {
                if matches!(player.state, PlayerState::Aim { .. }) && player.charge >= 1.0 {
                    self.full_charge_seen = true;
                }
                if self.full_charge_seen && !input.charge {
                    return self.enter(TutorialStage::Conclusion, now);
                }
            }
            TutorialStage::Conclusion => {
                if input.start {
                    return self.enter(TutorialStage::Ended, now);
                }
            }
            TutorialStage::Ended => {}
        }
        None
    }
}
