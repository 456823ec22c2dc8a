//! Combo counter and scoring policy
//!
//! A shared counter climbs with every dash hit (a collision where at least one
//! side was dashing). Each struck enemy snapshots the counter; if it is then
//! knocked off the platform the elimination bonus is `base × combo²`. Resting
//! resets an enemy's snapshot, and the player's death resets the shared
//! counter.

use serde::{Deserialize, Serialize};

/// Combo values at which a combo-tier cue is emitted
pub const COMBO_TIERS: [u32; 4] = [2, 3, 5, 8];

/// Shared combo counter (starts at 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combo {
    value: u32,
}

impl Default for Combo {
    fn default() -> Self {
        Self { value: 1 }
    }
}

impl Combo {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Register a successful dash hit; returns the new value
    pub fn hit(&mut self) -> u32 {
        self.value = self.value.saturating_add(1);
        self.value
    }

    pub fn reset(&mut self) {
        self.value = 1;
    }

    /// Tier reached exactly at the current value, if any
    pub fn tier(&self) -> Option<u32> {
        COMBO_TIERS.iter().position(|t| *t == self.value).map(|i| i as u32 + 1)
    }
}

/// Elimination bonus: `base × combo²`
#[inline]
pub fn elimination_bonus(base: u64, combo: u32) -> u64 {
    let c = u64::from(combo);
    base.saturating_mul(c.saturating_mul(c))
}
