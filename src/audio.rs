//! Audio boundary
//!
//! The simulation never plays sound itself. It emits [`AudioCue`]s in its
//! event stream; the host drains them and hands each one to an [`AudioSink`]
//! it owns. Playback is fire-and-forget.

use serde::{Deserialize, Serialize};

use crate::sim::GameEvent;

/// Sound cue identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "cue", content = "tier")]
pub enum AudioCue {
    /// Two combatants collided
    Hit,
    /// A dash was launched
    Dash,
    /// Someone went over the edge
    Fall,
    /// The combo counter reached a tier (1-based)
    ComboTier(u32),
    /// The player lost a life
    Death,
    /// A new level began
    LevelUp,
}

impl AudioCue {
    /// Stable identifier for asset lookup
    pub fn name(&self) -> &'static str {
        match self {
            AudioCue::Hit => "hit",
            AudioCue::Dash => "dash",
            AudioCue::Fall => "fall",
            AudioCue::ComboTier(_) => "combo_tier",
            AudioCue::Death => "death",
            AudioCue::LevelUp => "level_up",
        }
    }

    /// Suggested relative loudness (0.0 - 1.0)
    pub fn base_gain(&self) -> f32 {
        match self {
            AudioCue::Hit => 0.6,
            AudioCue::Dash => 0.4,
            AudioCue::Fall => 0.7,
            AudioCue::ComboTier(tier) => (0.5 + 0.1 * *tier as f32).min(1.0),
            AudioCue::Death => 0.8,
            AudioCue::LevelUp => 0.7,
        }
    }
}

/// Host-side playback
pub trait AudioSink {
    /// Play `cue` at `gain` (already mixed, 0.0 - 1.0)
    fn play(&mut self, cue: AudioCue, gain: f32);
}

/// Discards every cue
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: AudioCue, _gain: f32) {}
}

/// Logs every cue at debug level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: AudioCue, gain: f32) {
        log::debug!("audio cue {} (gain {:.2})", cue.name(), gain);
    }
}

/// Volume control in front of a sink
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a single cue
    pub fn play(&mut self, cue: AudioCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol * cue.base_gain());
    }

    /// Play every cue found in a drained event batch, in order
    pub fn play_events(&mut self, events: &[GameEvent]) {
        for event in events {
            if let GameEvent::Cue(cue) = event {
                self.play(*cue);
            }
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
