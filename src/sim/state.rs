//! Runtime gameplay state derived from the chart

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::chart::EventKind;
use crate::tween::Spring;

/// Judgment lifecycle of a single beat.
///
/// `Active` is the initial state, `Inactive` terminal. Taps go straight to
/// `Inactive` on hit or miss; holds pass through `Holding` (pressed in the
/// start window) or `HoldMissed` (start or release blown) first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeatState {
    Active,
    Holding,
    HoldMissed,
    Inactive,
}

/// A runtime note, created 1:1 from a chart event at level load.
#[derive(Debug, Clone)]
pub struct Beat {
    pub kind: EventKind,
    pub lane: usize,
    /// Seconds from track start
    pub start: f32,
    /// Hold length in seconds; 0 for taps
    pub duration: f32,
    /// Placement on the track (for taps this includes the lane scale)
    pub transform: Mat4,
    /// Index into the world's hold ribbon meshes
    pub hold_mesh: Option<usize>,
    pub state: BeatState,
}

impl Beat {
    pub fn end(&self) -> f32 {
        self.start + self.duration
    }
}

/// Timing accuracy tier of a successful hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Judgment {
    /// Within a quarter of the hit window
    Perfect,
    Good,
}

impl Judgment {
    pub fn label(&self) -> &'static str {
        match self {
            Judgment::Perfect => "PERFECT",
            Judgment::Good => "GOOD",
        }
    }
}

/// Score/combo event emitted by the judgment engine, drained per tick by
/// the caller. Serializable so input/judgment traces can be recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JudgeEvent {
    Hit {
        lane: usize,
        judgment: Judgment,
        /// Combo value after this hit
        combo: u32,
    },
    Miss {
        lane: usize,
    },
}

/// Consecutive-hit streak plus its presentation state: a critically damped
/// scale pulse on each hit and an alpha fade-out after a miss.
#[derive(Debug, Clone)]
pub struct Combo {
    count: u32,
    pulse: Spring,
    alpha: f32,
    fading: bool,
}

impl Combo {
    const PULSE_SCALE: f32 = 1.5;
    const FADE_RATE: f32 = 2.0;

    pub fn new() -> Self {
        Self {
            count: 0,
            pulse: Spring::new(1.0, 12.0),
            alpha: 0.0,
            fading: false,
        }
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn scale(&self) -> f32 {
        self.pulse.value
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn register_hit(&mut self) -> u32 {
        self.count += 1;
        self.pulse.pulse(Self::PULSE_SCALE);
        self.alpha = 1.0;
        self.fading = false;
        self.count
    }

    pub fn register_miss(&mut self) {
        self.count = 0;
        self.fading = true;
    }

    pub fn update(&mut self, dt: f32) {
        self.pulse.update(dt);
        if self.fading {
            self.alpha = (self.alpha - Self::FADE_RATE * dt).max(0.0);
        }
    }
}

impl Default for Combo {
    fn default() -> Self {
        Self::new()
    }
}

/// Chart metadata retained for the level's lifetime.
#[derive(Debug, Clone)]
pub struct LevelInfo {
    pub title: String,
    pub author: String,
    pub beats_per_minute: f32,
    pub lanes: usize,
    /// Seconds until the last event has fully played out
    pub duration: f32,
}
