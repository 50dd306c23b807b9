//! External audio collaborator seam
//!
//! The simulation only ever asks the audio device to start playback and
//! polls its position for the HUD time display. When no device is
//! available, gameplay continues on the wall-clock track time and only
//! audio feedback is absent.

/// Playback position reported by the audio device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioPosition {
    pub sample_pos: u64,
    pub sample_rate: u32,
}

impl AudioPosition {
    /// Playback position in seconds.
    pub fn seconds(&self) -> f32 {
        self.sample_pos as f32 / self.sample_rate as f32
    }
}

/// The audio device as seen from the simulation core.
pub trait AudioSink {
    /// Start playback of the level's audio asset.
    fn play(&mut self);

    /// Current playback position, or `None` when unavailable.
    fn position(&self) -> Option<AudioPosition>;
}

/// Sink used when no audio device could be opened.
#[derive(Debug, Default)]
pub struct NullAudio {
    warned: bool,
}

impl NullAudio {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AudioSink for NullAudio {
    fn play(&mut self) {
        if !self.warned {
            log::warn!("no audio device, continuing without playback");
            self.warned = true;
        }
    }

    fn position(&self) -> Option<AudioPosition> {
        None
    }
}
