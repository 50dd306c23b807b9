//! HUD feed: transient score texts and time display
//!
//! The core does not draw text; it hands the HUD a list of live score
//! texts (content, world anchor, scale, alpha) and formatted time strings.

use glam::Vec3;

use crate::audio::AudioSink;
use crate::consts::SCORE_TEXT_LIFETIME;
use crate::tween::Animation;

/// A transient judgment text anchored at the judged beat.
#[derive(Debug, Clone)]
pub struct ScoreText {
    pub text: &'static str,
    pub position: Vec3,
    anim: Animation,
}

impl ScoreText {
    pub fn new(text: &'static str, position: Vec3) -> Self {
        // quick pop, then fade out over the rest of the lifetime
        let anim = Animation::sequence(vec![
            Animation::scale_pulse(1.6, 1.0, 0.12),
            Animation::fade(1.0, 0.0, SCORE_TEXT_LIFETIME - 0.12),
        ]);
        Self {
            text,
            position,
            anim,
        }
    }

    pub fn scale(&self) -> f32 {
        self.anim.scale()
    }

    pub fn alpha(&self) -> f32 {
        self.anim.alpha()
    }

    pub fn finished(&self) -> bool {
        self.anim.finished()
    }
}

/// Advance all live texts, dropping the expired ones.
pub fn update_score_texts(texts: &mut Vec<ScoreText>, dt: f32) {
    for text in texts.iter_mut() {
        text.anim.advance(dt);
    }
    texts.retain(|text| !text.finished());
}

/// `m:ss` display form of a time in seconds.
pub fn format_time(seconds: f32) -> String {
    let total = seconds.max(0.0) as u32;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Elapsed/total display strings. Elapsed prefers the audio playback
/// position and falls back to the simulation track time when the device
/// reports nothing.
pub fn time_display(audio: &dyn AudioSink, track_time: f32, total: f32) -> (String, String) {
    let elapsed = audio
        .position()
        .map(|position| position.seconds())
        .unwrap_or(track_time);
    (format_time(elapsed), format_time(total))
}
