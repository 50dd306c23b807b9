//! Per-tick beat judgment
//!
//! Input is edge-triggered: a lane only counts as pressed on the tick its
//! bit first appears, and released on the tick it disappears, so a held
//! key never re-triggers hits. Judgment is a pure function of the track
//! time, the input edges and each beat's timing, which makes recorded
//! input fully replayable.

use super::debris;
use super::state::{BeatState, JudgeEvent, Judgment};
use super::world::{InputState, World};
use crate::chart::EventKind;
use crate::consts::{HIT_WINDOW, PERFECT_FRACTION};
use crate::hud::ScoreText;

fn classify(dt: f32) -> Judgment {
    if dt / HIT_WINDOW < PERFECT_FRACTION {
        Judgment::Perfect
    } else {
        Judgment::Good
    }
}

fn register_hit(world: &mut World, index: usize, dt: f32) {
    let judgment = classify(dt);
    let beat = &mut world.beats[index];
    beat.state = BeatState::Inactive;
    let lane = beat.lane;
    let anchor = beat.transform.w_axis.truncate();

    if beat.kind == EventKind::Tap {
        debris::spawn_burst(&mut world.debris, &mut world.rng, &beat.transform);
    }

    let combo = world.combo.register_hit();
    world.score_texts.push(ScoreText::new(judgment.label(), anchor));
    world.events.push(JudgeEvent::Hit {
        lane,
        judgment,
        combo,
    });
    log::info!("hit lane={} dt={:.3} {}", lane, dt, judgment.label());
}

fn register_miss(world: &mut World, index: usize, state: BeatState) {
    let beat = &mut world.beats[index];
    beat.state = state;
    let lane = beat.lane;
    let anchor = beat.transform.w_axis.truncate();

    world.combo.register_miss();
    world.score_texts.push(ScoreText::new("MISSED", anchor));
    world.events.push(JudgeEvent::Miss { lane });
    log::info!("missed lane={}", lane);
}

pub(crate) fn update_beats(world: &mut World, input: InputState) {
    let pressed = input & !world.prev_input;
    let released = world.prev_input & !input;
    let track_time = world.track_time;

    for index in 0..world.beats.len() {
        let beat = &world.beats[index];
        let lane_bit = InputState::lane(beat.lane);
        let (kind, state, lane) = (beat.kind, beat.state, beat.lane);
        let (start, end) = (beat.start, beat.end());

        match state {
            BeatState::Active => match kind {
                EventKind::Tap => {
                    let dt = (start - track_time).abs();
                    if pressed.contains(lane_bit) && dt < HIT_WINDOW {
                        register_hit(world, index, dt);
                    } else if start < track_time - HIT_WINDOW {
                        register_miss(world, index, BeatState::Inactive);
                    }
                }
                EventKind::Hold => {
                    let dt = (start - track_time).abs();
                    if pressed.contains(lane_bit) && dt < HIT_WINDOW {
                        // scored at release
                        world.beats[index].state = BeatState::Holding;
                        log::debug!("hold started lane={} dt={:.3}", lane, dt);
                    } else if start < track_time - HIT_WINDOW {
                        register_miss(world, index, BeatState::HoldMissed);
                    }
                }
            },
            BeatState::Holding => {
                if released.contains(lane_bit) {
                    let dt = (end - track_time).abs();
                    if dt < HIT_WINDOW {
                        register_hit(world, index, dt);
                    } else {
                        // released early
                        register_miss(world, index, BeatState::HoldMissed);
                    }
                } else if track_time > end + HIT_WINDOW {
                    // never released
                    register_miss(world, index, BeatState::HoldMissed);
                }
            }
            BeatState::HoldMissed => {
                if track_time > end {
                    world.beats[index].state = BeatState::Inactive;
                }
            }
            BeatState::Inactive => {}
        }
    }

    world.prev_input = input;
}
