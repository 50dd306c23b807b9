//! Headless replay harness
//!
//! Loads a chart (or a built-in demo), auto-plays it against the
//! simulation at a fixed timestep and reports the judgment outcome.
//! Useful for sanity-checking charts and timing changes without a
//! renderer attached.

use std::error::Error;

use beatpath::audio::NullAudio;
use beatpath::chart::{Chart, Event, EventKind};
use beatpath::sim::{InputState, JudgeEvent, World};

const TICK: f32 = 1.0 / 120.0;

fn demo_chart() -> Chart {
    let mut events = Vec::new();
    for i in 0..16usize {
        let start = 1.0 + i as f32 * 0.5;
        if i % 4 == 3 {
            events.push(Event {
                kind: EventKind::Hold,
                lane: i % 4,
                start,
                duration: 1.0,
            });
        } else {
            events.push(Event {
                kind: EventKind::Tap,
                lane: i % 4,
                start,
                duration: 0.0,
            });
        }
    }
    Chart {
        title: "demo".into(),
        author: "builtin".into(),
        audio_file: String::new(),
        beats_per_minute: 120.0,
        lanes: 4,
        events,
    }
}

/// Input snapshot an ideal player would produce at `time`.
fn autoplay(chart: &Chart, time: f32) -> InputState {
    let mut input = InputState::empty();
    for event in &chart.events {
        let held = match event.kind {
            EventKind::Tap => time >= event.start && time < event.start + 0.06,
            EventKind::Hold => time >= event.start && time < event.end(),
        };
        if held {
            input |= InputState::lane(event.lane);
        }
    }
    input
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let chart = match args.next() {
        Some(path) => Chart::from_json(&std::fs::read_to_string(&path)?)?,
        None => demo_chart(),
    };
    let seed = args
        .next()
        .map(|s| s.parse::<u64>())
        .transpose()?
        .unwrap_or(1);

    let mut world = World::new(seed);
    let mut audio = NullAudio::new();
    world.load_level(&chart, &mut audio)?;

    let total = chart.duration() + 1.0;
    let mut hits = 0u32;
    let mut misses = 0u32;
    let mut max_combo = 0u32;

    let mut time = 0.0f32;
    while time < total {
        time += TICK;
        world.update(autoplay(&chart, time), TICK);
        for event in world.drain_events() {
            match event {
                JudgeEvent::Hit { combo, .. } => {
                    hits += 1;
                    max_combo = max_combo.max(combo);
                }
                JudgeEvent::Miss { .. } => misses += 1,
            }
        }
    }

    let (elapsed, length) = world.time_display(&audio);
    println!(
        "'{}' finished at {elapsed}/{length}: {hits} hits, {misses} misses, max combo {max_combo}",
        chart.title
    );

    Ok(())
}
