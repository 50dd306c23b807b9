//! Chart-to-path beat mapping
//!
//! Converts each chart event into a runtime beat placed on the track:
//! the event's start time fixes the arc-length distance (constant scroll
//! speed), the lane index fixes a lateral offset, taps get a placement
//! transform and holds get a ribbon mesh hugging the path.

use glam::{Mat4, Vec3};

use super::state::{Beat, BeatState, Combo, LevelInfo};
use super::world::World;
use crate::audio::AudioSink;
use crate::chart::{Chart, ChartError, EventKind};
use crate::consts::{BEAT_SCALE, SPEED, TRACK_WIDTH};
use crate::mesh;

pub(crate) fn initialize(
    world: &mut World,
    chart: &Chart,
    audio: &mut dyn AudioSink,
) -> Result<(), ChartError> {
    chart.validate()?;
    // validate() bounds the lane count by the per-lane tint table
    debug_assert!(chart.lanes <= mesh::LANE_COLORS.len());

    world.beats.clear();
    world.hold_meshes.clear();
    world.debris.clear();
    world.score_texts.clear();
    world.events.clear();
    world.combo = Combo::new();
    world.track_time = 0.0;
    world.prev_input = Default::default();
    world.camera.reset();

    let lane_width = TRACK_WIDTH / chart.lanes as f32;

    for event in &chart.events {
        let distance = SPEED * event.start;
        let pose = world.path.pose_at(distance);

        // lane centers evenly distributed across the track width
        let lateral = -0.5 * TRACK_WIDTH + (event.lane as f32 + 0.5) * lane_width;
        let translate = Mat4::from_translation(Vec3::new(0.0, lateral, 0.0));
        let scale = Mat4::from_scale(Vec3::splat(BEAT_SCALE * lane_width));
        let transform = pose.transform() * translate * scale;

        let hold_mesh = match event.kind {
            EventKind::Hold => {
                let end_distance = SPEED * event.end();
                let ribbon = mesh::build_hold_ribbon(
                    &world.path,
                    distance,
                    end_distance,
                    lateral,
                    0.5 * BEAT_SCALE * lane_width,
                );
                world.hold_meshes.push(ribbon);
                Some(world.hold_meshes.len() - 1)
            }
            EventKind::Tap => None,
        };

        world.beats.push(Beat {
            kind: event.kind,
            lane: event.lane,
            start: event.start,
            duration: event.duration,
            transform,
            hold_mesh,
            state: BeatState::Active,
        });
    }

    world.level = Some(LevelInfo {
        title: chart.title.clone(),
        author: chart.author.clone(),
        beats_per_minute: chart.beats_per_minute,
        lanes: chart.lanes,
        duration: chart.duration(),
    });

    audio.play();

    log::info!(
        "loaded level '{}' by {}: {} beats across {} lanes",
        chart.title,
        chart.author,
        world.beats.len(),
        chart.lanes
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioPosition, NullAudio};
    use crate::chart::Event;
    use crate::sim::world::MeshHandle;

    fn chart(lanes: usize, events: Vec<Event>) -> Chart {
        Chart {
            title: "test".into(),
            author: "test".into(),
            audio_file: "test.ogg".into(),
            beats_per_minute: 120.0,
            lanes,
            events,
        }
    }

    #[test]
    fn test_tap_placed_on_path() {
        let mut world = World::new(5);
        let mut audio = NullAudio::new();
        let event = Event {
            kind: EventKind::Tap,
            lane: 1,
            start: 3.0,
            duration: 0.0,
        };
        world.load_level(&chart(4, vec![event]), &mut audio).unwrap();

        let beat = &world.beats()[0];
        let pose = world.path().pose_at(SPEED * 3.0);
        let anchor = beat.transform.w_axis.truncate();
        // anchor sits within a lane offset of the path center
        assert!(anchor.distance(pose.center) < TRACK_WIDTH);
        assert_eq!(beat.state, BeatState::Active);
    }

    #[test]
    fn test_lanes_spread_across_track() {
        let mut world = World::new(5);
        let mut audio = NullAudio::new();
        let events = (0..4usize)
            .map(|lane| Event {
                kind: EventKind::Tap,
                lane,
                start: 2.0,
                duration: 0.0,
            })
            .collect();
        world.load_level(&chart(4, events), &mut audio).unwrap();

        let pose = world.path().pose_at(SPEED * 2.0);
        let offsets: Vec<f32> = world
            .beats()
            .iter()
            .map(|beat| (beat.transform.w_axis.truncate() - pose.center).dot(pose.side()))
            .collect();
        // monotonic across lanes, symmetric around the center
        for pair in offsets.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert!((offsets[0] + offsets[3]).abs() < 1e-4);
        assert!((offsets[1] + offsets[2]).abs() < 1e-4);
    }

    #[test]
    fn test_hold_gets_ribbon_mesh() {
        let mut world = World::new(5);
        let mut audio = NullAudio::new();
        let event = Event {
            kind: EventKind::Hold,
            lane: 0,
            start: 1.0,
            duration: 2.0,
        };
        world.load_level(&chart(4, vec![event]), &mut audio).unwrap();

        let beat = &world.beats()[0];
        let index = beat.hold_mesh.expect("hold should have a ribbon");
        let mesh = world.mesh(MeshHandle::HoldRibbon(index));
        assert!(!mesh.vertices.is_empty());
    }

    #[test]
    fn test_level_starts_audio() {
        struct CountingAudio {
            plays: u32,
        }
        impl AudioSink for CountingAudio {
            fn play(&mut self) {
                self.plays += 1;
            }
            fn position(&self) -> Option<AudioPosition> {
                None
            }
        }

        let mut world = World::new(5);
        let mut audio = CountingAudio { plays: 0 };
        world.load_level(&chart(4, vec![]), &mut audio).unwrap();
        assert_eq!(audio.plays, 1);
    }
}
