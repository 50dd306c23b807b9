//! The simulation world
//!
//! One `World` owns the generated path, the runtime beats and all
//! per-level state, and is advanced once per frame by the caller's
//! update loop. Rendering is external: the world hands out a draw list
//! of (mesh handle, material, transform) requests.

use std::cmp::Ordering;

use bitflags::bitflags;
use glam::Mat4;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::camera::{CameraDriver, ClipPlane};
use super::debris::{self, Debris};
use super::state::{Beat, BeatState, Combo, JudgeEvent, LevelInfo};
use super::{judge, level};
use crate::audio::AudioSink;
use crate::chart::{Chart, ChartError, EventKind};
use crate::hud::{self, ScoreText};
use crate::mesh::{self, MeshData, TrackSegment};
use crate::path::Path;

bitflags! {
    /// Snapshot of currently-held inputs, sampled once per tick. Lane
    /// bits map to fire buttons; `START` is outside gameplay judgment.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct InputState: u8 {
        const FIRE1 = 1 << 0;
        const FIRE2 = 1 << 1;
        const FIRE3 = 1 << 2;
        const FIRE4 = 1 << 3;
        const START = 1 << 7;
    }
}

impl InputState {
    pub const LANES: [InputState; crate::consts::MAX_LANES] = [
        InputState::FIRE1,
        InputState::FIRE2,
        InputState::FIRE3,
        InputState::FIRE4,
    ];

    /// Bit for a lane index. Lane indices are validated at chart load.
    #[inline]
    pub fn lane(lane: usize) -> InputState {
        Self::LANES[lane]
    }
}

/// Which mesh a draw request refers to; resolved via [`World::mesh`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshHandle {
    TrackSegment(usize),
    Beat,
    HoldRibbon(usize),
    Marker,
    Debris,
}

/// Material identity, opaque to the core; lane materials index the
/// per-lane tint table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    Track,
    Beat { lane: usize },
    Hold { lane: usize },
    Marker,
    Debris,
}

/// One draw request for the external renderer.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest {
    pub mesh: MeshHandle,
    pub material: Material,
    pub transform: Mat4,
}

pub struct World {
    pub(crate) path: Path,
    pub(crate) track_segments: Vec<TrackSegment>,
    pub(crate) marker_mesh: MeshData,
    pub(crate) beat_mesh: MeshData,
    pub(crate) hold_meshes: Vec<MeshData>,
    pub(crate) beats: Vec<Beat>,
    pub(crate) debris: Vec<Debris>,
    pub(crate) combo: Combo,
    pub(crate) score_texts: Vec<ScoreText>,
    pub(crate) events: Vec<JudgeEvent>,
    pub(crate) level: Option<LevelInfo>,
    pub(crate) track_time: f32,
    pub(crate) prev_input: InputState,
    pub(crate) camera: CameraDriver,
    pub(crate) rng: Pcg32,
}

impl World {
    /// Generate the path and static geometry. The same seed always yields
    /// the same world.
    pub fn new(seed: u64) -> Self {
        let path = Path::generate(seed);
        let track_segments = mesh::build_track_segments(&path);
        log::info!(
            "initialized track: length={:.2} segments={} parts={}",
            path.length(),
            track_segments.len(),
            path.parts().len()
        );

        Self {
            path,
            track_segments,
            marker_mesh: mesh::build_marker(),
            beat_mesh: mesh::build_beat_quad(),
            hold_meshes: Vec::new(),
            beats: Vec::new(),
            debris: Vec::new(),
            combo: Combo::new(),
            score_texts: Vec::new(),
            events: Vec::new(),
            level: None,
            track_time: 0.0,
            prev_input: InputState::empty(),
            camera: CameraDriver::new(),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Map a chart onto the path, replacing any previous level, and start
    /// audio playback.
    pub fn load_level(&mut self, chart: &Chart, audio: &mut dyn AudioSink) -> Result<(), ChartError> {
        level::initialize(self, chart, audio)
    }

    /// Advance the simulation by `elapsed` seconds. With no level loaded
    /// only the camera is driven; track time stays frozen.
    pub fn update(&mut self, input: InputState, elapsed: f32) {
        if self.level.is_none() {
            self.camera.update(&self.path, self.track_time, elapsed);
            return;
        }

        self.track_time += elapsed;
        self.camera.update(&self.path, self.track_time, elapsed);

        // age feedback from earlier ticks first; pieces judgment spawns
        // this tick start aging on the next one
        debris::update(&mut self.debris, elapsed);
        self.combo.update(elapsed);
        hud::update_score_texts(&mut self.score_texts, elapsed);

        judge::update_beats(self, input);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.camera
            .set_aspect_ratio(width as f32 / height.max(1) as f32);
    }

    /// Per-frame draw requests: transparent track segments sorted
    /// back-to-front against the camera, then live beats, the play-head
    /// marker and debris.
    pub fn draw_list(&self) -> Vec<DrawRequest> {
        let mut list = Vec::new();
        if self.level.is_none() {
            return list;
        }

        let camera = self.camera.camera();
        let view_dir = (camera.center - camera.eye).normalize_or_zero();

        let mut segments: Vec<(f32, usize)> = self
            .track_segments
            .iter()
            .enumerate()
            .map(|(index, segment)| ((segment.position - camera.eye).dot(view_dir), index))
            .collect();
        segments.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));

        for (_, index) in segments {
            list.push(DrawRequest {
                mesh: MeshHandle::TrackSegment(index),
                material: Material::Track,
                transform: Mat4::IDENTITY,
            });
        }

        for beat in &self.beats {
            match beat.kind {
                EventKind::Tap => {
                    if beat.state == BeatState::Active {
                        list.push(DrawRequest {
                            mesh: MeshHandle::Beat,
                            material: Material::Beat { lane: beat.lane },
                            transform: beat.transform,
                        });
                    }
                }
                EventKind::Hold => {
                    if beat.state != BeatState::Inactive {
                        if let Some(index) = beat.hold_mesh {
                            list.push(DrawRequest {
                                mesh: MeshHandle::HoldRibbon(index),
                                material: Material::Hold { lane: beat.lane },
                                transform: Mat4::IDENTITY,
                            });
                        }
                    }
                }
            }
        }

        list.push(DrawRequest {
            mesh: MeshHandle::Marker,
            material: Material::Marker,
            transform: self.camera.marker_transform(),
        });

        for piece in &self.debris {
            list.push(DrawRequest {
                mesh: MeshHandle::Debris,
                material: Material::Debris,
                transform: piece.transform(),
            });
        }

        list
    }

    /// Resolve a draw request's mesh handle to its vertex data.
    pub fn mesh(&self, handle: MeshHandle) -> &MeshData {
        match handle {
            MeshHandle::TrackSegment(index) => &self.track_segments[index].mesh,
            MeshHandle::Beat | MeshHandle::Debris => &self.beat_mesh,
            MeshHandle::HoldRibbon(index) => &self.hold_meshes[index],
            MeshHandle::Marker => &self.marker_mesh,
        }
    }

    /// Take this tick's judgment events.
    pub fn drain_events(&mut self) -> Vec<JudgeEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn beats(&self) -> &[Beat] {
        &self.beats
    }

    pub fn combo(&self) -> &Combo {
        &self.combo
    }

    pub fn score_texts(&self) -> &[ScoreText] {
        &self.score_texts
    }

    pub fn level(&self) -> Option<&LevelInfo> {
        self.level.as_ref()
    }

    pub fn track_time(&self) -> f32 {
        self.track_time
    }

    pub fn camera(&self) -> &super::camera::Camera {
        self.camera.camera()
    }

    pub fn clip_plane(&self) -> ClipPlane {
        self.camera.clip_plane()
    }

    /// HUD time strings: elapsed (audio position when available, track
    /// time otherwise) and the level's total duration.
    pub fn time_display(&self, audio: &dyn AudioSink) -> (String, String) {
        let total = self.level.as_ref().map(|info| info.duration).unwrap_or(0.0);
        hud::time_display(audio, self.track_time, total)
    }
}
