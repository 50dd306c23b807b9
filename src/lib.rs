//! Beatpath - simulation core for a 3D rhythm game
//!
//! Core modules:
//! - `path`: Procedural track generation and continuous pose sampling
//! - `chart`: Track/chart data model and validation
//! - `sim`: Deterministic gameplay simulation (beats, judgment, camera)
//! - `mesh`: Vertex-buffer geometry built from the generated path
//! - `tween`: HUD animation primitives
//! - `hud`: Score text, combo presentation and time display
//! - `audio`: External audio collaborator seam

pub mod audio;
pub mod chart;
pub mod hud;
pub mod mesh;
pub mod path;
pub mod sim;
pub mod tween;

pub use chart::{Chart, ChartError, Event, EventKind};
pub use path::{Path, PathPart, Pose};
pub use sim::{DrawRequest, InputState, JudgeEvent, Judgment, Material, MeshHandle, World};

/// Game configuration constants
pub mod consts {
    /// World distance traveled per second of track time
    pub const SPEED: f32 = 0.3;
    /// Width of the track ribbon in world units
    pub const TRACK_WIDTH: f32 = 0.25;

    /// Symmetric timing tolerance around a beat's nominal instant (seconds)
    pub const HIT_WINDOW: f32 = 0.2;
    /// Fraction of the hit window below which a hit counts as perfect
    pub const PERFECT_FRACTION: f32 = 0.25;

    /// Midpoint-displacement recursion depth for the track skeleton
    pub const SKELETON_DEPTH: u32 = 5;
    /// Samples taken along each smoothing arc
    pub const PARTS_PER_ARC: usize = 20;
    /// Path parts per track ribbon segment mesh
    pub const VERTS_PER_SEGMENT: usize = 10;

    /// Number of input lanes the simulation supports
    pub const MAX_LANES: usize = 4;
    /// Tap beat scale relative to the lane width
    pub const BEAT_SCALE: f32 = 0.4;

    /// Distance between hold ribbon cross-sections
    pub const HOLD_RIBBON_STEP: f32 = 0.02;
    /// Height of beat geometry above the track surface
    pub const BEAT_HEIGHT: f32 = 0.005;

    /// Convergence rate for the frame-rate-independent camera low-pass
    pub const CAMERA_SMOOTHING_RATE: f32 = 10.0;

    /// Debris pieces spawned per successful tap hit
    pub const DEBRIS_PER_HIT: usize = 8;
    /// Upper bound on live debris pieces
    pub const MAX_DEBRIS: usize = 128;

    /// Lifetime of a transient score text (seconds)
    pub const SCORE_TEXT_LIFETIME: f32 = 0.8;
}
