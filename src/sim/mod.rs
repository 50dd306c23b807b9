//! Deterministic gameplay simulation
//!
//! All runtime gameplay state lives here and is advanced by a single
//! tick function per frame: no suspension points, no concurrent
//! mutation. The path table is built once and shared read-only.
//! Given a seed and a recorded input script, two runs are identical.

pub mod camera;
pub mod debris;
mod judge;
mod level;
pub mod state;
pub mod world;

pub use camera::{Camera, CameraDriver, ClipPlane};
pub use debris::Debris;
pub use state::{Beat, BeatState, Combo, JudgeEvent, Judgment, LevelInfo};
pub use world::{DrawRequest, InputState, Material, MeshHandle, World};
