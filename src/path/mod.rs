//! Procedural track path
//!
//! The path is generated once at level initialization and is read-only
//! afterward: a coarse midpoint-displacement skeleton is smoothed into
//! quadratic Bezier arcs, which are resampled into a dense table of
//! [`PathPart`]s keyed by cumulative arc-length distance. All spatial
//! queries go through [`Path::pose_at`].

pub mod bezier;
pub mod generate;
pub mod sample;

pub use bezier::QuadraticBezier;
pub use sample::Pose;

use glam::{Mat3, Vec3};

/// One precomputed sample of the generated path.
///
/// `orientation` columns are (up, side, forward); `distance` is the
/// cumulative arc length from the path origin and is strictly increasing
/// across the table.
#[derive(Debug, Clone, Copy)]
pub struct PathPart {
    pub orientation: Mat3,
    pub center: Vec3,
    pub distance: f32,
}

impl PathPart {
    #[inline]
    pub fn up(&self) -> Vec3 {
        self.orientation.x_axis
    }

    #[inline]
    pub fn side(&self) -> Vec3 {
        self.orientation.y_axis
    }

    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.orientation.z_axis
    }
}

/// The generated track: an ordered table of at least two [`PathPart`]s.
#[derive(Debug, Clone)]
pub struct Path {
    parts: Vec<PathPart>,
}

impl Path {
    /// All samples, in distance order.
    pub fn parts(&self) -> &[PathPart] {
        &self.parts
    }

    /// Total arc length of the path.
    pub fn length(&self) -> f32 {
        self.parts.last().map(|p| p.distance).unwrap_or(0.0)
    }
}
