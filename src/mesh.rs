//! Geometry built from the generated path
//!
//! The simulation core does not render; it builds plain vertex buffers a
//! renderer can upload as-is. Vertices are `Pod` so they can be cast
//! straight to bytes.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

use crate::consts::{BEAT_HEIGHT, HOLD_RIBBON_STEP, TRACK_WIDTH, VERTS_PER_SEGMENT};
use crate::path::Path;

/// Vertex with position and texture coordinate.
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub texcoord: [f32; 2],
}

impl MeshVertex {
    fn new(position: Vec3, u: f32, v: f32) -> Self {
        Self {
            position: position.to_array(),
            texcoord: [u, v],
        }
    }
}

/// How the vertex list should be assembled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Triangles,
    TriangleStrip,
}

/// A built vertex buffer.
#[derive(Debug, Clone)]
pub struct MeshData {
    pub primitive: Primitive,
    pub vertices: Vec<MeshVertex>,
}

impl MeshData {
    /// Raw bytes for buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }
}

/// One chunk of the track ribbon, with its average position kept around so
/// the transparent segments can be depth-sorted back-to-front.
#[derive(Debug, Clone)]
pub struct TrackSegment {
    pub position: Vec3,
    pub mesh: MeshData,
}

/// Per-lane tint table, indexed by lane and validated against the chart's
/// lane count at level load.
pub const LANE_COLORS: [[f32; 4]; crate::consts::MAX_LANES] = [
    [0.9, 0.3, 0.3, 1.0],
    [0.3, 0.9, 0.4, 1.0],
    [0.3, 0.5, 0.9, 1.0],
    [0.9, 0.8, 0.3, 1.0],
];

/// Build the track ribbon as a series of triangle-strip segments, two edge
/// vertices per path part, the texture v coordinate driven by distance.
pub fn build_track_segments(path: &Path) -> Vec<TrackSegment> {
    let parts = path.parts();
    let mut segments = Vec::new();

    let mut i = 0;
    while i + 1 < parts.len() {
        let end = (i + VERTS_PER_SEGMENT).min(parts.len() - 1);
        let mut vertices = Vec::with_capacity(2 * (end - i + 1));

        for part in &parts[i..=end] {
            let v = 3.0 * part.distance;
            let half = 0.5 * TRACK_WIDTH;
            vertices.push(MeshVertex::new(part.center - part.side() * half, 0.0, v));
            vertices.push(MeshVertex::new(part.center + part.side() * half, 1.0, v));
        }

        let position = vertices
            .iter()
            .map(|vertex| Vec3::from_array(vertex.position))
            .sum::<Vec3>()
            / vertices.len() as f32;

        segments.push(TrackSegment {
            position,
            mesh: MeshData {
                primitive: Primitive::TriangleStrip,
                vertices,
            },
        });

        i += VERTS_PER_SEGMENT;
    }

    segments
}

/// Ribbon mesh for a hold note, hugging the path between the hold's start
/// and end distances.
///
/// The strip runs down the lane centerline at `lateral`, `half_width` to
/// each side, lifted slightly off the track surface. Both ends get an
/// octagonal rounded cap: a narrow tip row plus a full-width shoulder row
/// `half_width` further in. If the hold is so short that the shoulders
/// would cross, only the two caps are emitted around the hold midpoint and
/// the mesh stays valid.
pub fn build_hold_ribbon(
    path: &Path,
    start_distance: f32,
    end_distance: f32,
    lateral: f32,
    half_width: f32,
) -> MeshData {
    let radius = half_width;
    let tip_half_width = 0.5 * half_width;

    // (distance, half-width) cross-section rows from start to end
    let mut rows: Vec<(f32, f32)> = Vec::new();
    rows.push((start_distance, tip_half_width));

    let shoulder_start = start_distance + radius;
    let shoulder_end = end_distance - radius;

    if shoulder_start < shoulder_end {
        let mut d = shoulder_start;
        while d < shoulder_end {
            rows.push((d, half_width));
            d += HOLD_RIBBON_STEP;
        }
        rows.push((shoulder_end, half_width));
    } else {
        // degenerate hold: just the two end caps
        rows.push((0.5 * (start_distance + end_distance), half_width));
    }

    rows.push((end_distance, tip_half_width));

    let mut vertices = Vec::with_capacity(2 * rows.len());
    for &(distance, width) in &rows {
        let pose = path.pose_at(distance);
        let base = pose.center + pose.up() * BEAT_HEIGHT + pose.side() * lateral;
        let v = 3.0 * distance;
        vertices.push(MeshVertex::new(base - pose.side() * width, 0.0, v));
        vertices.push(MeshVertex::new(base + pose.side() * width, 1.0, v));
    }

    MeshData {
        primitive: Primitive::TriangleStrip,
        vertices,
    }
}

/// Flat quad for a tap beat, centered in the local frame just above the
/// track surface; the lane transform scales it to the lane width.
pub fn build_beat_quad() -> MeshData {
    let vertices = vec![
        MeshVertex::new(Vec3::new(BEAT_HEIGHT, -1.0, -1.0), 0.0, 0.0),
        MeshVertex::new(Vec3::new(BEAT_HEIGHT, 1.0, -1.0), 1.0, 0.0),
        MeshVertex::new(Vec3::new(BEAT_HEIGHT, -1.0, 1.0), 0.0, 1.0),
        MeshVertex::new(Vec3::new(BEAT_HEIGHT, 1.0, 1.0), 1.0, 1.0),
    ];
    MeshData {
        primitive: Primitive::TriangleStrip,
        vertices,
    }
}

/// Thin bar across the track marking the play head.
pub fn build_marker() -> MeshData {
    const THICK: f32 = 0.025;
    const HEIGHT: f32 = 0.01;
    let left = -0.5 * TRACK_WIDTH;
    let right = 0.5 * TRACK_WIDTH;
    let bottom = -0.5 * THICK;
    let top = 0.5 * THICK;

    let vertices = vec![
        MeshVertex::new(Vec3::new(HEIGHT, left, bottom), 0.0, 0.0),
        MeshVertex::new(Vec3::new(HEIGHT, right, bottom), 1.0, 0.0),
        MeshVertex::new(Vec3::new(HEIGHT, left, top), 0.0, 1.0),
        MeshVertex::new(Vec3::new(HEIGHT, right, top), 1.0, 1.0),
    ];
    MeshData {
        primitive: Primitive::TriangleStrip,
        vertices,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_track_segments_cover_path() {
        let path = Path::generate(17);
        let segments = build_track_segments(&path);
        assert!(!segments.is_empty());
        for segment in &segments {
            assert!(segment.mesh.vertices.len() >= 4);
            assert_eq!(segment.mesh.vertices.len() % 2, 0);
        }
    }

    #[test]
    fn test_hold_ribbon_has_paired_rows() {
        let path = Path::generate(17);
        let mesh = build_hold_ribbon(&path, 0.5, 1.5, 0.0, 0.0125);
        assert_eq!(mesh.vertices.len() % 2, 0);
        // tip rows, two shoulders, plus intermediate cross-sections
        assert!(mesh.vertices.len() >= 8);
    }

    #[test]
    fn test_degenerate_hold_ribbon_is_valid() {
        let path = Path::generate(17);
        // end - start smaller than twice the cap radius
        let mesh = build_hold_ribbon(&path, 1.0, 1.01, 0.0, 0.0125);
        assert!(!mesh.vertices.is_empty());
        assert_eq!(mesh.vertices.len(), 6);
    }

    #[test]
    fn test_mesh_bytes_length() {
        let mesh = build_marker();
        assert_eq!(
            mesh.as_bytes().len(),
            mesh.vertices.len() * std::mem::size_of::<MeshVertex>()
        );
    }
}
