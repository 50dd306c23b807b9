//! Path generation
//!
//! Builds the read-only [`PathPart`] table: a fractal midpoint-displacement
//! skeleton is fitted with quadratic Bezier arcs through segment midpoints,
//! and each arc is walked at fixed parameter steps while propagating an
//! orientation frame from sample to sample.

use glam::{Mat3, Vec3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bezier::QuadraticBezier;
use super::{Path, PathPart};
use crate::consts::{PARTS_PER_ARC, SKELETON_DEPTH};

/// Uniformly distributed point on the unit sphere.
fn random_unit_vector(rng: &mut Pcg32) -> Vec3 {
    let z: f32 = rng.random_range(-1.0..1.0);
    let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Recursive midpoint displacement, run as an explicit worklist.
///
/// Each pending segment either emits its `from` endpoint (level 0) or is
/// split at a midpoint pushed along a random direction orthogonal to the
/// segment, scaled by a random fraction of the segment length. The final
/// `to` endpoint is appended once by the caller.
fn displace_segment(rng: &mut Pcg32, from: Vec3, to: Vec3, level: u32, points: &mut Vec<Vec3>) {
    let mut pending = vec![(from, to, level)];
    while let Some((from, to, level)) = pending.pop() {
        if level == 0 {
            points.push(from);
            continue;
        }

        let dist = from.distance(to);
        let perturb = rng.random_range(0.25..0.5) * dist;

        let dir = (to - from).normalize();
        let up = loop {
            let side = random_unit_vector(rng);
            let cross = dir.cross(side);
            if cross.length_squared() > 1e-6 {
                break cross.normalize();
            }
        };

        let mid = 0.5 * (from + to) + perturb * up;

        // LIFO order, so the left half is processed first
        pending.push((mid, to, level - 1));
        pending.push((from, mid, level - 1));
    }
}

impl Path {
    /// Generate the track path from a seed. Deterministic: the same seed
    /// always yields an identical part table.
    pub fn generate(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);

        let from = Vec3::new(-10.0, 0.0, 0.0);
        let to = Vec3::new(10.0, 0.0, 0.0);

        let mut control_points = Vec::new();
        displace_segment(&mut rng, from, to, SKELETON_DEPTH, &mut control_points);
        control_points.push(to);

        let mut parts = Vec::with_capacity((control_points.len() - 2) * PARTS_PER_ARC);

        let mut current_up = Vec3::new(0.0, 0.0, 1.0);
        let mut prev_center: Option<Vec3> = None;
        let mut distance = 0.0f32;

        for window in control_points.windows(3) {
            let [prev, cur, next] = [window[0], window[1], window[2]];

            let arc = QuadraticBezier::new(0.5 * (prev + cur), cur, 0.5 * (cur + next));

            for j in 0..PARTS_PER_ARC {
                let t = j as f32 / PARTS_PER_ARC as f32;

                let center = arc.eval(t);

                if let Some(prev_center) = prev_center {
                    let step = prev_center.distance(center);
                    if step <= f32::EPSILON {
                        continue;
                    }
                    distance += step;
                }

                let forward = arc.direction(t).normalize();
                let side = forward.cross(current_up).normalize();
                let up = side.cross(forward).normalize();

                parts.push(PathPart {
                    orientation: Mat3::from_cols(up, side, forward),
                    center,
                    distance,
                });

                current_up = up;
                prev_center = Some(center);
            }
        }

        debug_assert!(parts.len() >= 2);

        log::debug!(
            "generated path: seed={} length={:.2} parts={}",
            seed,
            distance,
            parts.len()
        );

        Self { parts }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_orthonormal(m: &Mat3) {
        const TOLERANCE: f32 = 1e-4;
        assert!((m.x_axis.length() - 1.0).abs() < TOLERANCE);
        assert!((m.y_axis.length() - 1.0).abs() < TOLERANCE);
        assert!((m.z_axis.length() - 1.0).abs() < TOLERANCE);
        assert!(m.x_axis.dot(m.y_axis).abs() < TOLERANCE);
        assert!(m.y_axis.dot(m.z_axis).abs() < TOLERANCE);
        assert!(m.x_axis.dot(m.z_axis).abs() < TOLERANCE);
    }

    #[test]
    fn test_distance_strictly_increasing() {
        let path = Path::generate(7);
        let parts = path.parts();
        assert!(parts.len() >= 2);
        for pair in parts.windows(2) {
            assert!(pair[0].distance < pair[1].distance);
        }
        assert_eq!(parts[0].distance, 0.0);
    }

    #[test]
    fn test_frames_orthonormal() {
        let path = Path::generate(7);
        for part in path.parts() {
            assert_orthonormal(&part.orientation);
        }
    }

    #[test]
    fn test_frames_continuous() {
        // The carried-forward up vector keeps consecutive frames close
        let path = Path::generate(11);
        for pair in path.parts().windows(2) {
            assert!(pair[0].up().dot(pair[1].up()) > 0.9);
            assert!(pair[0].forward().dot(pair[1].forward()) > 0.9);
        }
    }

    #[test]
    fn test_generation_deterministic() {
        let a = Path::generate(42);
        let b = Path::generate(42);
        assert_eq!(a.parts().len(), b.parts().len());
        for (pa, pb) in a.parts().iter().zip(b.parts()) {
            assert_eq!(pa.distance, pb.distance);
            assert_eq!(pa.center, pb.center);
            assert_eq!(pa.orientation, pb.orientation);
        }
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = Path::generate(1);
        let b = Path::generate(2);
        let same = a
            .parts()
            .iter()
            .zip(b.parts())
            .all(|(pa, pb)| pa.center == pb.center);
        assert!(!same);
    }
}
