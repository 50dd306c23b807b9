//! Continuous pose queries over the generated part table

use glam::{Mat3, Mat4, Quat, Vec3};

use super::Path;

/// A pose evaluated at an arbitrary distance along the path. Derived value,
/// recomputed on every query.
#[derive(Debug, Clone, Copy)]
pub struct Pose {
    pub orientation: Mat3,
    pub center: Vec3,
}

impl Pose {
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

    /// World transform placing local space at this pose: local x maps to the
    /// up vector, y to side, z to forward.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_translation(self.center) * Mat4::from_mat3(self.orientation)
    }
}

impl Path {
    /// Pose at an arbitrary arc-length distance.
    ///
    /// Queries outside `[0, length]` are clamped to the path ends; variable
    /// frame times can push the play head past the authored chart length, so
    /// out-of-range is handled here rather than treated as a caller bug.
    /// The bracketing samples are found by binary search; the center is
    /// interpolated linearly and the orientation spherically through unit
    /// quaternions, so the result stays orthonormal and is continuous in
    /// distance.
    pub fn pose_at(&self, distance: f32) -> Pose {
        let parts = self.parts();
        debug_assert!(parts.len() >= 2);

        let distance = distance.clamp(parts[0].distance, self.length());

        // upper bound, then back up one
        let index = parts
            .partition_point(|part| part.distance <= distance)
            .saturating_sub(1)
            .min(parts.len() - 2);

        let cur = &parts[index];
        let next = &parts[index + 1];

        let t = ((distance - cur.distance) / (next.distance - cur.distance)).clamp(0.0, 1.0);

        let center = cur.center.lerp(next.center, t);

        let q0 = Quat::from_mat3(&cur.orientation);
        let q1 = Quat::from_mat3(&next.orientation);
        let orientation = Mat3::from_quat(q0.slerp(q1, t));

        Pose {
            orientation,
            center,
        }
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
    fn test_pose_matches_samples() {
        let path = Path::generate(3);
        for part in path.parts().iter().take(50) {
            let pose = path.pose_at(part.distance);
            assert!(pose.center.abs_diff_eq(part.center, 1e-4));
        }
    }

    #[test]
    fn test_interpolated_frames_orthonormal() {
        let path = Path::generate(3);
        let length = path.length();
        for i in 0..500 {
            let d = length * i as f32 / 500.0;
            assert_orthonormal(&path.pose_at(d).orientation);
        }
    }

    #[test]
    fn test_continuity() {
        // No popping across table boundaries for a dense sweep
        let path = Path::generate(5);
        let length = path.length();
        let epsilon = 1e-4;
        for i in 0..1000 {
            let d = length * i as f32 / 1000.0;
            let a = path.pose_at(d);
            let b = path.pose_at(d + epsilon);
            assert!(a.center.distance(b.center) < 1e-2);
        }
    }

    #[test]
    fn test_out_of_range_clamps() {
        let path = Path::generate(9);
        let first = path.parts().first().unwrap();
        let last = path.parts().last().unwrap();

        let before = path.pose_at(first.distance - 5.0);
        assert!(before.center.abs_diff_eq(first.center, 1e-4));

        let after = path.pose_at(last.distance + 5.0);
        assert!(after.center.abs_diff_eq(last.center, 1e-4));
    }

    #[test]
    fn test_transform_maps_origin_to_center() {
        let path = Path::generate(9);
        let pose = path.pose_at(1.0);
        let origin = pose.transform().transform_point3(Vec3::ZERO);
        assert!(origin.abs_diff_eq(pose.center, 1e-5));
    }
}
