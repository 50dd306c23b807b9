//! Camera and play-head marker driven by the path

use glam::{Mat4, Vec3, Vec4};

use crate::consts::{CAMERA_SMOOTHING_RATE, SPEED};
use crate::path::Path;

/// Projection and view parameters handed to the renderer.
#[derive(Debug, Clone)]
pub struct Camera {
    pub fov: f32,
    pub aspect_ratio: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub eye: Vec3,
    pub center: Vec3,
    pub up: Vec3,
}

impl Camera {
    pub fn new() -> Self {
        Self {
            fov: 45f32.to_radians(),
            aspect_ratio: 1.0,
            z_near: 0.1,
            z_far: 100.0,
            eye: Vec3::new(1.0, 0.0, 0.0),
            center: Vec3::ZERO,
            up: Vec3::new(0.0, 1.0, 0.0),
        }
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect_ratio, self.z_near, self.z_far)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.center, self.up)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

/// A plane at the play head, used externally to clip hold geometry behind
/// the marker.
#[derive(Debug, Clone, Copy)]
pub struct ClipPlane {
    pub position: Vec3,
    pub normal: Vec3,
}

/// Derives the camera and marker transform from the play-head pose, with
/// first-order smoothing on the eye position.
#[derive(Debug, Clone)]
pub struct CameraDriver {
    camera: Camera,
    position: Vec3,
    snapped: bool,
    marker_transform: Mat4,
    clip_plane: ClipPlane,
}

impl CameraDriver {
    /// Eye offset in the play-head's local frame (x up, y side, z forward)
    const EYE_OFFSET: Vec4 = Vec4::new(0.15, 0.0, -0.2, 1.0);
    /// Look-at target offset, slightly down the track
    const CENTER_OFFSET: Vec4 = Vec4::new(0.0, 0.0, 0.2, 1.0);

    pub fn new() -> Self {
        Self {
            camera: Camera::new(),
            position: Vec3::ZERO,
            snapped: false,
            marker_transform: Mat4::IDENTITY,
            clip_plane: ClipPlane {
                position: Vec3::ZERO,
                normal: Vec3::Z,
            },
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn marker_transform(&self) -> Mat4 {
        self.marker_transform
    }

    pub fn clip_plane(&self) -> ClipPlane {
        self.clip_plane
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) {
        self.camera.aspect_ratio = aspect_ratio;
    }

    /// Forget the smoothed position so the next update snaps, avoiding a
    /// long camera swoop into a freshly started level.
    pub fn reset(&mut self) {
        self.snapped = false;
    }

    pub fn update(&mut self, path: &Path, track_time: f32, dt: f32) {
        let distance = SPEED * track_time;
        let pose = path.pose_at(distance);
        let transform = pose.transform();

        let wanted = (transform * Self::EYE_OFFSET).truncate();

        if !self.snapped {
            self.position = wanted;
            self.snapped = true;
        } else {
            // frame-rate independent low-pass toward the wanted position
            let blend = 1.0 - (-CAMERA_SMOOTHING_RATE * dt).exp();
            self.position = self.position.lerp(wanted, blend);
        }

        self.camera.eye = self.position;
        self.camera.center = (transform * Self::CENTER_OFFSET).truncate();
        self.camera.up = pose.up();

        self.marker_transform = transform;
        self.clip_plane = ClipPlane {
            position: pose.center,
            normal: pose.forward(),
        };
    }
}

impl Default for CameraDriver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_update_snaps() {
        let path = Path::generate(21);
        let mut driver = CameraDriver::new();
        driver.update(&path, 1.0, 1.0 / 60.0);

        let pose = path.pose_at(SPEED);
        let wanted = (pose.transform() * CameraDriver::EYE_OFFSET).truncate();
        assert!(driver.camera().eye.abs_diff_eq(wanted, 1e-5));
    }

    #[test]
    fn test_smoothing_approaches_wanted() {
        let path = Path::generate(21);
        let mut driver = CameraDriver::new();
        driver.update(&path, 0.0, 1.0 / 60.0);

        // jump the play head; the eye should lag, then converge
        driver.update(&path, 10.0, 1.0 / 60.0);
        let wanted = (path.pose_at(10.0 * SPEED).transform() * CameraDriver::EYE_OFFSET).truncate();
        let first_error = driver.camera().eye.distance(wanted);
        assert!(first_error > 1e-4);

        for _ in 0..300 {
            driver.update(&path, 10.0, 1.0 / 60.0);
        }
        assert!(driver.camera().eye.distance(wanted) < 1e-3);
    }

    #[test]
    fn test_reset_snaps_again() {
        let path = Path::generate(21);
        let mut driver = CameraDriver::new();
        driver.update(&path, 0.0, 1.0 / 60.0);
        driver.reset();
        driver.update(&path, 20.0, 1.0 / 60.0);

        let wanted = (path.pose_at(20.0 * SPEED).transform() * CameraDriver::EYE_OFFSET).truncate();
        assert!(driver.camera().eye.abs_diff_eq(wanted, 1e-5));
    }

    #[test]
    fn test_clip_plane_at_play_head() {
        let path = Path::generate(21);
        let mut driver = CameraDriver::new();
        driver.update(&path, 3.0, 1.0 / 60.0);

        let pose = path.pose_at(3.0 * SPEED);
        let plane = driver.clip_plane();
        assert!(plane.position.abs_diff_eq(pose.center, 1e-5));
        assert!((plane.normal.length() - 1.0).abs() < 1e-4);
    }
}
