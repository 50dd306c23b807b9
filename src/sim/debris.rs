//! Debris particles spawned on tap hits
//!
//! Spawn parameters come from decomposing the judged beat's placement
//! transform; the transforms built by the level mapper are
//! translate * rotate * scale, so the decomposition is exact (no shear).

use glam::{Mat4, Quat, Vec3};
use rand::Rng;
use rand_pcg::Pcg32;

use crate::consts::{DEBRIS_PER_HIT, MAX_DEBRIS};

/// One tumbling fragment.
#[derive(Debug, Clone)]
pub struct Debris {
    pub position: Vec3,
    pub orientation: Quat,
    pub scale: Vec3,
    pub velocity: Vec3,
    pub rotation_axis: Vec3,
    /// Radians per second around `rotation_axis`
    pub rotation_speed: f32,
    pub time: f32,
    pub lifetime: f32,
}

impl Debris {
    /// World transform for rendering this piece.
    pub fn transform(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.orientation, self.position)
    }
}

fn random_axis(rng: &mut Pcg32) -> Vec3 {
    let z: f32 = rng.random_range(-1.0..1.0);
    let theta: f32 = rng.random_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Spawn a burst of debris from a beat transform. The population is
/// capped; spawns past the cap are dropped.
pub fn spawn_burst(debris: &mut Vec<Debris>, rng: &mut Pcg32, transform: &Mat4) {
    let (scale, rotation, translation) = transform.to_scale_rotation_translation();

    for _ in 0..DEBRIS_PER_HIT {
        if debris.len() >= MAX_DEBRIS {
            return;
        }

        // scatter mostly along the local up axis, away from the track
        let local = Vec3::new(
            rng.random_range(0.5..1.5),
            rng.random_range(-0.6..0.6),
            rng.random_range(-0.6..0.6),
        );
        let velocity = rotation * (local * rng.random_range(0.2..0.5));

        debris.push(Debris {
            position: translation,
            orientation: rotation,
            scale: scale * rng.random_range(0.2..0.5),
            velocity,
            rotation_axis: random_axis(rng),
            rotation_speed: rng.random_range(2.0..8.0),
            time: 0.0,
            lifetime: rng.random_range(0.4..0.8),
        });
    }
}

/// Integrate positions and spins, retiring expired pieces.
pub fn update(debris: &mut Vec<Debris>, dt: f32) {
    for piece in debris.iter_mut() {
        piece.time += dt;
        piece.position += piece.velocity * dt;
        let spin = Quat::from_axis_angle(piece.rotation_axis, piece.rotation_speed * dt);
        piece.orientation = (spin * piece.orientation).normalize();
    }
    debris.retain(|piece| piece.time < piece.lifetime);
}
