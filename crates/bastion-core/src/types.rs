//! Fundamental geometric and simulation types.
//!
//! Coordinates are meters, right-handed, Y up. An entity's forward axis is
//! local +Z, matching the convention of the hand-tracking collaborators.

use glam::{Mat3, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Local forward axis of every entity.
pub const FORWARD: Vec3 = Vec3::Z;

/// World up axis.
pub const UP: Vec3 = Vec3::Y;

/// Stable identifier of a simulated entity, as exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Position and orientation of an entity in world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Pose {
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }

    /// World-space forward direction.
    pub fn forward(&self) -> Vec3 {
        self.rotation * FORWARD
    }

    /// World-space up direction.
    pub fn up(&self) -> Vec3 {
        self.rotation * UP
    }

    /// Transform a local-space offset into a world-space point.
    pub fn transform_point(&self, local: Vec3) -> Vec3 {
        self.position + self.rotation * local
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of fixed physics steps executed.
    pub fixed_steps: u64,
    /// Number of variable frames executed.
    pub frames: u64,
    /// Elapsed simulation time in seconds (sum of frame deltas).
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Record one executed fixed step.
    pub fn advance_fixed(&mut self) {
        self.fixed_steps += 1;
    }

    /// Record one executed variable frame of `dt` seconds.
    pub fn advance_frame(&mut self, dt: f32) {
        self.frames += 1;
        self.elapsed_secs += f64::from(dt);
    }
}

/// Rotation whose forward axis points along `forward` with the given `up`
/// hint. Returns `None` for a zero-length direction.
///
/// Falls back to an alternate up axis when `forward` is parallel to `up`.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Option<Quat> {
    let z = forward.try_normalize()?;
    let x = match up.cross(z).try_normalize() {
        Some(x) => x,
        None => {
            let alt = if z.dot(Vec3::Z).abs() < 0.99 {
                Vec3::Z
            } else {
                Vec3::X
            };
            alt.cross(z).try_normalize()?
        }
    };
    let y = z.cross(x);
    Some(Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize())
}

/// Angle in degrees between two rotations.
pub fn angle_between_deg(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}
