//! Rate-limited turning and the look-at test.

use bastion_core::types::{look_rotation, Pose, UP};
use glam::{Quat, Vec3};

/// Turret aiming parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSettings {
    /// Maximum turn rate (degrees per second).
    pub angle_per_second: f32,
    /// Largest angle still counted as "looking at" (degrees).
    pub threshold_deg: f32,
    /// Targets farther than this never count as looked at.
    pub max_distance: f32,
}

/// Rotate `from` toward `to` by at most `max_degrees`.
pub fn rotate_towards(from: Quat, to: Quat, max_degrees: f32) -> Quat {
    let angle = from.angle_between(to);
    if angle <= f32::EPSILON {
        return to;
    }
    let max = max_degrees.max(0.0).to_radians();
    if angle <= max {
        to
    } else {
        from.slerp(to, max / angle).normalize()
    }
}

/// Turn `rotation`, positioned at `pivot`, toward `target` at no more than
/// `angle_per_second`. Unchanged when the target coincides with the pivot.
pub fn turn_toward(rotation: Quat, pivot: Vec3, target: Vec3, angle_per_second: f32, dt: f32) -> Quat {
    match look_rotation(target - pivot, UP) {
        Some(goal) => rotate_towards(rotation, goal, angle_per_second * dt),
        None => rotation,
    }
}

/// Angle in degrees between the pivot's forward axis and the direction to
/// `target`, or `None` when the target coincides with the pivot.
pub fn angle_to_target_deg(pivot: &Pose, target: Vec3) -> Option<f32> {
    let direction = (target - pivot.position).try_normalize()?;
    let cos = pivot.forward().dot(direction).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// Whether `pivot` faces `target` within the threshold and max distance.
pub fn is_looking_at(pivot: &Pose, target: Vec3, settings: &AimSettings) -> bool {
    if pivot.position.distance(target) > settings.max_distance {
        return false;
    }
    angle_to_target_deg(pivot, target).is_some_and(|angle| angle <= settings.threshold_deg)
}
