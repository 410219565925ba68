//! ECS components for hecs entities.
//!
//! Components are plain data structs with no behavior.
//! Game logic lives in controllers and systems, not components.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// Marks an entity as a tower.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Tower {
    pub kind: TowerKind,
}

/// Marks an entity as an enemy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
}

/// Simplified rigid body. Only dynamic bodies are integrated by physics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RigidBody {
    pub velocity: Vec3,
    /// Whether gravity and integration apply. Cleared when a tower settles.
    pub dynamic: bool,
    /// Velocity damping per second, raised once a tower touches down.
    pub linear_damping: f32,
}

impl RigidBody {
    pub fn dynamic() -> Self {
        Self {
            velocity: Vec3::ZERO,
            dynamic: true,
            linear_damping: 0.0,
        }
    }

    pub fn frozen() -> Self {
        Self {
            velocity: Vec3::ZERO,
            dynamic: false,
            linear_damping: 0.0,
        }
    }
}

/// Sphere collider used for projectile hits and proximity queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Collider {
    pub radius: f32,
}

/// Independently rotating aim pivot (turret head or the body itself).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AimPivot {
    /// Local offset of the pivot from the entity origin.
    pub offset: Vec3,
    /// World-space rotation of the pivot.
    pub rotation: Quat,
}

/// Local offset of the point projectiles leave from, relative to the aim pivot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Muzzle {
    pub offset: Vec3,
}

/// Last frame's ground contact reported by physics, consumed by placement.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct GroundContact {
    pub point: Option<Vec3>,
}

/// In-flight projectile.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Projectile {
    pub velocity: Vec3,
    pub remaining_secs: f32,
    pub damage: f32,
    pub radius: f32,
    /// Faction of the shooter; projectiles never hit it.
    pub owner: Faction,
    pub target_kind: TargetKind,
}
