//! Events emitted by the simulation for audio, particle and UI feedback.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::EntityId;

/// One-shot notifications drained by collaborators after each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SimEvent {
    /// A controller switched its active state.
    StateChanged {
        entity: EntityId,
        state: BehaviorState,
    },
    /// The active state raised its completion signal.
    StateFinished {
        entity: EntityId,
        state: BehaviorState,
    },
    /// A controller acquired a new target.
    TargetFound { entity: EntityId, target: EntityId },
    /// A tower finished settling on the ground.
    PlacementComplete { entity: EntityId, position: Vec3 },
    /// Health changed to `health`.
    HealthChanged { entity: EntityId, health: f32 },
    /// Damage was applied.
    DamageTaken { entity: EntityId, amount: f32 },
    /// The entity died. Fired once per entity.
    Death { entity: EntityId, position: Vec3 },
    /// A projectile left a muzzle.
    ProjectileFired {
        shooter: EntityId,
        target_kind: TargetKind,
        origin: Vec3,
    },
    /// A projectile hit something and was destroyed.
    ProjectileImpact {
        target: EntityId,
        target_kind: TargetKind,
        position: Vec3,
    },
    /// A projectile ran out of lifetime.
    ProjectileExpired { position: Vec3 },
    /// An entity was spawned by a command or the wave spawner.
    Spawned { entity: EntityId, kind: EntityKind },
}

/// Notifications raised by menu buttons for audio and visual feedback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InteractionEvent {
    HoverEnter { button: u32 },
    HoverExit { button: u32 },
    PinchStart { button: u32 },
    PinchEnd { button: u32 },
    PinchSelect { button: u32 },
    VisualState { button: u32, state: ButtonState },
}
