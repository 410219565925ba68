//! World snapshot: the visible simulation state handed to collaborators.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EntityId, SimTime};

/// Complete visible state after a frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    /// Towers and enemies, ordered by id.
    pub entities: Vec<EntityView>,
    pub projectiles: usize,
}

/// A tower or enemy as seen by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityView {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: Vec3,
    pub health: f32,
    pub max_health: f32,
    pub state: Option<BehaviorState>,
    pub target: Option<EntityId>,
}

impl WorldSnapshot {
    pub fn towers(&self) -> impl Iterator<Item = &EntityView> {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Tower { .. }))
    }

    pub fn enemies(&self) -> impl Iterator<Item = &EntityView> {
        self.entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Enemy { .. }))
    }
}
