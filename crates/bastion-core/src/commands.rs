//! Commands sent from the interaction layer to the simulation.
//!
//! Commands are queued and processed at the next frame boundary.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::*;

/// All actions collaborators may request from the simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Command {
    /// Drop a new tower at `position`. It falls and auto-places itself.
    SpawnTower {
        kind: TowerKind,
        position: Vec3,
        rotation: Quat,
    },
    /// Spawn an enemy at `position`.
    SpawnEnemy { kind: EnemyKind, position: Vec3 },
    /// Undo the most recent spawn command.
    Undo,
}
