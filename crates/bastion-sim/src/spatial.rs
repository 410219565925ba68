//! Proximity queries over the ECS world.

use glam::Vec3;
use hecs::{Entity, World};

use bastion_behavior::health::Health;
use bastion_core::enums::Faction;
use bastion_core::types::Pose;

/// Living entities of `faction` with their positions, in query order.
pub fn living(world: &World, faction: Faction) -> Vec<(Entity, Vec3)> {
    world
        .query::<(&Pose, &Faction, &Health)>()
        .iter()
        .filter(|(_, (_, f, health))| **f == faction && health.is_alive())
        .map(|(entity, (pose, _, _))| (entity, pose.position))
        .collect()
}

/// Whether `entity` exists and is not dead.
pub fn is_living(world: &World, entity: Entity) -> bool {
    world
        .get::<&Health>(entity)
        .map(|health| health.is_alive())
        .unwrap_or(false)
}

pub fn position(world: &World, entity: Entity) -> Option<Vec3> {
    world.get::<&Pose>(entity).ok().map(|pose| pose.position)
}
