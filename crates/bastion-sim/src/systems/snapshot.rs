//! Snapshot system: builds a `WorldSnapshot` from the world and controllers.
//!
//! This system is read-only; it never modifies the world.

use std::collections::HashMap;

use hecs::{Entity, World};

use bastion_behavior::health::Health;
use bastion_core::components::{Enemy, Projectile, Tower};
use bastion_core::enums::{BehaviorState, EntityKind};
use bastion_core::state::{EntityView, WorldSnapshot};
use bastion_core::types::{Pose, SimTime};

use crate::controller::Controller;
use crate::world_setup::entity_id;

pub fn build_snapshot(world: &World, time: &SimTime, controllers: &[Controller]) -> WorldSnapshot {
    let behavior: HashMap<Entity, (Option<BehaviorState>, Option<Entity>)> = controllers
        .iter()
        .map(|c| (c.entity(), (c.state(), c.target())))
        .collect();

    let mut entities: Vec<EntityView> = world
        .query::<(&Pose, &Health, Option<&Tower>, Option<&Enemy>)>()
        .iter()
        .filter_map(|(entity, (pose, health, tower, enemy))| {
            let kind = match (tower, enemy) {
                (Some(tower), _) => EntityKind::Tower { kind: tower.kind },
                (None, Some(enemy)) => EntityKind::Enemy { kind: enemy.kind },
                (None, None) => return None,
            };
            let (state, target) = behavior.get(&entity).copied().unwrap_or((None, None));
            Some(EntityView {
                id: entity_id(entity),
                kind,
                position: pose.position,
                health: health.current(),
                max_health: health.max(),
                state,
                target: target.map(entity_id),
            })
        })
        .collect();
    entities.sort_by_key(|view| view.id);

    WorldSnapshot {
        time: *time,
        entities,
        projectiles: world.query::<&Projectile>().iter().count(),
    }
}
