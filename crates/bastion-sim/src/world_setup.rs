//! Entity spawn factories for setting up the simulation world.
//!
//! Creates towers, enemies and projectiles with their component bundles.
//! Controllers are attached by the engine.

use glam::Vec3;
use hecs::{Entity, EntityBuilder, World};

use bastion_behavior::health::Health;
use bastion_core::components::*;
use bastion_core::enums::*;
use bastion_core::settings::{EnemySettings, TowerSettings};
use bastion_core::types::{look_rotation, EntityId, Pose, UP};

/// Stable id of an ECS entity as exposed to collaborators.
pub fn entity_id(entity: Entity) -> EntityId {
    EntityId(entity.to_bits().get())
}

/// Spawn a dynamic tower at `pose`. It falls under gravity until placed.
pub fn spawn_tower(world: &mut World, kind: TowerKind, pose: Pose, profile: &TowerSettings) -> Entity {
    let mut builder = EntityBuilder::new();
    builder
        .add(Tower { kind })
        .add(Faction::Tower)
        .add(pose)
        .add(RigidBody::dynamic())
        .add(GroundContact::default())
        .add(Collider {
            radius: profile.collider_radius,
        })
        .add(Health::new(&profile.health))
        .add(AimPivot {
            offset: profile.pivot_offset,
            rotation: pose.rotation,
        });
    if let Some(offset) = profile.muzzle_offset {
        builder.add(Muzzle { offset });
    }
    world.spawn(builder.build())
}

/// Spawn an enemy at `position`, facing the world origin horizontally.
pub fn spawn_enemy(world: &mut World, kind: EnemyKind, position: Vec3, settings: &EnemySettings) -> Entity {
    let heading = Vec3::new(-position.x, 0.0, -position.z);
    let rotation = look_rotation(heading, UP).unwrap_or_default();

    let mut builder = EntityBuilder::new();
    builder
        .add(Enemy { kind })
        .add(Faction::Enemy)
        .add(Pose::new(position, rotation))
        .add(Collider {
            radius: settings.collider_radius,
        })
        .add(Health::new(&settings.health));
    if let Some(offset) = settings.muzzle_offset {
        builder.add(Muzzle { offset });
    }
    world.spawn(builder.build())
}

pub fn spawn_projectile(world: &mut World, origin: Vec3, projectile: Projectile) -> Entity {
    world.spawn((Pose::at(origin), projectile))
}
