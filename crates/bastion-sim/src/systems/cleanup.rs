//! Cleanup system: removes dead towers and enemies.

use hecs::{Entity, World};

use bastion_behavior::health::Health;

/// Despawn every entity whose health is dead. The despawned entities are
/// left in `despawn_buffer` so the engine can release their controllers.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    for (entity, health) in world.query_mut::<&Health>() {
        if health.is_dead() {
            despawn_buffer.push(entity);
        }
    }

    for &entity in despawn_buffer.iter() {
        let _ = world.despawn(entity);
    }
}
