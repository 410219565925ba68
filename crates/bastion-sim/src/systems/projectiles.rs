//! Projectile flight and impact.
//!
//! Each fixed step moves every projectile along its velocity and sweeps the
//! travelled segment against the colliders of living entities of the other
//! faction. The first hit applies damage once and destroys the projectile.
//! Projectiles whose lifetime runs out are destroyed without effect.

use glam::Vec3;
use hecs::{Entity, World};

use bastion_behavior::combat::{can_hit, fly, sweep_sphere};
use bastion_behavior::health::Health;
use bastion_core::components::{Collider, Projectile};
use bastion_core::enums::{Faction, TargetKind};
use bastion_core::events::SimEvent;
use bastion_core::types::Pose;

use crate::world_setup::entity_id;

struct Impact {
    target: Entity,
    damage: f32,
    position: Vec3,
    target_kind: TargetKind,
}

pub fn run(world: &mut World, dt: f32, events: &mut Vec<SimEvent>, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();

    let colliders: Vec<(Entity, Vec3, f32, Faction)> = world
        .query::<(&Pose, &Collider, &Faction, &Health)>()
        .iter()
        .filter(|(_, (_, _, _, health))| health.is_alive())
        .map(|(entity, (pose, collider, faction, _))| (entity, pose.position, collider.radius, *faction))
        .collect();

    let mut impacts = Vec::new();
    for (entity, (pose, projectile)) in world.query_mut::<(&mut Pose, &mut Projectile)>() {
        let step = fly(projectile, pose.position, dt);

        let hit = colliders
            .iter()
            .filter(|(_, _, _, faction)| can_hit(projectile.owner, *faction))
            .filter_map(|&(target, center, radius, _)| {
                sweep_sphere(step.start, step.end, center, radius + projectile.radius)
                    .map(|t| (t, target))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0));

        match hit {
            Some((t, target)) => {
                pose.position = step.start.lerp(step.end, t);
                impacts.push(Impact {
                    target,
                    damage: projectile.damage,
                    position: pose.position,
                    target_kind: projectile.target_kind,
                });
                despawn_buffer.push(entity);
            }
            None => {
                pose.position = step.end;
                if step.expired {
                    events.push(SimEvent::ProjectileExpired {
                        position: step.end,
                    });
                    despawn_buffer.push(entity);
                }
            }
        }
    }

    for impact in impacts {
        events.push(SimEvent::ProjectileImpact {
            target: entity_id(impact.target),
            target_kind: impact.target_kind,
            position: impact.position,
        });
        apply_damage(world, impact.target, impact.damage, events);
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Damage `target`, emitting health events. A dead or missing target is
/// left untouched.
pub fn apply_damage(world: &mut World, target: Entity, amount: f32, events: &mut Vec<SimEvent>) {
    let Ok((health, pose)) = world.query_one_mut::<(&mut Health, &Pose)>(target) else {
        return;
    };
    let Some(report) = health.take_damage(amount) else {
        return;
    };
    let id = entity_id(target);
    events.push(SimEvent::DamageTaken {
        entity: id,
        amount: report.amount,
    });
    events.push(SimEvent::HealthChanged {
        entity: id,
        health: report.health,
    });
    if report.died {
        log::info!("{target:?} destroyed at {:?}", pose.position);
        events.push(SimEvent::Death {
            entity: id,
            position: pose.position,
        });
    }
}
