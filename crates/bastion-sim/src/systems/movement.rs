//! Rigid body integration.
//!
//! Applies gravity and damping to dynamic bodies, integrates position and
//! resolves ground penetration, recording the contact for auto-placement.
//! Not a general physics solver: bodies are points resting on ground planes.

use glam::Vec3;
use hecs::World;

use bastion_core::components::{GroundContact, RigidBody};
use bastion_core::types::Pose;

use crate::terrain::Terrain;

/// Integrate every dynamic body by one fixed step of `dt` seconds.
/// `base_offset` is the local offset of the point that touches the ground.
pub fn run(world: &mut World, terrain: &Terrain, gravity: f32, base_offset: Vec3, dt: f32) {
    for (_entity, (pose, body, contact)) in
        world.query_mut::<(&mut Pose, &mut RigidBody, &mut GroundContact)>()
    {
        contact.point = None;
        if !body.dynamic {
            continue;
        }

        body.velocity.y -= gravity * dt;
        if body.linear_damping > 0.0 {
            body.velocity /= 1.0 + body.linear_damping * dt;
        }
        pose.position += body.velocity * dt;

        let base = pose.transform_point(base_offset);
        let Some(surface) = terrain.surface_at(base.x, base.z) else {
            continue;
        };
        let penetration = surface.point.y - base.y;
        if penetration < 0.0 {
            continue;
        }
        pose.position.y += penetration;
        let into_ground = body.velocity.dot(surface.normal);
        if into_ground < 0.0 {
            body.velocity -= surface.normal * into_ground;
        }
        contact.point = Some(surface.point);
    }
}
