//! Auto-placement: a dropped tower detects touchdown, orients itself to the
//! ground and freezes.
//!
//! Falling -> Orienting -> Settled. Landing is detected either by a downward
//! probe from the base (once the body is slow or descending) or by a physics
//! contact confirmed with a short probe. Settled is terminal.

use bastion_core::components::RigidBody;
use bastion_core::constants::{PLACEMENT_CONTACT_PROBE_DISTANCE, PLACEMENT_CONTACT_PROBE_LIFT};
use bastion_core::enums::PlacementPhase;
use bastion_core::settings::PlacementSettings;
use bastion_core::types::{angle_between_deg, look_rotation, Pose, UP};
use glam::{Quat, Vec3};

/// A ground surface hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundHit {
    pub point: Vec3,
    /// Unit surface normal.
    pub normal: Vec3,
}

/// Downward ray queries against ground surfaces.
pub trait GroundProbe {
    /// First ground hit straight down from `origin` within `max_distance`.
    fn raycast_down(&self, origin: Vec3, max_distance: f32) -> Option<GroundHit>;
}

/// Progress reported by `PlacementSettler::fixed_tick`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlacementEvent {
    /// Touched down; orientation started.
    Landed(GroundHit),
    /// Orientation reached; the body is now frozen.
    Settled { position: Vec3, rotation: Quat },
}

#[derive(Debug, Clone)]
pub struct PlacementSettler {
    settings: PlacementSettings,
    phase: PlacementPhase,
    landed: bool,
    ground_point: Vec3,
    target_rotation: Quat,
}

impl PlacementSettler {
    pub fn new(settings: &PlacementSettings) -> Self {
        Self {
            settings: settings.clone(),
            phase: PlacementPhase::Falling,
            landed: false,
            ground_point: Vec3::ZERO,
            target_rotation: Quat::IDENTITY,
        }
    }

    pub fn phase(&self) -> PlacementPhase {
        self.phase
    }

    pub fn is_settled(&self) -> bool {
        self.phase == PlacementPhase::Settled
    }

    /// Rotation the tower is converging on, once landed.
    pub fn target_rotation(&self) -> Option<Quat> {
        self.landed.then_some(self.target_rotation)
    }

    /// Advance one physics step. `contact` is the ground contact point physics
    /// reported this step, if any. Returns `Landed` and then `Settled`, each
    /// exactly once; orientation starts on the step after touchdown.
    pub fn fixed_tick(
        &mut self,
        pose: &mut Pose,
        body: &mut RigidBody,
        contact: Option<Vec3>,
        ground: &dyn GroundProbe,
        dt: f32,
    ) -> Option<PlacementEvent> {
        match self.phase {
            PlacementPhase::Falling => self.detect_landing(pose, body, contact, ground),
            PlacementPhase::Orienting => self.orient(pose, body, dt),
            PlacementPhase::Settled => None,
        }
    }

    fn detect_landing(
        &mut self,
        pose: &Pose,
        body: &mut RigidBody,
        contact: Option<Vec3>,
        ground: &dyn GroundProbe,
    ) -> Option<PlacementEvent> {
        if self.landed {
            return None;
        }
        let contact_hit = contact.and_then(|point| {
            ground.raycast_down(
                point + UP * PLACEMENT_CONTACT_PROBE_LIFT,
                PLACEMENT_CONTACT_PROBE_DISTANCE,
            )
        });
        let hit = contact_hit.or_else(|| {
            let slow = body.velocity.length() < self.settings.stability_threshold;
            let descending = body.velocity.y < 0.0;
            if slow || descending {
                let base = pose.transform_point(self.settings.base_offset);
                ground.raycast_down(base, self.settings.snap_distance)
            } else {
                None
            }
        })?;
        self.land(pose, body, hit);
        Some(PlacementEvent::Landed(hit))
    }

    fn land(&mut self, pose: &Pose, body: &mut RigidBody, hit: GroundHit) {
        self.landed = true;
        self.ground_point = hit.point;
        body.linear_damping = self.settings.landed_damping;
        self.target_rotation = if self.settings.use_ground_normal {
            (Quat::from_rotation_arc(pose.up(), hit.normal) * pose.rotation).normalize()
        } else {
            look_rotation(pose.forward(), UP).unwrap_or(pose.rotation)
        };
        self.phase = PlacementPhase::Orienting;
        log::debug!(
            "tower landed at {:?}, normal {:?}",
            hit.point,
            hit.normal
        );
    }

    fn orient(&mut self, pose: &mut Pose, body: &mut RigidBody, dt: f32) -> Option<PlacementEvent> {
        let t = (self.settings.orientation_speed * dt).clamp(0.0, 1.0);
        pose.rotation = pose.rotation.slerp(self.target_rotation, t).normalize();
        if self.settings.snap_to_ground {
            let desired = self.rest_position(pose.rotation);
            pose.position = pose.position.lerp(desired, t);
        }

        if angle_between_deg(pose.rotation, self.target_rotation) >= self.settings.complete_angle_deg {
            return None;
        }

        pose.rotation = self.target_rotation;
        if self.settings.snap_to_ground {
            pose.position = self.rest_position(self.target_rotation);
        }
        body.dynamic = false;
        body.velocity = Vec3::ZERO;
        self.phase = PlacementPhase::Settled;
        Some(PlacementEvent::Settled {
            position: pose.position,
            rotation: pose.rotation,
        })
    }

    /// Origin position that puts the base on the ground point.
    fn rest_position(&self, rotation: Quat) -> Vec3 {
        self.ground_point - rotation * self.settings.base_offset
    }
}
