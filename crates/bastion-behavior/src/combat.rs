//! Fire control, projectile launch and swept hit tests.

use bastion_core::components::Projectile;
use bastion_core::enums::{Faction, TargetKind};
use bastion_core::settings::ProjectileSettings;
use glam::Vec3;

/// Result of one fire-control tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireDecision {
    /// No target: the attack is over.
    NoTarget,
    /// Waiting for the cooldown.
    Cooling,
    /// Fire now, then call `FireControl::fired`.
    Fire,
}

/// Fixed-rate trigger. Shots are at least `1 / fire_rate` seconds apart.
#[derive(Debug, Clone)]
pub struct FireControl {
    fire_rate: f32,
    cooldown: f32,
}

impl FireControl {
    pub fn new(fire_rate: f32) -> Self {
        let mut control = Self {
            fire_rate,
            cooldown: 0.0,
        };
        control.reset();
        control
    }

    /// Seconds between shots.
    pub fn interval(&self) -> f32 {
        if self.fire_rate > 0.0 {
            1.0 / self.fire_rate
        } else {
            f32::INFINITY
        }
    }

    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    /// Re-seed the cooldown to a full interval. Called on state entry.
    pub fn reset(&mut self) {
        self.cooldown = self.interval();
    }

    pub fn tick(&mut self, dt: f32, has_target: bool) -> FireDecision {
        if self.cooldown > 0.0 {
            self.cooldown -= dt;
        }
        if !has_target {
            FireDecision::NoTarget
        } else if self.cooldown <= 0.0 {
            FireDecision::Fire
        } else {
            FireDecision::Cooling
        }
    }

    pub fn fired(&mut self) {
        self.cooldown = self.interval();
    }
}

/// Build an in-flight projectile aimed from `origin` at `target`.
/// Returns `None` when the two points coincide.
pub fn launch(
    template: &ProjectileSettings,
    origin: Vec3,
    target: Vec3,
    owner: Faction,
    target_kind: TargetKind,
) -> Option<Projectile> {
    let direction = (target - origin).try_normalize()?;
    Some(Projectile {
        velocity: direction * template.speed,
        remaining_secs: template.lifetime_secs,
        damage: template.damage,
        radius: template.radius,
        owner,
        target_kind,
    })
}

/// One step of projectile flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlightStep {
    pub start: Vec3,
    pub end: Vec3,
    /// Lifetime ran out during this step.
    pub expired: bool,
}

/// Advance `projectile` from `position` by `dt`. Travel stops at the end of
/// the projectile's lifetime.
pub fn fly(projectile: &mut Projectile, position: Vec3, dt: f32) -> FlightStep {
    let travel = dt.min(projectile.remaining_secs.max(0.0));
    projectile.remaining_secs -= dt;
    FlightStep {
        start: position,
        end: position + projectile.velocity * travel,
        expired: projectile.remaining_secs <= 0.0,
    }
}

/// First parameter `t` in `[0, 1]` where the segment `start..end` comes within
/// `radius` of `center`. Returns 0 when `start` is already inside.
pub fn sweep_sphere(start: Vec3, end: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = start - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }
    let delta = end - start;
    let a = delta.length_squared();
    if a <= f32::EPSILON {
        return None;
    }
    let b = offset.dot(delta);
    if b >= 0.0 {
        // Moving away from the sphere.
        return None;
    }
    let discriminant = b * b - a * c;
    if discriminant < 0.0 {
        return None;
    }
    let t = (-b - discriminant.sqrt()) / a;
    (t <= 1.0).then_some(t.max(0.0))
}

/// Whether a projectile fired by `owner` may hit an entity of `faction`.
pub fn can_hit(owner: Faction, faction: Faction) -> bool {
    owner != faction
}
