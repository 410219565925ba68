//! Entity controllers: the per-entity behavior driven by the engine.
//!
//! A controller owns a `StateMachine`, its state instances, the one-shot
//! transition listeners and the entity's current target. Controllers live
//! outside the ECS (like engagements did) and receive `&mut World` through an
//! `AgentContext` each tick.

pub mod enemy;
pub mod tower;

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use bastion_behavior::aim::turn_toward;
use bastion_behavior::combat::{launch, FireControl, FireDecision};
use bastion_behavior::state_machine::{Signal, State};
use bastion_core::components::{AimPivot, Muzzle};
use bastion_core::enums::{BehaviorState, Faction, TargetKind};
use bastion_core::events::SimEvent;
use bastion_core::settings::ProjectileSettings;
use bastion_core::types::Pose;

use crate::terrain::Terrain;
use crate::world_setup::{entity_id, spawn_projectile};

pub use enemy::EnemyController;
pub use tower::TowerController;

/// Everything a state may touch during one tick.
pub struct AgentContext<'w> {
    pub world: &'w mut World,
    pub terrain: &'w Terrain,
    pub entity: Entity,
    pub target: &'w mut Option<Entity>,
    pub events: &'w mut Vec<SimEvent>,
    pub dt: f32,
}

impl AgentContext<'_> {
    pub fn pose(&self) -> Option<Pose> {
        self.world.get::<&Pose>(self.entity).ok().map(|pose| *pose)
    }

    pub fn set_pose(&mut self, pose: Pose) {
        if let Ok(mut current) = self.world.get::<&mut Pose>(self.entity) {
            *current = pose;
        }
    }

    /// Position of the current target, if it still exists.
    pub fn target_position(&self) -> Option<Vec3> {
        let target = (*self.target)?;
        self.world.get::<&Pose>(target).ok().map(|pose| pose.position)
    }

    pub fn target_kind(&self) -> TargetKind {
        let faction = (*self.target)
            .and_then(|target| self.world.get::<&Faction>(target).ok().map(|f| *f));
        TargetKind::from_faction(faction)
    }

    /// World pose of the aim pivot. Entities without a pivot aim with their body.
    pub fn aim_frame(&self) -> Option<Pose> {
        let pose = self.pose()?;
        match self.world.get::<&AimPivot>(self.entity) {
            Ok(pivot) => Some(Pose::new(pose.transform_point(pivot.offset), pivot.rotation)),
            Err(_) => Some(pose),
        }
    }

    pub fn set_aim_rotation(&mut self, rotation: Quat) {
        if let Ok(mut pivot) = self.world.get::<&mut AimPivot>(self.entity) {
            pivot.rotation = rotation;
            return;
        }
        if let Ok(mut pose) = self.world.get::<&mut Pose>(self.entity) {
            pose.rotation = rotation;
        }
    }

    /// World position of the muzzle, or `None` without muzzle geometry.
    pub fn muzzle_position(&self) -> Option<Vec3> {
        let offset = self.world.get::<&Muzzle>(self.entity).ok()?.offset;
        Some(self.aim_frame()?.transform_point(offset))
    }

    pub fn faction(&self) -> Option<Faction> {
        self.world.get::<&Faction>(self.entity).ok().map(|f| *f)
    }

    /// Spawn a projectile from the muzzle toward `target`. Returns `false`
    /// when the muzzle or template is missing.
    fn fire_at(&mut self, template: Option<&ProjectileSettings>, target: Vec3) -> bool {
        let (Some(template), Some(origin), Some(owner)) =
            (template, self.muzzle_position(), self.faction())
        else {
            return false;
        };
        let target_kind = self.target_kind();
        let Some(projectile) = launch(template, origin, target, owner, target_kind) else {
            return false;
        };
        spawn_projectile(self.world, origin, projectile);
        self.events.push(SimEvent::ProjectileFired {
            shooter: entity_id(self.entity),
            target_kind,
            origin,
        });
        true
    }
}

/// Shoot at the current target at a fixed rate until it is gone.
///
/// Shared by the tower Shoot state and the enemy Attack state. With
/// `track_rate` set the aim pivot keeps turning toward the target.
#[derive(Debug, Clone)]
pub struct AttackState {
    fire: FireControl,
    template: Option<ProjectileSettings>,
    track_rate: Option<f32>,
    finished: bool,
    warned: bool,
}

impl AttackState {
    pub fn new(fire_rate: f32, template: Option<ProjectileSettings>, track_rate: Option<f32>) -> Self {
        Self {
            fire: FireControl::new(fire_rate),
            template,
            track_rate,
            finished: false,
            warned: false,
        }
    }
}

impl<'w> State<AgentContext<'w>> for AttackState {
    fn enter(&mut self, _ctx: &mut AgentContext<'w>) {
        self.fire.reset();
        self.finished = false;
        self.warned = false;
    }

    fn tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        if self.finished {
            return None;
        }
        let target = ctx.target_position();

        if let (Some(rate), Some(target)) = (self.track_rate, target) {
            if let Some(frame) = ctx.aim_frame() {
                let rotation = turn_toward(frame.rotation, frame.position, target, rate, ctx.dt);
                ctx.set_aim_rotation(rotation);
            }
        }

        match self.fire.tick(ctx.dt, target.is_some()) {
            FireDecision::NoTarget => {
                self.finished = true;
                Some(Signal::Finished)
            }
            FireDecision::Cooling => None,
            FireDecision::Fire => {
                let target = target?;
                if ctx.fire_at(self.template.as_ref(), target) {
                    self.fire.fired();
                } else if !self.warned {
                    log::warn!(
                        "entity {:?} cannot fire: missing muzzle or projectile template",
                        ctx.entity
                    );
                    self.warned = true;
                }
                None
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.finished
    }
}

/// A tower or enemy controller.
pub enum Controller {
    Tower(TowerController),
    Enemy(EnemyController),
}

impl Controller {
    pub fn entity(&self) -> Entity {
        match self {
            Controller::Tower(c) => c.entity(),
            Controller::Enemy(c) => c.entity(),
        }
    }

    pub fn state(&self) -> Option<BehaviorState> {
        match self {
            Controller::Tower(c) => c.state().map(BehaviorState::Tower),
            Controller::Enemy(c) => c.state().map(BehaviorState::Enemy),
        }
    }

    pub fn target(&self) -> Option<Entity> {
        match self {
            Controller::Tower(c) => c.target(),
            Controller::Enemy(c) => c.target(),
        }
    }

    pub fn initialize(&mut self, world: &mut World, terrain: &Terrain, events: &mut Vec<SimEvent>) {
        match self {
            Controller::Tower(c) => c.initialize(world, terrain, events),
            Controller::Enemy(c) => c.initialize(world, terrain, events),
        }
    }

    pub fn fixed_tick(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>) {
        match self {
            Controller::Tower(c) => c.fixed_tick(world, terrain, dt, events),
            Controller::Enemy(c) => c.fixed_tick(world, terrain, dt, events),
        }
    }

    pub fn tick(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>) {
        match self {
            Controller::Tower(c) => c.tick(world, terrain, dt, events),
            Controller::Enemy(c) => c.tick(world, terrain, dt, events),
        }
    }

    pub fn deinitialize(&mut self, world: &mut World, terrain: &Terrain, events: &mut Vec<SimEvent>) {
        match self {
            Controller::Tower(c) => c.deinitialize(world, terrain, events),
            Controller::Enemy(c) => c.deinitialize(world, terrain, events),
        }
    }

    /// Drop any reference to a removed entity.
    pub fn forget(&mut self, entity: Entity) {
        match self {
            Controller::Tower(c) => c.forget(entity),
            Controller::Enemy(c) => c.forget(entity),
        }
    }
}

/// Turn the state changes a machine recorded into events.
fn publish_changes<K: Copy>(
    entity: Entity,
    changes: Vec<K>,
    to_state: fn(K) -> BehaviorState,
    events: &mut Vec<SimEvent>,
) {
    for key in changes {
        let state = to_state(key);
        log::debug!("{entity:?} -> {state}");
        events.push(SimEvent::StateChanged {
            entity: entity_id(entity),
            state,
        });
    }
}
