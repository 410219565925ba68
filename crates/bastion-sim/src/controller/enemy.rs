//! Enemy controller: find a tower, fly to it, attack until it is gone.

use hecs::{Entity, World};

use bastion_behavior::aim::turn_toward;
use bastion_behavior::state_machine::{
    follow_signal, start, Listeners, Signal, State, StateMachine, StateTable,
};
use bastion_behavior::targeting::TargetFinder;
use bastion_core::constants::TARGET_QUERY_CAPACITY;
use bastion_core::enums::{BehaviorState, EnemyKind, EnemyState, Faction};
use bastion_core::events::SimEvent;
use bastion_core::settings::EnemySettings;
use bastion_core::types::Pose;

use super::{publish_changes, AgentContext, AttackState};
use crate::spatial;
use crate::terrain::Terrain;
use crate::world_setup::entity_id;

fn edges(state: EnemyState) -> &'static [(Signal, EnemyState)] {
    match state {
        EnemyState::FindTarget => &[(Signal::TargetFound, EnemyState::FlyTowardTarget)],
        EnemyState::FlyTowardTarget => &[
            (Signal::Finished, EnemyState::Attack),
            (Signal::TargetLost, EnemyState::FindTarget),
        ],
        EnemyState::Attack => &[(Signal::Finished, EnemyState::FindTarget)],
    }
}

pub struct FindTargetState {
    finder: TargetFinder,
}

impl<'w> State<AgentContext<'w>> for FindTargetState {
    fn enter(&mut self, _ctx: &mut AgentContext<'w>) {
        self.finder.reset();
    }

    fn tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        let origin = ctx.pose()?.position;
        let world = &*ctx.world;
        let entity = ctx.entity;
        let found = self.finder.acquire(origin, &mut *ctx.target, || {
            log::trace!("{entity:?} searching for towers");
            spatial::living(world, Faction::Tower)
        })?;
        ctx.events.push(SimEvent::TargetFound {
            entity: entity_id(ctx.entity),
            target: entity_id(found),
        });
        Some(Signal::TargetFound)
    }

    fn is_finished(&self) -> bool {
        self.finder.has_announced()
    }
}

/// Fly straight at the target and stop `reach_threshold` short of it.
pub struct FlyTowardState {
    move_speed: f32,
    angle_per_second: f32,
    reach_threshold: f32,
    arrived: bool,
}

impl<'w> State<AgentContext<'w>> for FlyTowardState {
    fn enter(&mut self, _ctx: &mut AgentContext<'w>) {
        self.arrived = false;
    }

    fn tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        let Some(target) = ctx.target_position() else {
            return Some(Signal::TargetLost);
        };
        if self.arrived {
            return None;
        }
        let pose = ctx.pose()?;
        let offset = target - pose.position;
        let distance = offset.length();
        if distance <= self.reach_threshold {
            self.arrived = true;
            return Some(Signal::Finished);
        }

        let remaining = distance - self.reach_threshold;
        let travel = (self.move_speed * ctx.dt).min(remaining);
        let position = pose.position + offset / distance * travel;
        let rotation = turn_toward(
            pose.rotation,
            pose.position,
            target,
            self.angle_per_second,
            ctx.dt,
        );
        ctx.set_pose(Pose::new(position, rotation));

        if travel >= remaining {
            self.arrived = true;
            Some(Signal::Finished)
        } else {
            None
        }
    }

    fn is_finished(&self) -> bool {
        self.arrived
    }
}

pub struct EnemyStates {
    find_target: FindTargetState,
    fly_toward: FlyTowardState,
    attack: AttackState,
}

impl<'w> StateTable<EnemyState, AgentContext<'w>> for EnemyStates {
    fn state_mut(&mut self, key: EnemyState) -> &mut dyn State<AgentContext<'w>> {
        match key {
            EnemyState::FindTarget => &mut self.find_target,
            EnemyState::FlyTowardTarget => &mut self.fly_toward,
            EnemyState::Attack => &mut self.attack,
        }
    }
}

pub struct EnemyController {
    entity: Entity,
    kind: EnemyKind,
    machine: StateMachine<EnemyState>,
    listeners: Listeners<EnemyState>,
    states: EnemyStates,
    target: Option<Entity>,
}

impl EnemyController {
    pub fn new(entity: Entity, kind: EnemyKind, settings: &EnemySettings) -> Self {
        Self {
            entity,
            kind,
            machine: StateMachine::new(),
            listeners: Listeners::new(),
            states: EnemyStates {
                find_target: FindTargetState {
                    finder: TargetFinder::new(settings.find_radius, TARGET_QUERY_CAPACITY),
                },
                fly_toward: FlyTowardState {
                    move_speed: settings.move_speed,
                    angle_per_second: settings.angle_per_second,
                    reach_threshold: settings.reach_threshold,
                    arrived: false,
                },
                attack: AttackState::new(
                    settings.fire_rate,
                    settings.projectile,
                    Some(settings.angle_per_second),
                ),
            },
            target: None,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn state(&self) -> Option<EnemyState> {
        self.machine.current()
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn initialize(&mut self, world: &mut World, terrain: &Terrain, events: &mut Vec<SimEvent>) {
        let Self {
            entity,
            machine,
            listeners,
            states,
            target,
            ..
        } = &mut *self;
        let mut ctx = AgentContext {
            world,
            terrain,
            entity: *entity,
            target,
            events,
            dt: 0.0,
        };
        start(machine, listeners, states, &mut ctx, EnemyState::FindTarget, edges);
        publish_changes(self.entity, self.machine.take_changes(), BehaviorState::Enemy, events);
    }

    /// Enemies fly kinematically; nothing runs at the physics rate.
    pub fn fixed_tick(&mut self, _world: &mut World, _terrain: &Terrain, _dt: f32, _events: &mut Vec<SimEvent>) {}

    pub fn tick(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>) {
        // A dead or despawned target is dropped; the active state reacts.
        if let Some(target) = self.target {
            if !spatial::is_living(world, target) {
                self.target = None;
            }
        }

        let Self {
            entity,
            machine,
            listeners,
            states,
            target,
            ..
        } = &mut *self;
        let mut ctx = AgentContext {
            world,
            terrain,
            entity: *entity,
            target,
            events,
            dt,
        };
        if let Some((state, signal)) = machine.tick(states, &mut ctx) {
            log::debug!("{:?} {state:?} raised {signal:?}", ctx.entity);
            ctx.events.push(SimEvent::StateFinished {
                entity: entity_id(ctx.entity),
                state: BehaviorState::Enemy(state),
            });
            follow_signal(machine, listeners, states, &mut ctx, (state, signal), edges);
        }
        publish_changes(self.entity, self.machine.take_changes(), BehaviorState::Enemy, events);
    }

    pub fn deinitialize(&mut self, world: &mut World, terrain: &Terrain, events: &mut Vec<SimEvent>) {
        let Self {
            entity,
            machine,
            listeners,
            states,
            target,
            ..
        } = &mut *self;
        let mut ctx = AgentContext {
            world,
            terrain,
            entity: *entity,
            target,
            events,
            dt: 0.0,
        };
        machine.stop(states, &mut ctx);
        listeners.clear();
        self.target = None;
    }

    pub fn forget(&mut self, entity: Entity) {
        if self.target == Some(entity) {
            self.target = None;
        }
    }
}
