//! Tower controller: auto-placement, then acquire, aim and shoot.

use hecs::{Entity, World};

use bastion_behavior::aim::{is_looking_at, turn_toward, AimSettings};
use bastion_behavior::placement::{PlacementEvent, PlacementSettler};
use bastion_behavior::state_machine::{
    follow_signal, start, Listeners, Signal, State, StateMachine, StateTable,
};
use bastion_behavior::targeting::TargetFinder;
use bastion_core::components::{AimPivot, GroundContact, RigidBody};
use bastion_core::constants::TARGET_QUERY_CAPACITY;
use bastion_core::enums::{BehaviorState, Faction, TowerKind, TowerState};
use bastion_core::events::SimEvent;
use bastion_core::settings::{PlacementSettings, TowerSettings};
use bastion_core::types::Pose;

use super::{publish_changes, AgentContext, AttackState};
use crate::spatial;
use crate::terrain::Terrain;
use crate::world_setup::entity_id;

type Edges = &'static [(Signal, TowerState)];

/// Rotating turret: AutoPlace -> Rotate -> Shoot, Idle while nothing is in range.
fn machine_gun_edges(state: TowerState) -> Edges {
    match state {
        TowerState::AutoPlace => &[(Signal::PlacementComplete, TowerState::Rotate)],
        TowerState::Rotate => &[
            (Signal::Finished, TowerState::Shoot),
            (Signal::TargetLost, TowerState::Idle),
        ],
        TowerState::Shoot => &[(Signal::Finished, TowerState::Idle)],
        TowerState::Idle => &[(Signal::TargetFound, TowerState::Rotate)],
    }
}

/// Fixed launcher: AutoPlace -> Shoot when a target is already in range,
/// otherwise AutoPlace -> Idle <-> Shoot.
fn rocket_launcher_edges(state: TowerState) -> Edges {
    match state {
        TowerState::AutoPlace => &[
            (Signal::TargetFound, TowerState::Shoot),
            (Signal::PlacementComplete, TowerState::Idle),
        ],
        TowerState::Idle => &[(Signal::TargetFound, TowerState::Shoot)],
        TowerState::Shoot => &[(Signal::Finished, TowerState::Idle)],
        TowerState::Rotate => &[],
    }
}

// --- States ---

pub struct AutoPlaceState {
    settler: PlacementSettler,
}

impl<'w> State<AgentContext<'w>> for AutoPlaceState {
    fn fixed_tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        let contact = ctx
            .world
            .get::<&GroundContact>(ctx.entity)
            .ok()
            .and_then(|contact| contact.point);
        let terrain = ctx.terrain;
        let event = {
            let (pose, body) = ctx
                .world
                .query_one_mut::<(&mut Pose, &mut RigidBody)>(ctx.entity)
                .ok()?;
            self.settler.fixed_tick(pose, body, contact, terrain, ctx.dt)?
        };

        match event {
            PlacementEvent::Landed(hit) => {
                log::debug!("{:?} touched down at {:?}", ctx.entity, hit.point);
                None
            }
            PlacementEvent::Settled { position, rotation } => {
                if let Ok(mut pivot) = ctx.world.get::<&mut AimPivot>(ctx.entity) {
                    pivot.rotation = rotation;
                }
                log::info!("{:?} placed at {position:?}", ctx.entity);
                ctx.events.push(SimEvent::PlacementComplete {
                    entity: entity_id(ctx.entity),
                    position,
                });
                Some(Signal::PlacementComplete)
            }
        }
    }

    fn is_finished(&self) -> bool {
        self.settler.is_settled()
    }
}

/// Turn the turret onto the target. Finishes once per acquisition.
pub struct RotateState {
    aim: AimSettings,
    acquired: bool,
}

impl<'w> State<AgentContext<'w>> for RotateState {
    fn enter(&mut self, _ctx: &mut AgentContext<'w>) {
        self.acquired = false;
    }

    fn tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        let Some(target) = ctx.target_position() else {
            return Some(Signal::TargetLost);
        };
        if self.acquired {
            return None;
        }
        let frame = ctx.aim_frame()?;
        let rotation = turn_toward(
            frame.rotation,
            frame.position,
            target,
            self.aim.angle_per_second,
            ctx.dt,
        );
        ctx.set_aim_rotation(rotation);

        if is_looking_at(&Pose::new(frame.position, rotation), target, &self.aim) {
            self.acquired = true;
            Some(Signal::Finished)
        } else {
            None
        }
    }

    fn is_finished(&self) -> bool {
        self.acquired
    }
}

/// Wait for a target to enter range.
#[derive(Default)]
pub struct IdleState {
    found: bool,
}

impl<'w> State<AgentContext<'w>> for IdleState {
    fn enter(&mut self, _ctx: &mut AgentContext<'w>) {
        self.found = false;
    }

    fn tick(&mut self, ctx: &mut AgentContext<'w>) -> Option<Signal> {
        if self.found || ctx.target.is_none() {
            return None;
        }
        self.found = true;
        Some(Signal::TargetFound)
    }

    fn is_finished(&self) -> bool {
        self.found
    }
}

pub struct TowerStates {
    auto_place: AutoPlaceState,
    rotate: RotateState,
    shoot: AttackState,
    idle: IdleState,
}

impl<'w> StateTable<TowerState, AgentContext<'w>> for TowerStates {
    fn state_mut(&mut self, key: TowerState) -> &mut dyn State<AgentContext<'w>> {
        match key {
            TowerState::AutoPlace => &mut self.auto_place,
            TowerState::Rotate => &mut self.rotate,
            TowerState::Shoot => &mut self.shoot,
            TowerState::Idle => &mut self.idle,
        }
    }
}

// --- Controller ---

pub struct TowerController {
    entity: Entity,
    kind: TowerKind,
    machine: StateMachine<TowerState>,
    listeners: Listeners<TowerState>,
    states: TowerStates,
    finder: TargetFinder,
    target: Option<Entity>,
}

impl TowerController {
    pub fn new(
        entity: Entity,
        kind: TowerKind,
        profile: &TowerSettings,
        placement: &PlacementSettings,
    ) -> Self {
        let aim = AimSettings {
            angle_per_second: profile.angle_per_second,
            threshold_deg: profile.aim_threshold_deg,
            max_distance: profile.max_aim_distance.unwrap_or(f32::INFINITY),
        };
        let track_rate = match kind {
            TowerKind::MachineGun => Some(profile.angle_per_second),
            TowerKind::RocketLauncher => None,
        };
        Self {
            entity,
            kind,
            machine: StateMachine::new(),
            listeners: Listeners::new(),
            states: TowerStates {
                auto_place: AutoPlaceState {
                    settler: PlacementSettler::new(placement),
                },
                rotate: RotateState {
                    aim,
                    acquired: false,
                },
                shoot: AttackState::new(profile.fire_rate, profile.projectile, track_rate),
                idle: IdleState::default(),
            },
            finder: TargetFinder::new(profile.radius, TARGET_QUERY_CAPACITY),
            target: None,
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn kind(&self) -> TowerKind {
        self.kind
    }

    pub fn state(&self) -> Option<TowerState> {
        self.machine.current()
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    fn edges(&self) -> fn(TowerState) -> Edges {
        match self.kind {
            TowerKind::MachineGun => machine_gun_edges,
            TowerKind::RocketLauncher => rocket_launcher_edges,
        }
    }

    pub fn initialize(&mut self, world: &mut World, terrain: &Terrain, events: &mut Vec<SimEvent>) {
        let edges = self.edges();
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
        start(machine, listeners, states, &mut ctx, TowerState::AutoPlace, edges);
        publish_changes(self.entity, self.machine.take_changes(), BehaviorState::Tower, events);
    }

    pub fn fixed_tick(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>) {
        self.drive(world, terrain, dt, events, true);
    }

    pub fn tick(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>) {
        self.resolve_target(world, events);
        self.drive(world, terrain, dt, events, false);
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

    /// Drop the target once it dies or leaves range. New targets are only
    /// searched for while waiting or aiming, so Shoot runs out of target and
    /// hands back to Idle instead of switching without re-aiming.
    fn resolve_target(&mut self, world: &World, events: &mut Vec<SimEvent>) {
        let Some(origin) = spatial::position(world, self.entity) else {
            return;
        };
        if let Some(target) = self.target {
            let in_range = spatial::position(world, target)
                .is_some_and(|p| p.distance(origin) <= self.finder.radius);
            if !in_range || !spatial::is_living(world, target) {
                self.target = None;
            }
        }
        if matches!(self.machine.current(), Some(TowerState::Idle | TowerState::Rotate)) {
            search(&mut self.finder, self.entity, world, &mut self.target, events);
        }
    }

    fn drive(&mut self, world: &mut World, terrain: &Terrain, dt: f32, events: &mut Vec<SimEvent>, fixed: bool) {
        let edges = self.edges();
        let Self {
            entity,
            machine,
            listeners,
            states,
            finder,
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
        let raised = if fixed {
            machine.fixed_tick(states, &mut ctx)
        } else {
            machine.tick(states, &mut ctx)
        };
        if let Some((state, mut signal)) = raised {
            if signal == Signal::PlacementComplete {
                search(finder, ctx.entity, ctx.world, ctx.target, ctx.events);
                let shoots_on_landing = edges(state).iter().any(|&(s, _)| s == Signal::TargetFound);
                if shoots_on_landing && ctx.target.is_some() {
                    signal = Signal::TargetFound;
                }
            }
            log::debug!("{:?} {state:?} raised {signal:?}", ctx.entity);
            ctx.events.push(SimEvent::StateFinished {
                entity: entity_id(ctx.entity),
                state: BehaviorState::Tower(state),
            });
            follow_signal(machine, listeners, states, &mut ctx, (state, signal), edges);
        }
        publish_changes(self.entity, self.machine.take_changes(), BehaviorState::Tower, events);
    }
}

/// Look for the nearest living enemy when no target is held.
fn search(
    finder: &mut TargetFinder,
    entity: Entity,
    world: &World,
    target: &mut Option<Entity>,
    events: &mut Vec<SimEvent>,
) {
    let Some(origin) = spatial::position(world, entity) else {
        return;
    };
    let found = finder.acquire(origin, target, || {
        log::trace!("{entity:?} searching for enemies");
        spatial::living(world, Faction::Enemy)
    });
    if let Some(found) = found {
        events.push(SimEvent::TargetFound {
            entity: entity_id(entity),
            target: entity_id(found),
        });
    }
}
