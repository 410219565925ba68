//! Simulation engine: the frame driver.
//!
//! `SimulationEngine` owns the hecs ECS world and the entity controllers,
//! processes queued commands, runs the fixed-step phase then the
//! variable-step phase each frame, and produces `WorldSnapshot`s.
//! Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::Vec3;
use hecs::{Entity, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use bastion_core::commands::Command;
use bastion_core::enums::{BehaviorState, EnemyKind, EntityKind, TowerKind};
use bastion_core::error::CommandError;
use bastion_core::events::SimEvent;
use bastion_core::settings::Settings;
use bastion_core::state::WorldSnapshot;
use bastion_core::types::{Pose, SimTime};

use crate::commands::CommandHistory;
use crate::controller::{Controller, EnemyController, TowerController};
use crate::systems;
use crate::systems::wave_spawner::WaveSchedule;
use crate::terrain::Terrain;
use crate::world_setup::{self, entity_id};

/// Everything needed to start a run: tuning, ground and enemy waves.
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub settings: Settings,
    pub terrain: Terrain,
    pub waves: WaveSchedule,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            settings: Settings::default(),
            terrain: Terrain::flat(),
            waves: WaveSchedule::default(),
        }
    }
}

/// Frame driver for one run. Holds the world, controllers and command queue.
pub struct SimulationEngine {
    world: World,
    time: SimTime,
    settings: Settings,
    terrain: Terrain,
    rng: ChaCha8Rng,
    accumulator: f32,
    command_queue: VecDeque<Command>,
    history: CommandHistory,
    command_errors: Vec<CommandError>,
    /// Registered controllers in spawn order.
    controllers: Vec<Controller>,
    despawn_buffer: Vec<Entity>,
    events: Vec<SimEvent>,
    wave_schedule: WaveSchedule,
}

impl SimulationEngine {
    pub fn new(config: SimConfig) -> Self {
        let seed = config.settings.sim.seed;
        Self {
            world: World::new(),
            time: SimTime::default(),
            settings: config.settings,
            terrain: config.terrain,
            rng: ChaCha8Rng::seed_from_u64(seed),
            accumulator: 0.0,
            command_queue: VecDeque::new(),
            history: CommandHistory::default(),
            command_errors: Vec::new(),
            controllers: Vec::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            wave_schedule: config.waves,
        }
    }

    /// Queue a command for processing at the next frame boundary.
    pub fn queue_command(&mut self, command: Command) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = Command>) {
        self.command_queue.extend(commands);
    }

    /// Advance one rendered frame of `frame_dt` seconds. Returns the number
    /// of fixed steps executed.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.process_commands();

        let fixed_dt = self.settings.sim.fixed_dt;
        let max_steps = self.settings.sim.max_fixed_steps;
        self.accumulator += frame_dt.max(0.0);
        let mut steps = 0;
        while self.accumulator >= fixed_dt && steps < max_steps {
            self.run_fixed_step(fixed_dt);
            self.accumulator -= fixed_dt;
            steps += 1;
        }
        if self.accumulator >= fixed_dt {
            log::debug!(
                "frame of {frame_dt:.3}s exceeded {max_steps} fixed steps, dropping {:.3}s",
                self.accumulator
            );
            self.accumulator = 0.0;
        }

        self.run_frame(frame_dt.max(0.0));
        steps
    }

    /// Build a snapshot of the current visible state.
    pub fn snapshot(&self) -> WorldSnapshot {
        systems::snapshot::build_snapshot(&self.world, &self.time, &self.controllers)
    }

    /// Take every event emitted since the last call.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Take the errors of commands that failed since the last call.
    pub fn take_command_errors(&mut self) -> Vec<CommandError> {
        std::mem::take(&mut self.command_errors)
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    /// Read-only access for inspection and tests.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn wave_schedule(&self) -> &WaveSchedule {
        &self.wave_schedule
    }

    /// Active behavior state of `entity`, if it has a controller.
    pub fn state_of(&self, entity: Entity) -> Option<BehaviorState> {
        self.controller(entity).and_then(Controller::state)
    }

    /// Current target of `entity`, if any.
    pub fn target_of(&self, entity: Entity) -> Option<Entity> {
        self.controller(entity).and_then(Controller::target)
    }

    pub fn pose_of(&self, entity: Entity) -> Option<Pose> {
        self.world.get::<&Pose>(entity).ok().map(|pose| *pose)
    }

    /// Move an entity directly, bypassing physics and behavior.
    /// Returns `false` if the entity does not exist.
    pub fn set_pose(&mut self, entity: Entity, pose: Pose) -> bool {
        match self.world.get::<&mut Pose>(entity) {
            Ok(mut current) => {
                *current = pose;
                true
            }
            Err(_) => false,
        }
    }

    /// Spawn a tower and register its controller. It falls and auto-places.
    pub fn spawn_tower(&mut self, kind: TowerKind, pose: Pose) -> Entity {
        let profile = self.settings.towers.get(kind).clone();
        let entity = world_setup::spawn_tower(&mut self.world, kind, pose, &profile);
        let controller = TowerController::new(entity, kind, &profile, &self.settings.placement);
        self.register(Controller::Tower(controller), EntityKind::Tower { kind });
        log::info!("spawned {kind:?} tower {entity:?} at {:?}", pose.position);
        entity
    }

    /// Spawn an enemy and register its controller.
    pub fn spawn_enemy(&mut self, kind: EnemyKind, position: Vec3) -> Entity {
        let entity = world_setup::spawn_enemy(&mut self.world, kind, position, &self.settings.enemy);
        let controller = EnemyController::new(entity, kind, &self.settings.enemy);
        self.register(Controller::Enemy(controller), EntityKind::Enemy { kind });
        log::info!("spawned {kind:?} enemy {entity:?} at {position:?}");
        entity
    }

    /// Despawn an entity and release its controller. Other controllers
    /// targeting it drop the reference.
    pub fn remove_entity(&mut self, entity: Entity) {
        let _ = self.world.despawn(entity);
        self.release_controllers(&[entity]);
    }

    fn register(&mut self, mut controller: Controller, kind: EntityKind) {
        controller.initialize(&mut self.world, &self.terrain, &mut self.events);
        self.events.push(SimEvent::Spawned {
            entity: entity_id(controller.entity()),
            kind,
        });
        self.controllers.push(controller);
    }

    fn controller(&self, entity: Entity) -> Option<&Controller> {
        self.controllers.iter().find(|c| c.entity() == entity)
    }

    fn release_controllers(&mut self, removed: &[Entity]) {
        if removed.is_empty() {
            return;
        }
        let mut kept = Vec::with_capacity(self.controllers.len());
        for mut controller in std::mem::take(&mut self.controllers) {
            if removed.contains(&controller.entity()) {
                controller.deinitialize(&mut self.world, &self.terrain, &mut self.events);
            } else {
                for &entity in removed {
                    controller.forget(entity);
                }
                kept.push(controller);
            }
        }
        self.controllers = kept;
    }

    /// Drain the command queue, logging and storing failures.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            if let Err(err) = self.handle_command(command) {
                log::warn!("command failed: {err}");
                self.command_errors.push(err);
            }
        }
    }

    /// Handle a single command.
    fn handle_command(&mut self, command: Command) -> Result<(), CommandError> {
        match command {
            Command::SpawnTower {
                kind,
                position,
                rotation,
            } => {
                let entity = self.spawn_tower(kind, Pose::new(position, rotation));
                self.history.record(entity);
            }
            Command::SpawnEnemy { kind, position } => {
                let entity = self.spawn_enemy(kind, position);
                self.history.record(entity);
            }
            Command::Undo => {
                let entity = self.history.undo(&self.world)?;
                log::info!("undo: removing {entity:?}");
                self.remove_entity(entity);
            }
        }
        Ok(())
    }

    /// Physics-rate phase for all entities.
    fn run_fixed_step(&mut self, dt: f32) {
        // 1. Rigid body integration and ground contact
        systems::movement::run(
            &mut self.world,
            &self.terrain,
            self.settings.placement.gravity,
            self.settings.placement.base_offset,
            dt,
        );
        // 2. Controller fixed ticks (auto-placement)
        for controller in &mut self.controllers {
            controller.fixed_tick(&mut self.world, &self.terrain, dt, &mut self.events);
        }
        // 3. Projectile flight, collision and damage
        systems::projectiles::run(&mut self.world, dt, &mut self.events, &mut self.despawn_buffer);

        self.time.advance_fixed();
    }

    /// Frame-rate phase: spawning, behavior and cleanup.
    fn run_frame(&mut self, dt: f32) {
        // 1. Wave spawning
        let due = systems::wave_spawner::run(
            &mut self.rng,
            &mut self.wave_schedule,
            self.time.elapsed_secs,
        );
        for (kind, position) in due {
            self.spawn_enemy(kind, position);
        }
        // 2. Controller ticks (target acquisition, aiming, firing)
        for controller in &mut self.controllers {
            controller.tick(&mut self.world, &self.terrain, dt, &mut self.events);
        }
        // 3. Cleanup (dead towers and enemies)
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
        let removed = std::mem::take(&mut self.despawn_buffer);
        self.release_controllers(&removed);
        self.despawn_buffer = removed;

        self.time.advance_frame(dt);
    }
}
