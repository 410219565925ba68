//! End-to-end runs of the simulation through the public engine API.

use glam::Vec3;

use bastion_sim::core::enums::{BehaviorState, EnemyKind, TowerKind, TowerState};
use bastion_sim::core::events::SimEvent;
use bastion_sim::core::settings::Settings;
use bastion_sim::core::types::Pose;
use bastion_sim::scenario::{default_towers, skirmish_waves};
use bastion_sim::world_setup::entity_id;
use bastion_sim::{SimConfig, SimulationEngine};

const FRAME_DT: f32 = 1.0 / 90.0;

fn run(engine: &mut SimulationEngine, frames: usize) -> Vec<SimEvent> {
    let mut events = Vec::new();
    for _ in 0..frames {
        engine.advance(FRAME_DT);
        events.extend(engine.drain_events());
    }
    events
}

#[test]
fn machine_gun_engages_enemy_that_enters_range() {
    let mut settings = Settings::default();
    settings.enemy.find_radius = 1.0;
    let mut engine = SimulationEngine::new(SimConfig {
        settings,
        ..SimConfig::default()
    });
    let tower = engine.spawn_tower(TowerKind::MachineGun, Pose::at(Vec3::new(0.0, 0.5, 0.0)));
    let enemy = engine.spawn_enemy(EnemyKind::HeavyBomber, Vec3::new(30.0, 1.0, 0.0));

    run(&mut engine, 90);
    assert_eq!(
        engine.state_of(tower),
        Some(BehaviorState::Tower(TowerState::Idle))
    );
    assert_eq!(engine.target_of(tower), None);

    assert!(engine.set_pose(enemy, Pose::at(Vec3::new(15.0, 1.0, 0.0))));
    let events = run(&mut engine, 300);

    let tower_id = entity_id(tower);
    let changes: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SimEvent::StateChanged { entity, state } if *entity == tower_id => Some(*state),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            BehaviorState::Tower(TowerState::Rotate),
            BehaviorState::Tower(TowerState::Shoot),
            BehaviorState::Tower(TowerState::Idle),
        ]
    );
    assert!(events.iter().any(|event| matches!(
        event,
        SimEvent::Death { entity, .. } if *entity == entity_id(enemy)
    )));
    assert!(events.iter().any(|event| matches!(
        event,
        SimEvent::TargetFound { entity, .. } if *entity == tower_id
    )));
    assert!(!engine.world().contains(enemy));
}

fn skirmish_snapshot(seed: u64, frames: usize) -> String {
    let mut settings = Settings::default();
    settings.sim.seed = seed;
    let mut engine = SimulationEngine::new(SimConfig {
        settings,
        waves: skirmish_waves(),
        ..SimConfig::default()
    });
    engine.queue_commands(default_towers());
    run(&mut engine, frames);
    serde_json::to_string(&engine.snapshot()).unwrap()
}

#[test]
fn same_seed_gives_identical_runs() {
    let a = skirmish_snapshot(42, 900);
    let b = skirmish_snapshot(42, 900);
    assert_eq!(a, b);
}

#[test]
fn different_seeds_diverge() {
    let a = skirmish_snapshot(1, 300);
    let b = skirmish_snapshot(2, 300);
    assert_ne!(a, b);
}

#[test]
fn skirmish_spawns_first_wave_immediately() {
    let mut engine = SimulationEngine::new(SimConfig {
        waves: skirmish_waves(),
        ..SimConfig::default()
    });
    engine.queue_commands(default_towers());
    run(&mut engine, 1);

    let snapshot = engine.snapshot();
    assert_eq!(snapshot.towers().count(), 2);
    assert_eq!(snapshot.enemies().count(), 2);
    assert!(!engine.wave_schedule().is_exhausted());
}
