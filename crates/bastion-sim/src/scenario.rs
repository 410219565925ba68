//! Built-in scenarios: a tower layout and a wave schedule.

use std::f32::consts::PI;

use glam::{Quat, Vec3};

use bastion_core::commands::Command;
use bastion_core::enums::{EnemyKind, TowerKind};

use crate::systems::wave_spawner::{WaveEntry, WaveSchedule};

/// Height towers are dropped from.
const DROP_HEIGHT: f32 = 1.5;

/// Skirmish: three waves of heavy bombers, the last two from fixed axes.
pub fn skirmish_waves() -> WaveSchedule {
    let north = 0.0;
    let east = PI / 2.0;

    WaveSchedule {
        waves: vec![
            // t=0: 2 from random bearings
            WaveEntry::new(0.0, vec![(EnemyKind::HeavyBomber, 2)]),
            // t=20s: 3 from the north
            WaveEntry::with_bearing(20.0, vec![(EnemyKind::HeavyBomber, 3)], north),
            // t=40s: 4 from the east
            WaveEntry::with_bearing(40.0, vec![(EnemyKind::HeavyBomber, 4)], east),
        ],
        ..WaveSchedule::default()
    }
}

/// Commands placing one tower of each kind either side of the origin.
pub fn default_towers() -> Vec<Command> {
    vec![
        Command::SpawnTower {
            kind: TowerKind::MachineGun,
            position: Vec3::new(-4.0, DROP_HEIGHT, 0.0),
            rotation: Quat::IDENTITY,
        },
        Command::SpawnTower {
            kind: TowerKind::RocketLauncher,
            position: Vec3::new(4.0, DROP_HEIGHT, 0.0),
            rotation: Quat::IDENTITY,
        },
    ]
}
