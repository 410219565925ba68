//! Wave spawning: releases enemy waves at scheduled times.

use glam::Vec3;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use bastion_core::constants::{WAVE_SPAWN_ALTITUDE, WAVE_SPAWN_RING_RADIUS};
use bastion_core::enums::EnemyKind;

/// A single wave definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveEntry {
    /// Simulation time at which this wave spawns.
    pub spawn_at_secs: f64,
    /// Enemies to spawn: (kind, count).
    pub enemies: Vec<(EnemyKind, u32)>,
    /// Fixed approach bearing (radians from +Z toward +X). Random when `None`.
    #[serde(default)]
    pub bearing: Option<f32>,
    #[serde(skip)]
    pub spawned: bool,
}

impl WaveEntry {
    pub fn new(spawn_at_secs: f64, enemies: Vec<(EnemyKind, u32)>) -> Self {
        Self {
            spawn_at_secs,
            enemies,
            bearing: None,
            spawned: false,
        }
    }

    pub fn with_bearing(spawn_at_secs: f64, enemies: Vec<(EnemyKind, u32)>, bearing: f32) -> Self {
        Self {
            bearing: Some(bearing),
            ..Self::new(spawn_at_secs, enemies)
        }
    }
}

/// Wave schedule around a defended point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaveSchedule {
    pub center: Vec3,
    pub ring_radius: f32,
    pub altitude: f32,
    pub waves: Vec<WaveEntry>,
}

impl Default for WaveSchedule {
    fn default() -> Self {
        Self {
            center: Vec3::ZERO,
            ring_radius: WAVE_SPAWN_RING_RADIUS,
            altitude: WAVE_SPAWN_ALTITUDE,
            waves: Vec::new(),
        }
    }
}

impl WaveSchedule {
    /// Total number of enemies across all waves.
    pub fn total_enemies(&self) -> u32 {
        self.waves
            .iter()
            .flat_map(|w| w.enemies.iter())
            .map(|(_, count)| count)
            .sum()
    }

    pub fn is_exhausted(&self) -> bool {
        self.waves.iter().all(|w| w.spawned)
    }
}

/// Check the schedule and return the enemies of every wave that is due.
/// Each enemy gets a position on the spawn ring.
pub fn run(rng: &mut ChaCha8Rng, schedule: &mut WaveSchedule, elapsed_secs: f64) -> Vec<(EnemyKind, Vec3)> {
    let mut due = Vec::new();
    for wave in &mut schedule.waves {
        if wave.spawned || elapsed_secs < wave.spawn_at_secs {
            continue;
        }
        for &(kind, count) in &wave.enemies {
            for _ in 0..count {
                let bearing = wave
                    .bearing
                    .unwrap_or_else(|| rng.gen_range(0.0..std::f32::consts::TAU));
                let offset = Vec3::new(bearing.sin(), 0.0, bearing.cos()) * schedule.ring_radius;
                due.push((kind, schedule.center + offset + Vec3::Y * schedule.altitude));
            }
        }
        wave.spawned = true;
        log::info!(
            "wave at {:.1}s released ({} enemies)",
            wave.spawn_at_secs,
            wave.enemies.iter().map(|(_, n)| n).sum::<u32>()
        );
    }
    due
}
