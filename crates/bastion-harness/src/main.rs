//! Headless Bastion runner.
//!
//! Builds the skirmish scenario (one tower of each kind and three enemy
//! waves), runs it at 90 Hz and logs a summary of what happened.

mod logging;
mod menu_demo;

use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use bastion_core::enums::EntityKind;
use bastion_core::events::SimEvent;
use bastion_core::settings::Settings;
use bastion_core::state::WorldSnapshot;
use bastion_core::types::EntityId;
use bastion_interaction::WristMenu;
use bastion_sim::scenario::{default_towers, skirmish_waves};
use bastion_sim::{SimConfig, SimulationEngine};

/// Rendered frame length: 90 Hz.
const FRAME_DT: f32 = 1.0 / 90.0;

/// Run a headless tower-defense skirmish
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Settings JSON file. Missing fields keep their defaults.
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of frames to run
    #[arg(short, long, default_value_t = 5400)]
    frames: u32,

    /// RNG seed, overriding the settings file
    #[arg(long)]
    seed: Option<u64>,

    /// Drop an extra tower through a scripted wrist menu gesture
    #[arg(long)]
    menu_demo: bool,

    /// Print the final snapshot as JSON on stdout
    #[arg(long)]
    snapshot: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Default)]
struct Summary {
    kinds: HashMap<EntityId, EntityKind>,
    towers_spawned: u32,
    enemies_spawned: u32,
    towers_lost: u32,
    enemies_killed: u32,
    placements: u32,
    shots: u32,
    hits: u32,
}

impl Summary {
    fn record(&mut self, events: &[SimEvent]) {
        for event in events {
            match event {
                SimEvent::Spawned { entity, kind } => {
                    self.kinds.insert(*entity, *kind);
                    match kind {
                        EntityKind::Tower { .. } => self.towers_spawned += 1,
                        EntityKind::Enemy { .. } => self.enemies_spawned += 1,
                        EntityKind::Projectile => {}
                    }
                }
                SimEvent::Death { entity, .. } => match self.kinds.get(entity) {
                    Some(EntityKind::Tower { .. }) => self.towers_lost += 1,
                    Some(EntityKind::Enemy { .. }) => self.enemies_killed += 1,
                    _ => {}
                },
                SimEvent::PlacementComplete { .. } => self.placements += 1,
                SimEvent::ProjectileFired { .. } => self.shots += 1,
                SimEvent::ProjectileImpact { .. } => self.hits += 1,
                _ => {}
            }
        }
    }

    fn log(&self, snapshot: &WorldSnapshot) {
        log::info!(
            "after {:.1}s ({} frames, {} fixed steps):",
            snapshot.time.elapsed_secs,
            snapshot.time.frames,
            snapshot.time.fixed_steps
        );
        log::info!(
            "  towers: {} spawned, {} placed, {} lost, {} standing",
            self.towers_spawned,
            self.placements,
            self.towers_lost,
            snapshot.towers().count()
        );
        log::info!(
            "  enemies: {} spawned, {} killed, {} alive",
            self.enemies_spawned,
            self.enemies_killed,
            snapshot.enemies().count()
        );
        log::info!(
            "  projectiles: {} fired, {} hits, {} in flight",
            self.shots,
            self.hits,
            snapshot.projectiles
        );
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to load settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = args.seed {
        settings.sim.seed = seed;
    }
    log::info!("running {} frames with seed {}", args.frames, settings.sim.seed);

    let interaction = settings.interaction.clone();
    let mut engine = SimulationEngine::new(SimConfig {
        settings,
        waves: skirmish_waves(),
        ..SimConfig::default()
    });
    engine.queue_commands(default_towers());
    let mut menu = args
        .menu_demo
        .then(|| WristMenu::with_tower_buttons(&interaction));

    let mut summary = Summary::default();
    for frame in 0..args.frames {
        if let Some(menu) = menu.as_mut() {
            let hands = menu_demo::hands(frame, menu, interaction.menu_hand);
            engine.queue_commands(menu.update(&hands, FRAME_DT));
            for event in menu.drain_events() {
                log::debug!("menu: {event:?}");
            }
        }
        engine.advance(FRAME_DT);
        summary.record(&engine.drain_events());
    }

    let snapshot = engine.snapshot();
    summary.log(&snapshot);
    if args.snapshot {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    }
    Ok(())
}
