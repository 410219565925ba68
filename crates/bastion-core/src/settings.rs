//! Tuning settings for towers, enemies, placement and the wrist menu.
//!
//! Settings load from JSON. Every section is `#[serde(default)]`, so a file
//! only needs the fields it overrides. Defaults come from `constants`.

use std::path::Path;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::enums::{Handedness, TowerKind};
use crate::error::ConfigError;

/// Complete simulation settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub sim: SimSettings,
    pub towers: TowerProfiles,
    pub enemy: EnemySettings,
    pub placement: PlacementSettings,
    pub interaction: InteractionSettings,
}

/// Scheduler settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Seconds per fixed physics step.
    pub fixed_dt: f32,
    /// Maximum fixed steps executed per frame.
    pub max_fixed_steps: u32,
    /// RNG seed for the wave spawner. Same seed = same simulation.
    pub seed: u64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            fixed_dt: FIXED_DT,
            max_fixed_steps: MAX_FIXED_STEPS_PER_FRAME,
            seed: DEFAULT_SEED,
        }
    }
}

/// Health initialization data.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HealthSettings {
    pub max_health: f32,
}

/// Projectile template.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileSettings {
    pub speed: f32,
    pub lifetime_secs: f32,
    pub damage: f32,
    pub radius: f32,
}

impl Default for ProjectileSettings {
    fn default() -> Self {
        Self {
            speed: PROJECTILE_SPEED,
            lifetime_secs: PROJECTILE_LIFETIME,
            damage: PROJECTILE_DAMAGE,
            radius: PROJECTILE_RADIUS,
        }
    }
}

/// Per-variant tower tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerSettings {
    /// Detection radius (m).
    pub radius: f32,
    /// Turret turn rate (degrees per second).
    pub angle_per_second: f32,
    /// Aim threshold for the look-at test (degrees).
    pub aim_threshold_deg: f32,
    /// Maximum distance for the look-at test. `None` = unbounded.
    pub max_aim_distance: Option<f32>,
    /// Shots per second.
    pub fire_rate: f32,
    pub health: HealthSettings,
    /// Local offset of the turret pivot from the tower origin.
    pub pivot_offset: Vec3,
    /// Muzzle offset from the pivot. `None` disables firing.
    pub muzzle_offset: Option<Vec3>,
    /// Projectile template. `None` disables firing.
    pub projectile: Option<ProjectileSettings>,
    pub collider_radius: f32,
}

impl Default for TowerSettings {
    fn default() -> Self {
        Self {
            radius: TOWER_RADIUS,
            angle_per_second: TOWER_ANGLE_PER_SECOND,
            aim_threshold_deg: TOWER_AIM_THRESHOLD_DEG,
            max_aim_distance: None,
            fire_rate: MACHINE_GUN_FIRE_RATE,
            health: HealthSettings {
                max_health: TOWER_MAX_HEALTH,
            },
            pivot_offset: Vec3::new(0.0, 1.0, 0.0),
            muzzle_offset: Some(Vec3::new(0.0, 0.0, 0.8)),
            projectile: Some(ProjectileSettings::default()),
            collider_radius: TOWER_COLLIDER_RADIUS,
        }
    }
}

/// Tuning for each tower variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TowerProfiles {
    pub machine_gun: TowerSettings,
    pub rocket_launcher: TowerSettings,
}

impl Default for TowerProfiles {
    fn default() -> Self {
        Self {
            machine_gun: TowerSettings::default(),
            rocket_launcher: TowerSettings {
                fire_rate: ROCKET_FIRE_RATE,
                projectile: Some(ProjectileSettings {
                    speed: ROCKET_SPEED,
                    damage: ROCKET_DAMAGE,
                    ..ProjectileSettings::default()
                }),
                ..TowerSettings::default()
            },
        }
    }
}

impl TowerProfiles {
    pub fn get(&self, kind: TowerKind) -> &TowerSettings {
        match kind {
            TowerKind::MachineGun => &self.machine_gun,
            TowerKind::RocketLauncher => &self.rocket_launcher,
        }
    }
}

/// Enemy tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemySettings {
    /// Search radius for towers (m).
    pub find_radius: f32,
    pub move_speed: f32,
    /// Turn rate (degrees per second).
    pub angle_per_second: f32,
    /// Stop distance from the target (m).
    pub reach_threshold: f32,
    pub fire_rate: f32,
    pub health: HealthSettings,
    pub muzzle_offset: Option<Vec3>,
    pub projectile: Option<ProjectileSettings>,
    pub collider_radius: f32,
}

impl Default for EnemySettings {
    fn default() -> Self {
        Self {
            find_radius: ENEMY_FIND_RADIUS,
            move_speed: ENEMY_MOVE_SPEED,
            angle_per_second: ENEMY_ANGLE_PER_SECOND,
            reach_threshold: ENEMY_REACH_THRESHOLD,
            fire_rate: ENEMY_FIRE_RATE,
            health: HealthSettings {
                max_health: ENEMY_MAX_HEALTH,
            },
            muzzle_offset: Some(Vec3::new(0.0, -0.5, 1.2)),
            projectile: Some(ProjectileSettings {
                speed: ENEMY_PROJECTILE_SPEED,
                ..ProjectileSettings::default()
            }),
            collider_radius: ENEMY_COLLIDER_RADIUS,
        }
    }
}

/// Auto-placement tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementSettings {
    /// Convergence rate of rotation and position while orienting (1/s).
    pub orientation_speed: f32,
    /// Speed below which the body counts as stable (m/s).
    pub stability_threshold: f32,
    /// Length of the downward ground probe from the base (m).
    pub snap_distance: f32,
    /// Remaining rotation below which placement completes (degrees).
    pub complete_angle_deg: f32,
    /// Local offset of the tower base from its origin.
    pub base_offset: Vec3,
    /// Align the tower up axis with the ground normal (otherwise world up).
    pub use_ground_normal: bool,
    /// Pull the base onto the ground contact point.
    pub snap_to_ground: bool,
    /// Damping applied once the tower touches down (1/s).
    pub landed_damping: f32,
    pub gravity: f32,
}

impl Default for PlacementSettings {
    fn default() -> Self {
        Self {
            orientation_speed: PLACEMENT_ORIENTATION_SPEED,
            stability_threshold: PLACEMENT_STABILITY_THRESHOLD,
            snap_distance: PLACEMENT_SNAP_DISTANCE,
            complete_angle_deg: PLACEMENT_COMPLETE_ANGLE_DEG,
            base_offset: Vec3::ZERO,
            use_ground_normal: true,
            snap_to_ground: true,
            landed_damping: 5.0,
            gravity: GRAVITY,
        }
    }
}

/// Wrist menu button tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionSettings {
    pub hover_distance: f32,
    pub pinch_threshold: f32,
    pub pinch_release_threshold: f32,
    /// Only a hovered button may start a pinch.
    pub require_hover_to_pinch: bool,
    /// Emit pinch-end feedback on release.
    pub use_pinch_release_interaction: bool,
    /// Spawn at the pinch midpoint instead of the button centre.
    pub spawn_at_pinch_location: bool,
    pub selected_display_secs: f32,
    /// Hand wearing the menu. The other hand presses the buttons.
    pub menu_hand: Handedness,
    /// Offset of the menu from the wrist, in wrist space.
    pub menu_offset: Vec3,
    /// Palm-to-head alignment that shows the hidden menu.
    pub palm_show_dot: f32,
    /// Palm-to-head alignment below which the visible menu hides.
    pub palm_hide_dot: f32,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self {
            hover_distance: BUTTON_HOVER_DISTANCE,
            pinch_threshold: PINCH_THRESHOLD,
            pinch_release_threshold: PINCH_RELEASE_THRESHOLD,
            require_hover_to_pinch: true,
            use_pinch_release_interaction: false,
            spawn_at_pinch_location: true,
            selected_display_secs: SELECTED_DISPLAY_SECS,
            menu_hand: Handedness::Left,
            menu_offset: Vec3::new(0.0, 0.05, 0.0),
            palm_show_dot: MENU_PALM_SHOW_DOT,
            palm_hide_dot: MENU_PALM_HIDE_DOT,
        }
    }
}

impl Settings {
    /// Read, parse and validate a settings file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse and validate settings from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("sim.fixed_dt", self.sim.fixed_dt)?;
        if self.sim.max_fixed_steps == 0 {
            return Err(ConfigError::invalid("sim.max_fixed_steps", "must be at least 1"));
        }

        for (prefix, tower) in [
            ("towers.machine_gun", &self.towers.machine_gun),
            ("towers.rocket_launcher", &self.towers.rocket_launcher),
        ] {
            validate_tower(prefix, tower)?;
        }

        let enemy = &self.enemy;
        positive("enemy.find_radius", enemy.find_radius)?;
        positive("enemy.move_speed", enemy.move_speed)?;
        positive("enemy.angle_per_second", enemy.angle_per_second)?;
        non_negative("enemy.reach_threshold", enemy.reach_threshold)?;
        positive("enemy.fire_rate", enemy.fire_rate)?;
        positive("enemy.health.max_health", enemy.health.max_health)?;
        positive("enemy.collider_radius", enemy.collider_radius)?;
        if let Some(projectile) = &enemy.projectile {
            validate_projectile("enemy.projectile", projectile)?;
        }

        let placement = &self.placement;
        positive("placement.orientation_speed", placement.orientation_speed)?;
        positive("placement.stability_threshold", placement.stability_threshold)?;
        positive("placement.snap_distance", placement.snap_distance)?;
        positive("placement.complete_angle_deg", placement.complete_angle_deg)?;
        non_negative("placement.landed_damping", placement.landed_damping)?;
        non_negative("placement.gravity", placement.gravity)?;

        let interaction = &self.interaction;
        positive("interaction.hover_distance", interaction.hover_distance)?;
        positive("interaction.pinch_threshold", interaction.pinch_threshold)?;
        if interaction.pinch_release_threshold < interaction.pinch_threshold {
            return Err(ConfigError::invalid(
                "interaction.pinch_release_threshold",
                format!(
                    "{} is below pinch_threshold {}",
                    interaction.pinch_release_threshold, interaction.pinch_threshold
                ),
            ));
        }
        non_negative(
            "interaction.selected_display_secs",
            interaction.selected_display_secs,
        )?;
        if interaction.palm_hide_dot > interaction.palm_show_dot {
            return Err(ConfigError::invalid(
                "interaction.palm_hide_dot",
                format!(
                    "{} is above palm_show_dot {}",
                    interaction.palm_hide_dot, interaction.palm_show_dot
                ),
            ));
        }
        Ok(())
    }
}

fn validate_tower(prefix: &str, tower: &TowerSettings) -> Result<(), ConfigError> {
    positive(&format!("{prefix}.radius"), tower.radius)?;
    positive(&format!("{prefix}.angle_per_second"), tower.angle_per_second)?;
    positive(&format!("{prefix}.aim_threshold_deg"), tower.aim_threshold_deg)?;
    positive(&format!("{prefix}.fire_rate"), tower.fire_rate)?;
    positive(&format!("{prefix}.health.max_health"), tower.health.max_health)?;
    positive(&format!("{prefix}.collider_radius"), tower.collider_radius)?;
    if let Some(max) = tower.max_aim_distance {
        positive(&format!("{prefix}.max_aim_distance"), max)?;
    }
    if let Some(projectile) = &tower.projectile {
        validate_projectile(&format!("{prefix}.projectile"), projectile)?;
    }
    Ok(())
}

fn validate_projectile(prefix: &str, projectile: &ProjectileSettings) -> Result<(), ConfigError> {
    positive(&format!("{prefix}.speed"), projectile.speed)?;
    positive(&format!("{prefix}.lifetime_secs"), projectile.lifetime_secs)?;
    non_negative(&format!("{prefix}.damage"), projectile.damage)?;
    non_negative(&format!("{prefix}.radius"), projectile.radius)
}

fn positive(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("{value} must be positive")))
    }
}

fn non_negative(field: &str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} must not be negative"),
        ))
    }
}
