//! Simulation constants and tuning defaults.
//!
//! Every value here is the default for the matching `Settings` field.

/// Fixed physics step rate (Hz).
pub const FIXED_TICK_RATE: u32 = 50;

/// Seconds per fixed physics step.
pub const FIXED_DT: f32 = 1.0 / FIXED_TICK_RATE as f32;

/// Upper bound on fixed steps run for a single frame (avoids a catch-up spiral).
pub const MAX_FIXED_STEPS_PER_FRAME: u32 = 8;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Targeting ---

/// Result capacity of a proximity query.
pub const TARGET_QUERY_CAPACITY: usize = 5;

/// Default tower detection radius (m).
pub const TOWER_RADIUS: f32 = 20.0;

/// Default turret turn rate (degrees per second).
pub const TOWER_ANGLE_PER_SECOND: f32 = 200.0;

/// Angle within which a turret counts as looking at its target (degrees).
pub const TOWER_AIM_THRESHOLD_DEG: f32 = 1.0;

/// Maximum distance for the look-at test. Unbounded for towers.
pub const TOWER_MAX_AIM_DISTANCE: f32 = f32::INFINITY;

// --- Combat ---

/// Machine gun shots per second.
pub const MACHINE_GUN_FIRE_RATE: f32 = 5.0;

/// Rocket launcher shots per second.
pub const ROCKET_FIRE_RATE: f32 = 0.5;

/// Tower maximum health.
pub const TOWER_MAX_HEALTH: f32 = 100.0;

/// Default projectile speed (m/s).
pub const PROJECTILE_SPEED: f32 = 50.0;

/// Default projectile lifetime (s).
pub const PROJECTILE_LIFETIME: f32 = 3.0;

/// Default damage per projectile hit.
pub const PROJECTILE_DAMAGE: f32 = 5.0;

/// Default projectile collision radius (m).
pub const PROJECTILE_RADIUS: f32 = 0.1;

/// Rocket damage per hit.
pub const ROCKET_DAMAGE: f32 = 25.0;

/// Rocket speed (m/s).
pub const ROCKET_SPEED: f32 = 20.0;

/// Collision radius of towers (m).
pub const TOWER_COLLIDER_RADIUS: f32 = 0.6;

/// Collision radius of enemies (m).
pub const ENEMY_COLLIDER_RADIUS: f32 = 1.0;

// --- Enemy ---

/// Enemy search radius for towers (m).
pub const ENEMY_FIND_RADIUS: f32 = 80.0;

/// Enemy flight speed (m/s).
pub const ENEMY_MOVE_SPEED: f32 = 3.0;

/// Enemy turn rate (degrees per second).
pub const ENEMY_ANGLE_PER_SECOND: f32 = 90.0;

/// Distance from the target at which an enemy stops and attacks (m).
pub const ENEMY_REACH_THRESHOLD: f32 = 8.0;

/// Enemy shots per second.
pub const ENEMY_FIRE_RATE: f32 = 2.0;

/// Enemy projectile speed (m/s).
pub const ENEMY_PROJECTILE_SPEED: f32 = 10.0;

/// Enemy maximum health.
pub const ENEMY_MAX_HEALTH: f32 = 20.0;

// --- Placement ---

/// Rotation/position convergence rate while settling (1/s).
pub const PLACEMENT_ORIENTATION_SPEED: f32 = 5.0;

/// Speed below which a falling body counts as stable (m/s).
pub const PLACEMENT_STABILITY_THRESHOLD: f32 = 0.1;

/// Length of the downward ground probe from the tower base (m).
pub const PLACEMENT_SNAP_DISTANCE: f32 = 0.5;

/// Remaining rotation below which placement completes (degrees).
pub const PLACEMENT_COMPLETE_ANGLE_DEG: f32 = 1.0;

/// Height above a collision contact where the confirming probe starts (m).
pub const PLACEMENT_CONTACT_PROBE_LIFT: f32 = 0.1;

/// Length of the confirming probe cast from above a collision contact (m).
pub const PLACEMENT_CONTACT_PROBE_DISTANCE: f32 = 1.0;

/// Gravity acceleration (m/s²).
pub const GRAVITY: f32 = 9.81;

// --- Interaction ---

/// Fingertip distance at which a button counts as hovered (m).
pub const BUTTON_HOVER_DISTANCE: f32 = 0.05;

/// Thumb–index distance that starts a pinch (m).
pub const PINCH_THRESHOLD: f32 = 0.03;

/// Thumb–index distance that ends a pinch (m).
pub const PINCH_RELEASE_THRESHOLD: f32 = 0.05;

/// How long a button shows the Selected state after a pinch select (s).
pub const SELECTED_DISPLAY_SECS: f32 = 0.2;

/// Palm/head dot product at which the wrist menu appears.
pub const MENU_PALM_SHOW_DOT: f32 = 0.2;

/// Palm/head dot product below which the wrist menu hides again.
pub const MENU_PALM_HIDE_DOT: f32 = 0.0;

// --- Waves ---

/// Radius of the ring on which wave enemies spawn (m).
pub const WAVE_SPAWN_RING_RADIUS: f32 = 60.0;

/// Altitude at which wave enemies spawn (m).
pub const WAVE_SPAWN_ALTITUDE: f32 = 12.0;
