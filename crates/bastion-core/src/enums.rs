//! Enumeration types used throughout the simulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Side an entity fights for. Projectiles never hit their own faction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Tower,
    Enemy,
}

impl Faction {
    /// The faction this one attacks.
    pub fn opponent(self) -> Self {
        match self {
            Faction::Tower => Faction::Enemy,
            Faction::Enemy => Faction::Tower,
        }
    }
}

/// What a projectile was fired at, resolved once from the target's tag at spawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetKind {
    Tower,
    Enemy,
    #[default]
    Unknown,
}

impl TargetKind {
    pub fn from_faction(faction: Option<Faction>) -> Self {
        match faction {
            Some(Faction::Tower) => TargetKind::Tower,
            Some(Faction::Enemy) => TargetKind::Enemy,
            None => TargetKind::Unknown,
        }
    }
}

/// Tower variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerKind {
    /// Rotating turret: must line up on a target before shooting.
    #[default]
    MachineGun,
    /// Fixed launcher: shoots as soon as a target is in range.
    RocketLauncher,
}

/// Enemy variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    HeavyBomber,
}

/// Broad entity classification for snapshots and events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EntityKind {
    Tower { kind: TowerKind },
    Enemy { kind: EnemyKind },
    Projectile,
}

/// Behavior states of a tower.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TowerState {
    AutoPlace,
    Rotate,
    Shoot,
    Idle,
}

/// Behavior states of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    FindTarget,
    FlyTowardTarget,
    Attack,
}

/// Active behavior state of any controller, as reported to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "state")]
pub enum BehaviorState {
    Tower(TowerState),
    Enemy(EnemyState),
}

impl fmt::Display for BehaviorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BehaviorState::Tower(s) => write!(f, "Tower::{s:?}"),
            BehaviorState::Enemy(s) => write!(f, "Enemy::{s:?}"),
        }
    }
}

/// Sub-phase of the auto-placement sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlacementPhase {
    #[default]
    Falling,
    Orienting,
    Settled,
}

/// Visual state of a menu button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ButtonState {
    #[default]
    Normal,
    Hovered,
    Pinching,
    Selected,
}

/// Which hand a control listens to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    #[default]
    Left,
    Right,
}
