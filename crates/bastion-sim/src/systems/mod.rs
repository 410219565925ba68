//! World-level passes run by the engine each fixed step or frame.
//!
//! Each system is a free `run` function over the hecs `World`. Per-entity
//! behavior lives in the controllers, not here.

pub mod cleanup;
pub mod movement;
pub mod projectiles;
pub mod snapshot;
pub mod wave_spawner;
