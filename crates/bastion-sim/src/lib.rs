//! Simulation engine for Bastion.
//!
//! Owns the hecs ECS world, drives tower and enemy controllers with a
//! fixed-step physics phase and a variable-step frame phase, and produces
//! WorldSnapshots for collaborators.

pub mod commands;
pub mod controller;
pub mod engine;
pub mod scenario;
pub mod spatial;
pub mod systems;
pub mod terrain;
pub mod world_setup;

pub use bastion_core as core;
pub use engine::{SimConfig, SimulationEngine};
