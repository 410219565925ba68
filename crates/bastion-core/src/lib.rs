//! Core types and definitions for the Bastion tower-defense simulation.
//!
//! This crate defines the vocabulary shared across all other crates:
//! geometry, components, commands, events, settings, snapshots and constants.
//! It has no dependency on the ECS or any runtime framework.

pub mod commands;
pub mod components;
pub mod constants;
pub mod enums;
pub mod error;
pub mod events;
pub mod settings;
pub mod state;
pub mod types;
