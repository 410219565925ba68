//! Entity behavior for Bastion.
//!
//! Implements the generic state machine, health, target acquisition, aiming,
//! fire control and auto-placement. No ECS dependency: everything works on plain data
//! and small collaborator traits.

pub mod aim;
pub mod combat;
pub mod health;
pub mod placement;
pub mod state_machine;
pub mod targeting;

pub use bastion_core as core;

#[cfg(test)]
mod tests;
