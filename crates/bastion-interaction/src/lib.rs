//! Hand interaction for Bastion: the wrist menu that drops towers.
//!
//! Buttons compete for hover and pinch through an `InteractionArbiter` owned
//! by the menu. A selected button emits a `Command::SpawnTower` for the
//! simulation and `InteractionEvent`s for audio and visual feedback.

pub mod arbiter;
pub mod button;
pub mod hand;
pub mod menu;

pub use arbiter::{CandidateId, Claim, InteractionArbiter};
pub use menu::WristMenu;
