//! Spawn history backing `Command::Undo`.

use hecs::{Entity, World};

use bastion_core::error::CommandError;

/// Entities created by spawn commands, most recent last.
#[derive(Debug, Default)]
pub struct CommandHistory {
    spawned: Vec<Entity>,
}

impl CommandHistory {
    pub fn record(&mut self, entity: Entity) {
        self.spawned.push(entity);
    }

    /// Pop the most recent spawn. Fails when the history is empty or the
    /// entity has already been removed (for example, killed in combat).
    pub fn undo(&mut self, world: &World) -> Result<Entity, CommandError> {
        let entity = self.spawned.pop().ok_or(CommandError::EmptyHistory)?;
        if world.contains(entity) {
            Ok(entity)
        } else {
            Err(CommandError::UnknownEntity(entity.to_bits().get()))
        }
    }

    pub fn len(&self) -> usize {
        self.spawned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spawned.is_empty()
    }
}
