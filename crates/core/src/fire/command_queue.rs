//! Deferred grid mutations.
//!
//! Fire cells must not add or remove fire cells while the engine is walking
//! them. Expiry and spread are therefore recorded here during a tick and
//! applied at the start of the next one, before any cell runs.
//!
//! Applied commands are also kept in a bounded history, which is enough to
//! replay a seeded run and see where each fire came from.

use crate::core_types::position::BlockPos;

/// Mutation scheduled for the next tick boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FireCommand {
    /// Try to start a fire in the air voxel at this position
    Ignite(BlockPos),
    /// Turn the fire at this position back into air
    Extinguish(BlockPos),
}

impl FireCommand {
    pub fn position(&self) -> BlockPos {
        match *self {
            FireCommand::Ignite(pos) | FireCommand::Extinguish(pos) => pos,
        }
    }
}

/// Command queue drained once per tick
#[derive(Debug)]
pub struct CommandQueue {
    /// Commands waiting for the next tick boundary
    pending: Vec<FireCommand>,
    /// Commands applied at the start of the current tick
    applied_this_tick: Vec<FireCommand>,
    /// Every applied command, oldest first
    history: Vec<FireCommand>,
    /// Maximum history size (oldest commands are removed)
    max_history: usize,
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new(10000)
    }
}

impl CommandQueue {
    /// Create a new queue with the given history limit
    pub fn new(max_history: usize) -> Self {
        Self {
            pending: Vec::with_capacity(32),
            applied_this_tick: Vec::with_capacity(32),
            history: Vec::with_capacity(max_history.min(1024)),
            max_history,
        }
    }

    /// Schedule a command for the next tick boundary
    pub fn submit(&mut self, command: FireCommand) {
        self.pending.push(command);
    }

    pub fn pending(&self) -> &[FireCommand] {
        &self.pending
    }

    pub fn applied_this_tick(&self) -> &[FireCommand] {
        &self.applied_this_tick
    }

    pub fn history(&self) -> &[FireCommand] {
        &self.history
    }

    /// Clear the per-tick record at the start of each tick
    pub fn begin_tick(&mut self) {
        self.applied_this_tick.clear();
    }

    /// Record a command that changed the grid
    pub fn mark_applied(&mut self, command: FireCommand) {
        self.applied_this_tick.push(command);
        self.history.push(command);

        if self.history.len() > self.max_history {
            let excess = self.history.len() - self.max_history;
            self.history.drain(..excess);
        }
    }

    /// Take all pending commands for processing
    pub fn take_pending(&mut self) -> Vec<FireCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Whether an extinguish is already waiting for `pos`
    pub fn is_extinguish_pending(&self, pos: BlockPos) -> bool {
        self.pending.contains(&FireCommand::Extinguish(pos))
    }

    /// Clear all state
    pub fn clear(&mut self) {
        self.pending.clear();
        self.applied_this_tick.clear();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_and_take() {
        let mut queue = CommandQueue::new(100);
        queue.submit(FireCommand::Ignite(BlockPos::new(1, 2, 3)));
        queue.submit(FireCommand::Extinguish(BlockPos::new(4, 5, 6)));
        assert_eq!(queue.pending().len(), 2);
        assert!(queue.is_extinguish_pending(BlockPos::new(4, 5, 6)));
        assert!(!queue.is_extinguish_pending(BlockPos::new(1, 2, 3)));

        let pending = queue.take_pending();
        assert_eq!(pending.len(), 2);
        assert_eq!(pending[0].position(), BlockPos::new(1, 2, 3));
        assert!(queue.pending().is_empty());
    }

    #[test]
    fn test_history_trimming() {
        let mut queue = CommandQueue::new(5);

        for i in 0..7 {
            queue.mark_applied(FireCommand::Ignite(BlockPos::new(i, 0, 0)));
        }

        assert_eq!(queue.history().len(), 5);
        // Oldest commands are removed
        assert_eq!(queue.history()[0], FireCommand::Ignite(BlockPos::new(2, 0, 0)));
    }

    #[test]
    fn test_tick_lifecycle() {
        let mut queue = CommandQueue::new(100);
        queue.mark_applied(FireCommand::Extinguish(BlockPos::zeros()));
        assert_eq!(queue.applied_this_tick().len(), 1);

        queue.begin_tick();
        assert!(queue.applied_this_tick().is_empty());
        assert_eq!(queue.history().len(), 1);

        queue.clear();
        assert!(queue.history().is_empty());
    }
}
