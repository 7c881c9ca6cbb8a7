// Snapshot management for stepping through a finished run

use crate::interpreter::{State, Status};
use crate::parser::ast::StatementId;
use thiserror::Error;

/// Interpreter state right after one statement finished
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// `None` for the state before the first statement
    pub statement: Option<StatementId>,
    pub state: State,
    pub status: Status,
}

impl Snapshot {
    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        // Rough: fixed overhead plus the text held in each queue
        std::mem::size_of::<Self>()
            + self.state.memory.estimated_size()
            + word_bytes(self.state.input.iter())
            + word_bytes(self.state.output.iter())
    }
}

fn word_bytes<'a>(words: impl Iterator<Item = &'a String>) -> usize {
    words
        .map(|w| w.len() + std::mem::size_of::<String>())
        .sum()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SnapshotError {
    #[error("snapshot memory limit exceeded: {current} + {size} > {limit} bytes")]
    LimitExceeded {
        current: usize,
        size: usize,
        limit: usize,
    },
}

/// Execution history with a cursor for forward/backward navigation
#[derive(Debug)]
pub struct SnapshotManager {
    snapshots: Vec<Snapshot>,
    max_memory: usize,
    current_memory: usize,
    truncated: bool,
    position: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            snapshots: Vec::new(),
            max_memory,
            current_memory: 0,
            truncated: false,
            position: 0,
        }
    }

    /// Add a snapshot to history. Once one snapshot is refused, the history
    /// is marked truncated and later snapshots are refused as well.
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), SnapshotError> {
        let size = snapshot.estimated_size();

        if self.truncated || self.current_memory + size > self.max_memory {
            self.truncated = true;
            return Err(SnapshotError::LimitExceeded {
                current: self.current_memory,
                size,
                limit: self.max_memory,
            });
        }

        self.current_memory += size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether recording stopped before the run ended
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }

    // ========== Navigation ==========

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn current(&self) -> Option<&Snapshot> {
        self.snapshots.get(self.position)
    }

    /// Moves one snapshot forward; `false` at the end of history.
    pub fn step_forward(&mut self) -> bool {
        if self.position + 1 < self.snapshots.len() {
            self.position += 1;
            true
        } else {
            false
        }
    }

    /// Moves one snapshot back; `false` at the start of history.
    pub fn step_backward(&mut self) -> bool {
        if self.position > 0 {
            self.position -= 1;
            true
        } else {
            false
        }
    }

    pub fn rewind_to_start(&mut self) {
        self.position = 0;
    }

    pub fn jump_to_end(&mut self) {
        self.position = self.snapshots.len().saturating_sub(1);
    }

    pub fn is_at_end(&self) -> bool {
        self.position + 1 >= self.snapshots.len()
    }
}
