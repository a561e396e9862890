#![cfg_attr(not(test), no_std)]

// Shared crate for the per-core timer workspace
// Core identifiers, task handles and per-core storage used across crates

pub mod percore;

pub use percore::PerCore;

/// Maximum number of cores the kernel brings up
pub const MAX_CORES: usize = 64;

/// Identifier of a processor core
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CoreId(pub u32);

impl CoreId {
    /// Create a new CoreId
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Slot index of this core in per-core storage
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl core::fmt::Display for CoreId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle to a scheduler task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u64);

/// Scheduling state of a task, as reported by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    /// The per-core idle task, runs only when nothing else is runnable
    Idle,
    Ready,
    Running,
    Blocked,
    Finished,
}

impl TaskStatus {
    pub const fn is_idle(self) -> bool {
        matches!(self, TaskStatus::Idle)
    }
}
