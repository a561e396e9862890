// Per-core storage
//
// One slot per core, indexed by CoreId. Each slot has exactly one writer (its
// owning core); reads from other cores are advisory only and may be stale.

use crate::{CoreId, MAX_CORES};

/// Fixed array of per-core values
#[derive(Debug)]
pub struct PerCore<T, const N: usize = MAX_CORES> {
    slots: [T; N],
}

impl<T, const N: usize> PerCore<T, N> {
    /// Wrap an already initialized slot array
    pub const fn from_array(slots: [T; N]) -> Self {
        Self { slots }
    }

    /// Slot of the given core, or `None` if the id is out of range
    pub fn get(&self, core: CoreId) -> Option<&T> {
        self.slots.get(core.index())
    }
}
