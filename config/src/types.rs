//! Configuration types for the per-core timer
//!
//! Everything here is fixed at build time. The kernel picks a
//! [`TimerConfig`] when it builds its `static` timer.

/// Logical ticks per second unless configured otherwise
pub const DEFAULT_LOGICAL_RATE: u32 = 100;

/// Non-secure EL1 physical timer PPI on the generic interrupt controller
pub const DEFAULT_TIMER_VECTOR: u32 = 30;

/// Strategy driving the logical clock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    /// Compare interrupt fires once per logical tick
    Periodic,
    /// Tickless: timer armed only for explicit deadlines, ticks reconstructed
    /// from the free-running counter
    Dynamic,
}

impl TimerMode {
    /// Mode selected by the `dynamic-ticks` build feature
    pub const fn build_default() -> Self {
        if cfg!(feature = "dynamic-ticks") {
            TimerMode::Dynamic
        } else {
            TimerMode::Periodic
        }
    }
}

/// Timer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerConfig {
    /// Target logical ticks per second
    pub logical_rate: u32,
    pub mode: TimerMode,
    /// Interrupt vector of the per-core compare interrupt
    pub vector: u32,
}

impl TimerConfig {
    pub const fn new(logical_rate: u32, mode: TimerMode) -> Self {
        Self {
            logical_rate,
            mode,
            vector: DEFAULT_TIMER_VECTOR,
        }
    }

    pub const fn periodic(logical_rate: u32) -> Self {
        Self::new(logical_rate, TimerMode::Periodic)
    }

    pub const fn dynamic(logical_rate: u32) -> Self {
        Self::new(logical_rate, TimerMode::Dynamic)
    }

    pub const fn with_vector(mut self, vector: u32) -> Self {
        self.vector = vector;
        self
    }
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_LOGICAL_RATE, TimerMode::build_default())
    }
}
