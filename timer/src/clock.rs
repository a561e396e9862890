// Per-core logical clock and the process-wide timebase
//
// Each PerCoreClock has a single writer, its owning core. Cells are atomics so
// that other cores can read them for diagnostics, but the owner only ever does
// plain load/store on them, never read-modify-write.

use core::sync::atomic::{fence, AtomicBool, AtomicU32, AtomicU64, Ordering};

/// Logical clock of one core
#[derive(Debug)]
pub struct PerCoreClock {
    ticks: AtomicU64,
    /// Hardware counter value at the last reconciliation (tickless mode)
    last_hw: AtomicU64,
    /// Sub-tick remainder at `last_hw`, in 1/logical_rate counter ticks
    carry: AtomicU64,
    running: AtomicBool,
}

impl PerCoreClock {
    pub const fn new() -> Self {
        Self {
            ticks: AtomicU64::new(0),
            last_hw: AtomicU64::new(0),
            carry: AtomicU64::new(0),
            running: AtomicBool::new(false),
        }
    }

    /// Current tick count
    ///
    /// Immediately consistent on the owning core, eventually consistent when
    /// read from another core.
    pub fn current(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// Advance the clock by `n` ticks and return the new count
    ///
    /// Owning core only, from interrupt context or reconciliation.
    pub fn advance_by(&self, n: u64) -> u64 {
        let next = self.ticks.load(Ordering::Relaxed).saturating_add(n);
        self.ticks.store(next, Ordering::Relaxed);
        next
    }

    pub fn last_snapshot(&self) -> u64 {
        self.last_hw.load(Ordering::Relaxed)
    }

    pub fn carry(&self) -> u64 {
        self.carry.load(Ordering::Relaxed)
    }

    /// Record the hardware counter value the clock is reconciled up to,
    /// together with the fraction of a tick left over at that point
    pub fn set_snapshot(&self, hw: u64, carry: u64) {
        self.last_hw.store(hw, Ordering::Relaxed);
        self.carry.store(carry, Ordering::Relaxed);
        fence(Ordering::Release);
    }

    /// Whether a driver has been started on this core
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    pub(crate) fn mark_running(&self) {
        self.running.store(true, Ordering::Release);
    }
}

impl Default for PerCoreClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Timebase shared by all cores
///
/// `logical_rate` is fixed at construction. `frequency_hz` is discovered by
/// the first core to initialize and read-only afterwards; zero means unknown.
#[derive(Debug)]
pub struct GlobalTimerConfig {
    frequency_hz: AtomicU32,
    logical_rate: u32,
}

impl GlobalTimerConfig {
    pub const fn new(logical_rate: u32) -> Self {
        Self {
            frequency_hz: AtomicU32::new(0),
            logical_rate,
        }
    }

    pub fn frequency_hz(&self) -> Option<u32> {
        match self.frequency_hz.load(Ordering::Acquire) {
            0 => None,
            hz => Some(hz),
        }
    }

    pub const fn logical_rate(&self) -> u32 {
        self.logical_rate
    }

    /// Publish the hardware frequency
    ///
    /// The first nonzero value wins. Returns the value in effect, which is
    /// the previously published one if it differs from `hz`.
    pub(crate) fn publish_frequency(&self, hz: u32) -> u32 {
        match self
            .frequency_hz
            .compare_exchange(0, hz, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => hz,
            Err(existing) => existing,
        }
    }

    /// Hardware ticks between two periodic interrupts
    pub fn periodic_interval(&self) -> Option<u64> {
        let hz = self.frequency_hz()?;
        if self.logical_rate == 0 {
            return None;
        }
        Some(u64::from(hz / self.logical_rate))
    }

    /// Whole logical ticks in `hw_ticks` counter ticks plus `carry`
    ///
    /// Returns the ticks (truncating) and the new carry. The carry is the
    /// remainder of `hw_ticks * logical_rate + carry` divided by the
    /// frequency, so repeated conversions of small deltas add up to exactly
    /// the conversion of their sum.
    pub fn hw_to_logical(&self, hw_ticks: u64, carry: u64) -> Option<(u64, u64)> {
        let hz = u128::from(self.frequency_hz()?);
        let scaled = u128::from(hw_ticks) * u128::from(self.logical_rate) + u128::from(carry);
        let ticks = u64::try_from(scaled / hz).unwrap_or(u64::MAX);
        // Remainder is below hz, which fits in u64
        let carry = (scaled % hz) as u64;
        Some((ticks, carry))
    }

    /// Counter ticks from a reconciliation point with `carry` until `logical`
    /// more ticks have elapsed (rounded up, so never early)
    pub fn logical_to_hw(&self, logical: u64, carry: u64) -> Option<u64> {
        let hz = u128::from(self.frequency_hz()?);
        let rate = u128::from(self.logical_rate);
        if rate == 0 {
            return None;
        }
        let scaled = (u128::from(logical) * hz).saturating_sub(u128::from(carry));
        Some(u64::try_from(scaled.div_ceil(rate)).unwrap_or(u64::MAX))
    }
}

/// Number of whole-second boundaries crossed going from `before` to `after`
pub(crate) fn seconds_crossed(before: u64, after: u64, logical_rate: u32) -> u64 {
    if logical_rate == 0 || after <= before {
        return 0;
    }
    let rate = u64::from(logical_rate);
    after / rate - before / rate
}
