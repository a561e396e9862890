#![cfg_attr(not(test), no_std)]

//! Per-core hardware timer
//!
//! Turns a per-core counter/compare peripheral into a monotonic logical clock
//! ("ticks") advancing at a configured rate, and provides the `wait` primitive
//! the scheduler uses for timeouts.
//!
//! Two driving strategies exist, selected once from [`TimerConfig::mode`]:
//!
//! * periodic: the compare interrupt fires once per logical tick and the
//!   handler advances the clock;
//! * dynamic (tickless): the interrupt is disabled unless a deadline is
//!   pending, and the clock is reconciled lazily from the counter whenever it
//!   is read.
//!
//! Each core owns its slot of per-core state exclusively, so no locks are
//! taken on the tick path. Reading another core's tick count is possible via
//! [`Timer::core_ticks`] but only advisory.

pub mod arch;
pub mod clock;
pub mod driver;
pub mod error;
pub mod hal;

pub mod system;

mod init;
mod interrupt;
mod wait;

pub use clock::{GlobalTimerConfig, PerCoreClock};
pub use config::{TimerConfig, TimerMode, DEFAULT_LOGICAL_RATE, DEFAULT_TIMER_VECTOR};
pub use driver::{Driver, DriverContext, DynamicTickDriver, PeriodicDriver, TimerDriver};
pub use error::InitError;
pub use hal::{CounterHardware, InterruptController, IrqHandler, Scheduler};

use core::sync::atomic::{fence, Ordering};
use shared::{CoreId, PerCore, MAX_CORES};
use spin::Once;

/// The timer subsystem of one machine
///
/// Usually placed in a `static` by the kernel and registered with
/// [`system::register`].
pub struct Timer<H, S> {
    hw: H,
    scheduler: S,
    timebase: GlobalTimerConfig,
    vector: u32,
    driver: Driver,
    clocks: PerCore<PerCoreClock>,
    /// Counter value seen by the first core to initialize
    boot_counter: Once<u64>,
}

impl<H: CounterHardware, S: Scheduler> Timer<H, S> {
    pub const fn new(hw: H, scheduler: S, config: TimerConfig) -> Self {
        Self {
            hw,
            scheduler,
            timebase: GlobalTimerConfig::new(config.logical_rate),
            vector: config.vector,
            driver: Driver::for_mode(config.mode),
            clocks: PerCore::from_array([const { PerCoreClock::new() }; MAX_CORES]),
            boot_counter: Once::new(),
        }
    }

    /// Logical tick count of the calling core
    ///
    /// In tickless mode this reconciles the clock with the hardware counter
    /// first.
    pub fn current_tick(&self) -> u64 {
        self.context().map_or(0, |cx| self.ticks(&cx))
    }

    /// Tick count of any core, without reconciliation
    ///
    /// Advisory only: the value may lag behind what the owning core sees.
    pub fn core_ticks(&self, core: CoreId) -> u64 {
        self.clocks.get(core).map_or(0, PerCoreClock::current)
    }

    /// Hardware counter frequency, `None` until a core initialized
    pub fn frequency_hz(&self) -> Option<u32> {
        self.timebase.frequency_hz()
    }

    pub fn logical_rate(&self) -> u32 {
        self.timebase.logical_rate()
    }

    pub fn mode(&self) -> TimerMode {
        self.driver.mode()
    }

    /// Milliseconds since the first core initialized its timer
    pub fn uptime_ms(&self) -> u64 {
        let (Some(hz), Some(&boot)) = (self.frequency_hz(), self.boot_counter.get()) else {
            return 0;
        };
        let now = self.hw.read_counter();
        fence(Ordering::Acquire);
        let elapsed = u128::from(now.saturating_sub(boot)) * 1000 / u128::from(hz);
        u64::try_from(elapsed).unwrap_or(u64::MAX)
    }

    pub fn hardware(&self) -> &H {
        &self.hw
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Driver context for the calling core
    fn context(&self) -> Option<DriverContext<'_, H>> {
        let core = self.scheduler.current_core();
        let clock = self.clocks.get(core)?;
        Some(DriverContext {
            hw: &self.hw,
            clock,
            timebase: &self.timebase,
            core,
        })
    }

    /// Reconciled tick count for `cx`
    ///
    /// A core whose timer was never started stays at zero; its snapshot does
    /// not describe the counter yet.
    fn ticks(&self, cx: &DriverContext<'_, H>) -> u64 {
        if cx.clock.is_running() {
            self.driver.check_ticks(cx);
        }
        cx.clock.current()
    }
}
