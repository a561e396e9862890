//! Timer driving strategies
//!
//! Both strategies feed the same [`PerCoreClock`]; a caller observing only the
//! tick count cannot tell which one is active. The strategy is chosen once,
//! when the [`Timer`](crate::Timer) is built, from [`TimerMode`].

mod dynamic;
mod periodic;

pub use dynamic::DynamicTickDriver;
pub use periodic::PeriodicDriver;

use crate::clock::{GlobalTimerConfig, PerCoreClock};
use crate::hal::CounterHardware;
use config::TimerMode;
use shared::CoreId;

/// Everything a driver touches on behalf of one core
pub struct DriverContext<'a, H> {
    pub hw: &'a H,
    pub clock: &'a PerCoreClock,
    pub timebase: &'a GlobalTimerConfig,
    pub core: CoreId,
}

/// A strategy for turning hardware counter progress into logical ticks
pub trait TimerDriver {
    fn mode(&self) -> TimerMode;

    /// Bring the strategy up on the calling core
    fn start<H: CounterHardware>(&self, cx: &DriverContext<'_, H>);

    /// Compare interrupt fired on the calling core. Must never fail.
    fn on_interrupt<H: CounterHardware>(&self, cx: &DriverContext<'_, H>);

    /// Bring the logical clock up to date with the hardware counter
    fn check_ticks<H: CounterHardware>(&self, cx: &DriverContext<'_, H>);

    /// Make sure the core is woken up once the clock reaches `eticks`
    fn arm_deadline<H: CounterHardware>(&self, cx: &DriverContext<'_, H>, eticks: u64);
}

/// Driver selected from configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Driver {
    Periodic(PeriodicDriver),
    Dynamic(DynamicTickDriver),
}

impl Driver {
    pub const fn for_mode(mode: TimerMode) -> Self {
        match mode {
            TimerMode::Periodic => Driver::Periodic(PeriodicDriver),
            TimerMode::Dynamic => Driver::Dynamic(DynamicTickDriver),
        }
    }
}

impl TimerDriver for Driver {
    fn mode(&self) -> TimerMode {
        match self {
            Driver::Periodic(d) => d.mode(),
            Driver::Dynamic(d) => d.mode(),
        }
    }

    fn start<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        match self {
            Driver::Periodic(d) => d.start(cx),
            Driver::Dynamic(d) => d.start(cx),
        }
    }

    fn on_interrupt<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        match self {
            Driver::Periodic(d) => d.on_interrupt(cx),
            Driver::Dynamic(d) => d.on_interrupt(cx),
        }
    }

    fn check_ticks<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        match self {
            Driver::Periodic(d) => d.check_ticks(cx),
            Driver::Dynamic(d) => d.check_ticks(cx),
        }
    }

    fn arm_deadline<H: CounterHardware>(&self, cx: &DriverContext<'_, H>, eticks: u64) {
        match self {
            Driver::Periodic(d) => d.arm_deadline(cx, eticks),
            Driver::Dynamic(d) => d.arm_deadline(cx, eticks),
        }
    }
}

/// Reprogram the compare register outside the timer interrupt
///
/// The compare interrupt is masked while the new value is written so the
/// handler cannot run against a half-programmed timer.
pub(crate) fn reprogram<H: CounterHardware>(hw: &H, interval: u64) {
    hw.enable_interrupt(false);
    hw.arm_compare(interval);
    hw.enable_interrupt(true);
}
