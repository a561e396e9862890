//! Kernel-wide timer entry points
//!
//! The kernel registers its [`Timer`] once; the rest of the kernel then uses
//! the free functions here without naming the hardware or scheduler types.

use crate::error::InitError;
use crate::hal::{CounterHardware, InterruptController, Scheduler};
use crate::Timer;
use shared::CoreId;
use spin::Once;

/// Object-safe view of a [`Timer`]
pub trait SystemTimer: Sync {
    fn current_tick(&self) -> u64;
    fn wait(&self, ticks: u32);
    fn core_ticks(&self, core: CoreId) -> u64;
    fn frequency_hz(&self) -> Option<u32>;
    fn uptime_ms(&self) -> u64;
}

impl<H: CounterHardware, S: Scheduler> SystemTimer for Timer<H, S> {
    fn current_tick(&self) -> u64 {
        Timer::current_tick(self)
    }

    fn wait(&self, ticks: u32) {
        Timer::wait(self, ticks)
    }

    fn core_ticks(&self, core: CoreId) -> u64 {
        Timer::core_ticks(self, core)
    }

    fn frequency_hz(&self) -> Option<u32> {
        Timer::frequency_hz(self)
    }

    fn uptime_ms(&self) -> u64 {
        Timer::uptime_ms(self)
    }
}

static SYSTEM_TIMER: Once<&'static dyn SystemTimer> = Once::new();

/// Register the kernel's timer. The first registration wins.
pub fn register(timer: &'static dyn SystemTimer) {
    SYSTEM_TIMER.call_once(|| timer);
}

/// Initialize `timer` on the calling core and register it
pub fn init<H, S, I>(timer: &'static Timer<H, S>, irq: &I) -> Result<(), InitError>
where
    H: CounterHardware + 'static,
    S: Scheduler + 'static,
    I: InterruptController + ?Sized,
{
    timer.init(irq)?;
    register(timer);
    Ok(())
}

/// Logical tick count of the calling core, 0 without a registered timer
pub fn current_tick() -> u64 {
    SYSTEM_TIMER.get().map_or(0, |timer| timer.current_tick())
}

/// Wait for `ticks` logical ticks on the calling core
pub fn wait(ticks: u32) {
    if let Some(timer) = SYSTEM_TIMER.get() {
        timer.wait(ticks);
    }
}

pub fn core_ticks(core: CoreId) -> u64 {
    SYSTEM_TIMER.get().map_or(0, |timer| timer.core_ticks(core))
}

pub fn frequency_hz() -> Option<u32> {
    SYSTEM_TIMER.get().and_then(|timer| timer.frequency_hz())
}

pub fn uptime_ms() -> u64 {
    SYSTEM_TIMER.get().map_or(0, |timer| timer.uptime_ms())
}
