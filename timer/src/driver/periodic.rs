// Fixed-interval driving strategy
//
// The compare interrupt fires every frequency_hz / logical_rate hardware
// ticks. The interval is an integer division, so when the frequency is not a
// multiple of the rate the clock runs marginally fast; the error is below one
// hardware tick per logical tick.

use super::{reprogram, DriverContext, TimerDriver};
use crate::clock::seconds_crossed;
use crate::hal::CounterHardware;
use crate::interrupt::heartbeat;
use config::TimerMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodicDriver;

impl TimerDriver for PeriodicDriver {
    fn mode(&self) -> TimerMode {
        TimerMode::Periodic
    }

    fn start<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        match cx.timebase.periodic_interval() {
            Some(interval) => reprogram(cx.hw, interval),
            None => cx.hw.enable_interrupt(false),
        }
    }

    fn on_interrupt<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        let Some(interval) = cx.timebase.periodic_interval() else {
            // Frequency never discovered, keep the line quiet
            cx.hw.enable_interrupt(false);
            return;
        };

        let before = cx.clock.current();
        let after = cx.clock.advance_by(1);

        // Already in the handler with the line masked by the controller
        cx.hw.arm_compare(interval);
        cx.hw.enable_interrupt(true);

        let rate = cx.timebase.logical_rate();
        heartbeat(cx.core, seconds_crossed(before, after, rate));
    }

    fn check_ticks<H: CounterHardware>(&self, _cx: &DriverContext<'_, H>) {
        // The interrupt keeps the clock current
    }

    fn arm_deadline<H: CounterHardware>(&self, _cx: &DriverContext<'_, H>, _eticks: u64) {
        // Already firing every tick
    }
}
