// Tickless driving strategy
//
// The compare interrupt is disabled unless somebody waits for a deadline.
// Logical ticks are reconstructed from the free-running counter whenever the
// clock is read. The snapshot only moves when at least one whole tick has
// elapsed, and the fraction of a tick left over at that point is kept as the
// clock's carry, so many small reconciliations add up to exactly the same
// count as one large one.

use super::{reprogram, DriverContext, TimerDriver};
use crate::clock::seconds_crossed;
use crate::hal::CounterHardware;
use crate::interrupt::heartbeat;
use config::TimerMode;
use core::sync::atomic::{fence, Ordering};
use log::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DynamicTickDriver;

impl TimerDriver for DynamicTickDriver {
    fn mode(&self) -> TimerMode {
        TimerMode::Dynamic
    }

    fn start<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        cx.hw.enable_interrupt(false);
        let now = cx.hw.read_counter();
        fence(Ordering::Acquire);
        cx.clock.set_snapshot(now, 0);
    }

    fn on_interrupt<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        // Only here to wake the core; the next reconciliation does the
        // accounting.
        cx.hw.enable_interrupt(false);
    }

    fn check_ticks<H: CounterHardware>(&self, cx: &DriverContext<'_, H>) {
        if cx.timebase.frequency_hz().is_none() {
            return;
        }

        let now = cx.hw.read_counter();
        fence(Ordering::Acquire);

        let last = cx.clock.last_snapshot();
        let Some(diff_hw) = now.checked_sub(last) else {
            warn!(
                "timer: counter on core {} went backwards ({:#x} -> {:#x}), resynchronizing",
                cx.core, last, now
            );
            cx.clock.set_snapshot(now, 0);
            return;
        };

        let Some((diff_ticks, carry)) = cx.timebase.hw_to_logical(diff_hw, cx.clock.carry())
        else {
            return;
        };
        if diff_ticks == 0 {
            return;
        }

        let before = cx.clock.current();
        let after = cx.clock.advance_by(diff_ticks);
        cx.clock.set_snapshot(now, carry);

        heartbeat(
            cx.core,
            seconds_crossed(before, after, cx.timebase.logical_rate()),
        );
    }

    fn arm_deadline<H: CounterHardware>(&self, cx: &DriverContext<'_, H>, eticks: u64) {
        let remaining = eticks.saturating_sub(cx.clock.current());
        if remaining == 0 {
            return;
        }
        let Some(span) = cx.timebase.logical_to_hw(remaining, cx.clock.carry()) else {
            return;
        };

        // The clock is reconciled up to the snapshot, not up to "now"
        let target = cx.clock.last_snapshot().saturating_add(span);
        let now = cx.hw.read_counter();
        fence(Ordering::Acquire);
        let interval = target.saturating_sub(now).max(1);

        debug!(
            "timer: core {} arming deadline tick {} in {} counter ticks",
            cx.core, eticks, interval
        );
        reprogram(cx.hw, interval);
    }
}
