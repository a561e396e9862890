//! Tick-based waiting
//!
//! The idle task spins: it has nothing better to do and must keep draining
//! the work queues. Every other task drains once, arms a wake-up and yields to
//! the scheduler, which decides when to resume it.

use crate::driver::{DriverContext, TimerDriver};
use crate::hal::{CounterHardware, Scheduler};
use crate::Timer;
use log::warn;

impl<H: CounterHardware, S: Scheduler> Timer<H, S> {
    /// Wait until `ticks` more logical ticks have elapsed on the calling core
    ///
    /// Returns immediately if the timer was never initialized on this core.
    pub fn wait(&self, ticks: u32) {
        let Some(cx) = self.context() else {
            return;
        };
        if !cx.clock.is_running() {
            warn!("timer: wait on core {} without a running timer", cx.core);
            return;
        }

        let eticks = self.ticks(&cx).saturating_add(u64::from(ticks));

        let task = self.scheduler.current_task();
        if self.scheduler.task_status(task).is_idle() {
            self.spin_until(&cx, eticks);
        } else {
            self.yield_until(&cx, eticks);
        }
    }

    fn spin_until(&self, cx: &DriverContext<'_, H>, eticks: u64) {
        while self.ticks(cx) < eticks {
            self.scheduler.drain_workqueues();

            if self.ticks(cx) >= eticks {
                break;
            }

            core::hint::spin_loop();
        }
    }

    fn yield_until(&self, cx: &DriverContext<'_, H>, eticks: u64) {
        self.scheduler.drain_workqueues();

        if self.ticks(cx) < eticks {
            self.driver.arm_deadline(cx, eticks);
            // Resumption is the scheduler's call, no re-check afterwards
            self.scheduler.reschedule();
        }
    }
}
