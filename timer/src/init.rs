// Per-core timer bring-up

use crate::driver::{DriverContext, TimerDriver};
use crate::error::InitError;
use crate::hal::{CounterHardware, InterruptController, Scheduler};
use crate::Timer;
use core::sync::atomic::{fence, Ordering};
use log::{info, warn};

impl<H, S> Timer<H, S>
where
    H: CounterHardware + 'static,
    S: Scheduler + 'static,
{
    /// Initialize the timer on the calling core
    ///
    /// Must run once on every core before that core queries ticks or waits.
    /// Discovers the counter frequency, installs the interrupt handler and
    /// starts the configured driver. On error nothing is installed and the
    /// hardware timer is left untouched.
    pub fn init<I>(&'static self, irq: &I) -> Result<(), InitError>
    where
        I: InterruptController + ?Sized,
    {
        let rate = self.timebase.logical_rate();
        if rate == 0 {
            return Err(InitError::InvalidRate);
        }

        let core = self.scheduler.current_core();
        let clock = self.clocks.get(core).ok_or(InitError::UnknownCore(core))?;

        // The periodic interval must be at least one counter tick
        let frequency_hz = self.hw.read_frequency();
        if frequency_hz < rate {
            return Err(InitError::HardwareUnavailable { frequency_hz });
        }

        let in_effect = self.timebase.publish_frequency(frequency_hz);
        if in_effect != frequency_hz {
            warn!(
                "timer: core {} reports {} Hz, keeping {} Hz",
                core, frequency_hz, in_effect
            );
        }
        info!(
            "timer: core {} counter frequency {} kHz, {} ticks/s, {:?} mode",
            core,
            in_effect / 1000,
            rate,
            self.driver.mode()
        );

        self.boot_counter.call_once(|| {
            let now = self.hw.read_counter();
            fence(Ordering::Acquire);
            now
        });

        irq.install_handler(self.vector, self);

        let cx = DriverContext {
            hw: &self.hw,
            clock,
            timebase: &self.timebase,
            core,
        };
        self.driver.start(&cx);
        clock.mark_running();

        Ok(())
    }
}
