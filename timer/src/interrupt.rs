// Timer interrupt entry point

use crate::driver::TimerDriver;
use crate::hal::{CounterHardware, IrqHandler, Scheduler};
use crate::Timer;
use log::info;
use shared::CoreId;

impl<H: CounterHardware, S: Scheduler> Timer<H, S> {
    /// Handle the compare interrupt on the calling core
    ///
    /// Never blocks, never enters the scheduler and never fails. An interrupt
    /// for a core without a clock slot is ignored.
    pub fn handle_interrupt(&self) {
        if let Some(cx) = self.context() {
            self.driver.on_interrupt(&cx);
        }
    }
}

impl<H: CounterHardware, S: Scheduler> IrqHandler for Timer<H, S> {
    fn handle_irq(&self) {
        self.handle_interrupt();
    }
}

/// Report `seconds` crossed second boundaries in a single heartbeat line
pub(crate) fn heartbeat(core: CoreId, seconds: u64) {
    match seconds {
        0 => {}
        1 => info!("One second has passed on core {}", core),
        n => info!("{} seconds have passed on core {}", n, core),
    }
}
