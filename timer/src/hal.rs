//! Collaborator interfaces
//!
//! The timer core does not touch registers, vector tables or run queues
//! itself. The surrounding kernel provides them through these traits.

use shared::{CoreId, TaskHandle, TaskStatus};

/// Access to the calling core's counter/compare peripheral
///
/// Every method operates on the peripheral instance of the core it is called
/// from. Implementations must not block.
pub trait CounterHardware: Sync {
    /// Current value of the free-running hardware counter
    fn read_counter(&self) -> u64;

    /// Counter frequency in Hz, or 0 if it could not be determined
    fn read_frequency(&self) -> u32;

    /// Program the compare register to fire `interval` hardware ticks from now
    fn arm_compare(&self, interval: u64);

    /// Enable or disable (mask) the compare interrupt
    fn enable_interrupt(&self, enable: bool);
}

/// Entry point invoked by the interrupt dispatcher
pub trait IrqHandler: Sync {
    fn handle_irq(&self);
}

/// Interrupt controller / vector table plumbing
pub trait InterruptController {
    /// Route `vector` on the calling core to `handler`
    fn install_handler(&self, vector: u32, handler: &'static dyn IrqHandler);
}

/// Scheduler services used by the wait primitive
pub trait Scheduler: Sync {
    /// Core the caller is executing on
    fn current_core(&self) -> CoreId;

    fn current_task(&self) -> TaskHandle;

    fn task_status(&self, task: TaskHandle) -> TaskStatus;

    /// Suspend the current task and run another runnable one
    fn reschedule(&self);

    /// Run pending deferred work on the calling core
    fn drain_workqueues(&self);
}
