//! ARM Generic Timer, EL1 physical timer
//!
//! * `CNTPCT_EL0`: free-running physical count
//! * `CNTFRQ_EL0`: counter frequency in Hz, programmed by firmware
//! * `CNTP_TVAL_EL0`: 32-bit signed countdown; writing it sets the compare
//!   value to count + TVAL
//! * `CNTP_CTL_EL0`: bit 0 ENABLE, bit 1 IMASK
//!
//! Each core has its own instance of these registers, so a single
//! `GenericTimer` value serves every core.

use crate::hal::CounterHardware;
use core::arch::asm;

/// Largest interval CNTP_TVAL_EL0 can hold
const TVAL_MAX: u64 = i32::MAX as u64;

#[derive(Debug, Default, Clone, Copy)]
pub struct GenericTimer;

impl CounterHardware for GenericTimer {
    fn read_counter(&self) -> u64 {
        let count: u64;
        // isb keeps the read from being speculated ahead of earlier code
        unsafe {
            asm!("isb", "mrs {}, cntpct_el0", out(reg) count, options(nomem, nostack));
        }
        count
    }

    fn read_frequency(&self) -> u32 {
        let freq: u64;
        unsafe {
            asm!("mrs {}, cntfrq_el0", out(reg) freq, options(nomem, nostack));
        }
        // Upper 32 bits are RES0
        freq as u32
    }

    fn arm_compare(&self, interval: u64) {
        let tval = interval.min(TVAL_MAX);
        unsafe {
            asm!("msr cntp_tval_el0, {}", "isb", in(reg) tval, options(nostack));
        }
    }

    fn enable_interrupt(&self, enable: bool) {
        let ctl = u64::from(enable);
        unsafe {
            asm!("msr cntp_ctl_el0, {}", "isb", in(reg) ctl, options(nostack));
        }
    }
}
