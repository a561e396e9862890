#![cfg_attr(not(test), no_std)]

pub mod types;

pub use types::{TimerConfig, TimerMode, DEFAULT_LOGICAL_RATE, DEFAULT_TIMER_VECTOR};
