// Error types for timer bring-up

use shared::CoreId;
use thiserror::Error;

/// Timer initialization errors
///
/// A core whose init failed has no working timer: its tick count never
/// advances and `wait` returns without blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("counter frequency unavailable or implausible ({frequency_hz} Hz)")]
    HardwareUnavailable { frequency_hz: u32 },

    #[error("logical tick rate must be nonzero")]
    InvalidRate,

    #[error("core {0} has no per-core clock slot")]
    UnknownCore(CoreId),
}
