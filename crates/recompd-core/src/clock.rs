//! Time source seam for the backoff engine.

use chrono::Utc;

/// Supplies the current time to decision code, in whole seconds since the
/// Unix epoch. Narrow on purpose so tests can pin "now" exactly.
pub trait TimeSource: Send + Sync {
    /// Current time in epoch seconds.
    fn now_epoch_seconds(&self) -> i64;
}

/// Wall-clock time source used outside tests.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now_epoch_seconds(&self) -> i64 {
        Utc::now().timestamp()
    }
}
