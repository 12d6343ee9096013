use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

use super::{CUSTOM_EPOCH, TimeSource};

/// Reads the system wall clock on every call, truncated to milliseconds and
/// offset from an epoch.
///
/// A wall clock can step backwards (NTP, manual changes). The generator
/// tolerates that by staying on its last tick; use [`MonotonicClock`] if
/// timestamps themselves must never regress.
///
/// A system clock that reads earlier than the epoch reports `0` rather than
/// failing.
///
/// [`MonotonicClock`]: crate::time::MonotonicClock
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WallClock {
    epoch_millis: u64,
}

impl Default for WallClock {
    /// A wall clock aligned to [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl WallClock {
    /// A wall clock whose zero is `epoch`, given as a [`Duration`] since
    /// 1970-01-01 UTC.
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource<u64> for WallClock {
    fn current_millis(&self) -> u64 {
        let since_unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        since_unix.saturating_sub(self.epoch_millis)
    }
}
