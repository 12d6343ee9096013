use core::time::Duration;
use std::time::Instant;

use super::{CUSTOM_EPOCH, TimeSource, WallClock};

/// A time source that never runs backwards.
///
/// The wall clock is read once, at construction, to place the origin
/// relative to the epoch. Every later reading adds the [`Instant`] time
/// elapsed since then, so stepping the system clock (NTP, manual changes)
/// does not move it. Over long uptimes it can drift from the wall clock by
/// however much the system clock was corrected.
///
/// Copies share the same origin and agree with each other.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    anchor: Instant,
    origin_millis: u64,
}

impl Default for MonotonicClock {
    /// A monotonic clock aligned to [`CUSTOM_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CUSTOM_EPOCH)
    }
}

impl MonotonicClock {
    /// A monotonic clock whose zero is `epoch`, given as a [`Duration`] since
    /// 1970-01-01 UTC.
    ///
    /// A system clock that reads earlier than `epoch` starts the clock at
    /// zero.
    ///
    /// # Example
    ///
    /// ```
    /// use ruid::time::{MonotonicClock, TimeSource, CUSTOM_EPOCH};
    ///
    /// let clock = MonotonicClock::with_epoch(CUSTOM_EPOCH);
    /// let before: u64 = clock.current_millis();
    /// assert!(clock.current_millis() >= before);
    /// ```
    pub fn with_epoch(epoch: Duration) -> Self {
        Self {
            anchor: Instant::now(),
            origin_millis: WallClock::with_epoch(epoch).current_millis(),
        }
    }
}

impl TimeSource<u64> for MonotonicClock {
    fn current_millis(&self) -> u64 {
        let elapsed = u64::try_from(self.anchor.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.origin_millis.saturating_add(elapsed)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn never_goes_backwards() {
        let clock = MonotonicClock::default();
        let mut last = clock.current_millis();
        for _ in 0..2_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn advances_with_real_time() {
        let clock = MonotonicClock::default();
        let before = clock.current_millis();
        thread::sleep(Duration::from_millis(20));
        assert!(clock.current_millis() >= before + 20);
    }

    #[test]
    fn starts_at_the_wall_clock() {
        let wall = WallClock::default().current_millis();
        let mono = MonotonicClock::default().current_millis();
        assert!(mono.abs_diff(wall) < 1_000);
    }

    #[test]
    fn copies_agree() {
        let clock = MonotonicClock::default();
        let copy = clock;
        thread::sleep(Duration::from_millis(5));
        assert!(copy.current_millis().abs_diff(clock.current_millis()) <= 1);
    }

    #[test]
    fn future_epoch_starts_at_zero() {
        let clock = MonotonicClock::with_epoch(Duration::from_secs(u64::MAX / 2));
        assert!(clock.current_millis() < 1_000);
    }
}
