use std::sync::OnceLock;

use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use super::IdGenStatus;
use crate::{
    IdFactory, Ruid,
    hardware::HardwareId,
    rand::{RandSource, ThreadRandom},
    time::{TimeSource, WallClock},
};

/// Bits the packed state reserves for the next sequence value. One more than
/// the ID's sequence field so "exhausted" (`max_sequence() + 1`) is
/// representable.
const NEXT_SEQ_BITS: u32 = Ruid::SEQUENCE_BITS + 1;
const NEXT_SEQ_MASK: u64 = (1 << NEXT_SEQ_BITS) - 1;

/// A reading more than half the timestamp range behind the last tick is the
/// 41-bit field wrapping around, not a clock step.
const fn wrapped(tick: u64, now: u64) -> bool {
    tick > now && tick - now > Ruid::TIMESTAMP_MASK / 2
}

const fn pack(timestamp: u64, next_sequence: u64) -> u64 {
    (timestamp << NEXT_SEQ_BITS) | (next_sequence & NEXT_SEQ_MASK)
}

const fn unpack(state: u64) -> (u64, u64) {
    (state >> NEXT_SEQ_BITS, state & NEXT_SEQ_MASK)
}

/// A lock-free [`Ruid`] generator safe to share across threads.
///
/// The last tick and the next sequence value live in one [`AtomicU64`]
/// updated by compare-and-swap, so concurrent callers never receive the same
/// sequence for the same tick.
///
/// On first use (not at construction) the generator resolves, exactly once,
/// its hardware ID and a random starting sequence for the current tick.
/// Concurrent first callers block until that finishes.
///
/// Within a tick the sequence counts up; a new tick restarts it at zero.
/// When a tick's 4096 sequence values are used up the generator reports
/// [`IdGenStatus::Pending`] until the clock moves on. A clock that steps
/// backwards is treated as still being on the last tick. Together this makes
/// IDs from one generator strictly increasing.
///
/// The zero ID is never returned.
///
/// The timestamp field holds about 69 years of milliseconds. When the clock
/// runs past that the field wraps to zero and the generator starts over on
/// the small tick, so IDs minted across the wrap do not sort after the ones
/// before it.
///
/// ## See Also
/// - [`generator`](crate::generator()) for the process-wide instance
pub struct RuidGenerator<T = WallClock, R = ThreadRandom>
where
    T: TimeSource<u64>,
    R: RandSource<u16>,
{
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    hardware: OnceLock<HardwareId>,
    fixed_hardware: Option<HardwareId>,
    time: T,
    rng: R,
}

impl Default for RuidGenerator {
    fn default() -> Self {
        Self::new(WallClock::default(), ThreadRandom)
    }
}

impl<T, R> RuidGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u16>,
{
    /// Creates a generator that discovers its hardware ID from the first
    /// network interface on first use.
    ///
    /// # Example
    ///
    /// ```
    /// use ruid::{RuidGenerator, rand::ThreadRandom, time::MonotonicClock};
    ///
    /// let generator = RuidGenerator::new(MonotonicClock::default(), ThreadRandom);
    /// let id = generator.next_id();
    /// assert!(!id.is_zero());
    /// ```
    pub fn new(time: T, rng: R) -> Self {
        Self::build(None, time, rng)
    }

    /// Creates a generator with a caller-chosen hardware ID, masked to
    /// [`Ruid::HARDWARE_BITS`]. No interface lookup happens.
    pub fn with_hardware_id(hardware_id: u64, time: T, rng: R) -> Self {
        Self::build(Some(HardwareId::fixed(hardware_id)), time, rng)
    }

    fn build(fixed_hardware: Option<HardwareId>, time: T, rng: R) -> Self {
        Self {
            state: AtomicU64::new(0).into(),
            hardware: OnceLock::new(),
            fixed_hardware,
            time,
            rng,
        }
    }

    /// The hardware ID embedded in every ID from this generator.
    ///
    /// Triggers the one-time initialization if it has not run yet.
    pub fn hardware_id(&self) -> HardwareId {
        *self.init()
    }

    fn init(&self) -> &HardwareId {
        self.hardware.get_or_init(|| {
            let sequence = u64::from(self.rng.rand()) & Ruid::SEQUENCE_MASK;
            let hardware = self
                .fixed_hardware
                .unwrap_or_else(|| HardwareId::discover(&self.rng));
            let now = self.time.current_millis() & Ruid::TIMESTAMP_MASK;
            self.state.store(pack(now, sequence), Ordering::Relaxed);

            #[cfg(feature = "tracing")]
            tracing::debug!(
                hardware_id = hardware.value(),
                source = ?hardware.source(),
                sequence,
                "initialized ruid generator"
            );
            hardware
        })
    }

    /// Mints the next ID, spinning or yielding while the generator is
    /// [`IdGenStatus::Pending`].
    pub fn next_id(&self) -> Ruid {
        loop {
            match self.poll_id() {
                IdGenStatus::Ready { id } => break id,
                IdGenStatus::Pending { yield_for: 0 } => core::hint::spin_loop(),
                IdGenStatus::Pending { .. } => std::thread::yield_now(),
            }
        }
    }

    /// Attempts to mint the next ID without blocking.
    ///
    /// # Returns
    /// - `IdGenStatus::Ready { id }`: a new ID
    /// - `IdGenStatus::Pending { yield_for }`: retry after `yield_for`
    ///   milliseconds (zero after a lost race)
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn poll_id(&self) -> IdGenStatus<Ruid> {
        let hardware = self.init().value();
        let now = self.time.current_millis() & Ruid::TIMESTAMP_MASK;

        let current = self.state.load(Ordering::Relaxed);
        let (tick, next_seq) = unpack(current);

        let (tick, sequence) = if now > tick || wrapped(tick, now) {
            (now, 0)
        } else if next_seq <= Ruid::max_sequence() {
            (tick, next_seq)
        } else {
            return IdGenStatus::Pending {
                yield_for: tick - now + 1,
            };
        };

        if self
            .state
            .compare_exchange(
                current,
                pack(tick, sequence + 1),
                Ordering::Relaxed,
                Ordering::Relaxed,
            )
            .is_err()
        {
            // Another thread won the race; retry immediately.
            return IdGenStatus::Pending { yield_for: 0 };
        }

        let id = Ruid::from_components(tick, hardware, sequence);
        if id.is_zero() {
            // The sentinel slot is burned; the next poll gets sequence 1.
            return IdGenStatus::Pending { yield_for: 0 };
        }
        IdGenStatus::Ready { id }
    }
}

impl<T, R> IdFactory for RuidGenerator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u16>,
{
    type Id = Ruid;

    fn new_id(&self) -> Ruid {
        self.next_id()
    }
}
