use crate::Id;

/// Represents the result of attempting to mint a new ID.
///
/// - [`IdGenStatus::Ready`] indicates a new ID was successfully generated.
/// - [`IdGenStatus::Pending`] means the generator cannot produce an ID right
///   now: the current tick's sequence space is used up, or another thread won
///   a compare-and-swap race.
///
/// This allows non-blocking generation loops and clean backoff strategies.
///
/// # Example
///
/// ```
/// use ruid::{IdGenStatus, RuidGenerator};
///
/// let generator = RuidGenerator::default();
/// let id = loop {
///     match generator.poll_id() {
///         IdGenStatus::Ready { id } => break id,
///         IdGenStatus::Pending { .. } => std::thread::yield_now(),
///     }
/// };
/// assert!(!id.is_zero());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdGenStatus<T: Id> {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: T,
    },
    /// No ID could be generated yet.
    Pending {
        /// Milliseconds to wait before retrying. Zero means retry
        /// immediately.
        yield_for: u64,
    },
}
