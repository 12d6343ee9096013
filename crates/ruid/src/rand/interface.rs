/// Source of random integers for sequence seeds and fallback hardware IDs.
///
/// Tests swap in a fixed value to make the first tick's sequence predictable.
///
/// # Example
/// ```
/// use ruid::{RuidGenerator, rand::RandSource, time::WallClock};
///
/// struct SeedZero;
/// impl RandSource<u16> for SeedZero {
///     fn rand(&self) -> u16 {
///         0
///     }
/// }
///
/// let generator = RuidGenerator::with_hardware_id(3, WallClock::default(), SeedZero);
/// assert_eq!(generator.next_id().hardware_id(), 3);
/// ```
pub trait RandSource<T> {
    fn rand(&self) -> T;
}
