use std::sync::OnceLock;

use super::RuidGenerator;
use crate::Ruid;

static GENERATOR: OnceLock<RuidGenerator> = OnceLock::new();

/// The process-wide generator, created on first use.
///
/// It reads the wall clock against [`CUSTOM_EPOCH`] and seeds itself from the
/// thread RNG and the first network interface.
///
/// [`CUSTOM_EPOCH`]: crate::time::CUSTOM_EPOCH
pub fn generator() -> &'static RuidGenerator {
    GENERATOR.get_or_init(RuidGenerator::default)
}

/// Mints a fresh [`Ruid`] from the process-wide [`generator`].
///
/// Safe to call from any number of threads; every call returns a distinct
/// ID, and IDs minted one after another on a thread compare strictly
/// increasing.
///
/// ```
/// let a = ruid::new();
/// let b = ruid::new();
/// assert!(a < b);
/// assert_eq!(a.to_string().parse::<ruid::Ruid>().unwrap(), a);
/// ```
pub fn new() -> Ruid {
    generator().next_id()
}
