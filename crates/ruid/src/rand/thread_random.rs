use rand::{Rng, rng};

use super::RandSource;

/// A `RandSource` that uses the thread-local RNG (`rand::rng()`).
///
/// This RNG is cryptographically secure (ChaCha-based) and periodically
/// reseeded from the OS. The type is a zero-sized handle that looks up the
/// calling thread's generator on each call, so it is `Send + Sync` even though
/// the RNG itself is not.
#[derive(Default, Clone, Copy, Debug)]
pub struct ThreadRandom;

impl RandSource<u16> for ThreadRandom {
    fn rand(&self) -> u16 {
        rng().random()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_vary() {
        let first: u16 = ThreadRandom.rand();
        assert!((0..64).any(|_| ThreadRandom.rand() != first));
    }
}
