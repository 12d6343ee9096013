//! Per-process hardware ID discovery.
//!
//! The hardware ID is the low [`Ruid::HARDWARE_BITS`] bits of the first
//! network interface's MAC address, read little-endian from its first two
//! bytes. When no usable interface exists (or the `hardware-addr` feature is
//! disabled) a random value is used instead. That is a degraded but valid
//! path: uniqueness across processes becomes probabilistic, nothing fails.

use crate::{Ruid, rand::RandSource};

/// Where a hardware ID came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HardwareSource {
    /// Derived from a network interface's MAC address.
    Interface,
    /// No interface was usable; drawn from the random source.
    Random,
    /// Supplied by the caller.
    Fixed,
}

/// A resolved hardware ID, already masked to its field width.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct HardwareId {
    value: u64,
    source: HardwareSource,
}

impl HardwareId {
    /// A caller-chosen hardware ID, masked to [`Ruid::HARDWARE_BITS`].
    pub const fn fixed(value: u64) -> Self {
        Self {
            value: value & Ruid::HARDWARE_MASK,
            source: HardwareSource::Fixed,
        }
    }

    /// Derives a hardware ID from a MAC address.
    ///
    /// Returns `None` for an all-zero address, which some virtual interfaces
    /// report.
    pub fn from_mac(mac: [u8; 6]) -> Option<Self> {
        if mac == [0; 6] {
            return None;
        }
        Some(Self {
            value: u64::from(u16::from_le_bytes([mac[0], mac[1]])) & Ruid::HARDWARE_MASK,
            source: HardwareSource::Interface,
        })
    }

    /// A random hardware ID.
    pub fn random<R: RandSource<u16>>(rng: &R) -> Self {
        Self {
            value: u64::from(rng.rand()) & Ruid::HARDWARE_MASK,
            source: HardwareSource::Random,
        }
    }

    /// Looks up the first interface MAC address, falling back to
    /// [`HardwareId::random`].
    pub fn discover<R: RandSource<u16>>(rng: &R) -> Self {
        match first_interface_mac().and_then(Self::from_mac) {
            Some(id) => id,
            None => {
                #[cfg(feature = "tracing")]
                tracing::info!("no usable network interface, using a random hardware id");
                Self::random(rng)
            }
        }
    }

    pub const fn value(&self) -> u64 {
        self.value
    }

    pub const fn source(&self) -> HardwareSource {
        self.source
    }
}

#[cfg(feature = "hardware-addr")]
fn first_interface_mac() -> Option<[u8; 6]> {
    match mac_address::get_mac_address() {
        Ok(Some(mac)) => Some(mac.bytes()),
        Ok(None) => None,
        Err(_err) => {
            #[cfg(feature = "tracing")]
            tracing::debug!(error = %_err, "interface lookup failed");
            None
        }
    }
}

#[cfg(not(feature = "hardware-addr"))]
fn first_interface_mac() -> Option<[u8; 6]> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRand(u16);

    impl RandSource<u16> for FixedRand {
        fn rand(&self) -> u16 {
            self.0
        }
    }

    #[test]
    fn mac_uses_low_bits_of_first_two_bytes() {
        let id = HardwareId::from_mac([0xAB, 0xCD, 0x11, 0x22, 0x33, 0x44]).unwrap();
        // 0xCDAB & 0x7FF
        assert_eq!(id.value(), 0x5AB);
        assert_eq!(id.source(), HardwareSource::Interface);
    }

    #[test]
    fn zero_mac_is_unusable() {
        assert_eq!(HardwareId::from_mac([0; 6]), None);
    }

    #[test]
    fn random_and_fixed_are_masked() {
        let id = HardwareId::random(&FixedRand(u16::MAX));
        assert_eq!(id.value(), Ruid::max_hardware_id());
        assert_eq!(id.source(), HardwareSource::Random);

        let id = HardwareId::fixed(u64::MAX);
        assert_eq!(id.value(), Ruid::max_hardware_id());
        assert_eq!(id.source(), HardwareSource::Fixed);
    }

    #[test]
    fn discover_always_fits_the_field() {
        let id = HardwareId::discover(&FixedRand(0x1234));
        assert!(id.value() <= Ruid::max_hardware_id());
        match id.source() {
            HardwareSource::Random => assert_eq!(id.value(), 0x1234 & Ruid::HARDWARE_MASK),
            HardwareSource::Interface => {}
            HardwareSource::Fixed => panic!("discover never reports a fixed id"),
        }
    }

    #[cfg(not(feature = "hardware-addr"))]
    #[test]
    fn discover_without_interface_lookup_is_random() {
        let id = HardwareId::discover(&FixedRand(3));
        assert_eq!(id, HardwareId::random(&FixedRand(3)));
    }
}
