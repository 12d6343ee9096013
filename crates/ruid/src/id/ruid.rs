use core::{fmt, str::FromStr};

use crate::{Base64Ext, DecodeError, Id};

/// A 64-bit Recently Unique IDentifier.
///
/// - 41 bits timestamp (ms since the generator's epoch, see
///   [`CUSTOM_EPOCH`])
/// - 11 bits hardware ID (low bits of the first interface's MAC address, or
///   random)
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63             23 22              12 11             0
///              +----------------+------------------+---------------+
///  Field:      | timestamp (41) | hardware ID (11) | sequence (12) |
///              +----------------+------------------+---------------+
///              |<----- MSB ---------- 64 bits --------- LSB ------>|
/// ```
///
/// Ordering is plain `u64` ordering of the packed value, so IDs from one
/// generator sort by timestamp first and sequence second. The layout is fixed:
/// IDs packed under a different field order are not order-comparable with
/// these and must never share a ring.
///
/// The byte form is little-endian, the text form is unpadded URL-safe base64
/// of those 8 bytes (11 characters).
///
/// [`CUSTOM_EPOCH`]: crate::time::CUSTOM_EPOCH
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Ruid {
    id: u64,
}

impl Ruid {
    pub const TIMESTAMP_BITS: u32 = 41;
    pub const HARDWARE_BITS: u32 = 11;
    pub const SEQUENCE_BITS: u32 = 12;

    /// Bitmask for the 41-bit timestamp field. Occupies bits 23 through 63.
    pub const TIMESTAMP_MASK: u64 = (1 << Self::TIMESTAMP_BITS) - 1;

    /// Bitmask for the 11-bit hardware ID field. Occupies bits 12 through 22.
    pub const HARDWARE_MASK: u64 = (1 << Self::HARDWARE_BITS) - 1;

    /// Bitmask for the 12-bit sequence field. Occupies bits 0 through 11.
    pub const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    pub const TIMESTAMP_SHIFT: u32 = Self::HARDWARE_SHIFT + Self::HARDWARE_BITS;
    pub const HARDWARE_SHIFT: u32 = Self::SEQUENCE_SHIFT + Self::SEQUENCE_BITS;
    pub const SEQUENCE_SHIFT: u32 = 0;

    /// The reserved zero sentinel.
    pub const ZERO: Self = Self::from_raw(0);

    /// The largest representable value.
    pub const MAX: Self = Self::from_raw(u64::MAX);

    /// Length of the base64 text form.
    pub const ENCODED_LEN: usize = 11;

    /// Packs the three fields, masking each to its width.
    pub const fn from_components(timestamp: u64, hardware_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let hardware_id = (hardware_id & Self::HARDWARE_MASK) << Self::HARDWARE_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | hardware_id | sequence,
        }
    }

    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Extracts the timestamp from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the hardware ID from the packed ID.
    pub const fn hardware_id(&self) -> u64 {
        (self.id >> Self::HARDWARE_SHIFT) & Self::HARDWARE_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_hardware_id() -> u64 {
        Self::HARDWARE_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    pub const fn is_zero(&self) -> bool {
        self.id == 0
    }

    pub const fn to_le_bytes(&self) -> [u8; 8] {
        self.id.to_le_bytes()
    }

    pub const fn from_le_bytes(bytes: [u8; 8]) -> Self {
        Self::from_raw(u64::from_le_bytes(bytes))
    }

    /// Encodes into a caller-provided buffer without allocating.
    pub fn encode_to_buf(&self, buf: &mut [u8; Self::ENCODED_LEN]) {
        crate::base64::encode_base64(&self.to_le_bytes(), buf);
    }
}

impl Id for Ruid {
    type Ty = u64;
    type Bytes = [u8; 8];

    const BYTE_SIZE: usize = 8;
    const ZERO: Self = Self::ZERO;

    fn to_raw(&self) -> Self::Ty {
        self.id
    }

    fn from_raw(raw: Self::Ty) -> Self {
        Self::from_raw(raw)
    }

    fn to_bytes(&self) -> Self::Bytes {
        self.to_le_bytes()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
        let bytes: [u8; 8] = bytes
            .try_into()
            .map_err(|_| DecodeError::InvalidLength {
                expected: Self::BYTE_SIZE,
                len: bytes.len(),
            })?;
        Ok(Self::from_le_bytes(bytes))
    }

    fn is_zero(&self) -> bool {
        self.is_zero()
    }
}

impl From<u64> for Ruid {
    fn from(raw: u64) -> Self {
        Self::from_raw(raw)
    }
}

impl From<Ruid> for u64 {
    fn from(id: Ruid) -> Self {
        id.id
    }
}

impl TryFrom<&[u8]> for Ruid {
    type Error = DecodeError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        <Self as Id>::from_bytes(bytes)
    }
}

impl FromStr for Ruid {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl fmt::Display for Ruid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [0_u8; Self::ENCODED_LEN];
        self.encode_to_buf(&mut buf);
        // Every byte comes from the ASCII alphabet.
        let text = core::str::from_utf8(&buf).map_err(|_| fmt::Error)?;
        f.write_str(text)
    }
}

impl fmt::Debug for Ruid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ruid")
            .field("id", &self.id)
            .field("timestamp", &self.timestamp())
            .field("hardware_id", &self.hardware_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_components() {
        let id = Ruid::from_components(
            Ruid::max_timestamp(),
            Ruid::max_hardware_id(),
            Ruid::max_sequence(),
        );
        assert_eq!(id, Ruid::MAX);
        assert_eq!(id.timestamp(), Ruid::max_timestamp());
        assert_eq!(id.hardware_id(), Ruid::max_hardware_id());
        assert_eq!(id.sequence(), Ruid::max_sequence());
    }

    #[test]
    fn fields_do_not_overlap() {
        let id = Ruid::from_components(1, 1, 1);
        assert_eq!(id.to_raw(), (1 << 23) | (1 << 12) | 1);
        assert_eq!(Ruid::TIMESTAMP_SHIFT + Ruid::TIMESTAMP_BITS, 64);
    }

    #[test]
    fn components_are_masked() {
        let id = Ruid::from_components(0, Ruid::max_hardware_id() + 1, Ruid::max_sequence() + 2);
        assert_eq!(id.hardware_id(), 0);
        assert_eq!(id.sequence(), 1);
        assert_eq!(id.timestamp(), 0);
    }

    #[test]
    fn timestamp_dominates_ordering() {
        let early = Ruid::from_components(10, Ruid::max_hardware_id(), Ruid::max_sequence());
        let late = Ruid::from_components(11, 0, 0);
        assert!(early < late);

        let first = Ruid::from_components(10, 3, 4);
        let second = Ruid::from_components(10, 3, 5);
        assert!(first < second);
    }

    #[test]
    fn bytes_are_little_endian() {
        let id = Ruid::from_raw(0x0102_0304_0506_0708);
        assert_eq!(id.to_le_bytes(), [8, 7, 6, 5, 4, 3, 2, 1]);
        assert_eq!(Ruid::try_from(&id.to_le_bytes()[..]), Ok(id));
    }

    #[test]
    fn bytes_reject_wrong_width() {
        assert_eq!(
            Ruid::try_from(&[0_u8; 9][..]),
            Err(DecodeError::InvalidLength {
                expected: 8,
                len: 9
            })
        );
    }

    #[test]
    fn display_and_from_str() {
        let id = Ruid::from_raw(0x0102_0304_0506_0708);
        let text = id.to_string();
        assert_eq!(text, "CAcGBQQDAgE");
        assert_eq!(text.parse::<Ruid>(), Ok(id));
    }

    #[test]
    fn zero_is_only_zero() {
        assert!(Ruid::ZERO.is_zero());
        assert!(!Ruid::from_raw(1).is_zero());
        assert_eq!(<Ruid as Id>::ZERO, Ruid::ZERO);
    }

    #[test]
    fn self_hash_is_identity() {
        let id = Ruid::from_raw(42);
        assert_eq!(id.self_hash(), id);
    }

    #[test]
    fn debug_shows_fields() {
        let id = Ruid::from_components(5, 6, 7);
        let debug = format!("{id:?}");
        assert!(debug.contains("timestamp: 5"));
        assert!(debug.contains("hardware_id: 6"));
        assert!(debug.contains("sequence: 7"));
    }
}
