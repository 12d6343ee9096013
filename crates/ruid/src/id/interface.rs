use core::{fmt, hash::Hash};

use crate::DecodeError;

/// The capability set the ring and the codecs need from an identifier.
///
/// An `Id` is a fixed-width value with a strict total order that can be
/// encoded to and decoded from exactly [`Id::BYTE_SIZE`] bytes. The byte order
/// is fixed per type and shared by every encoding in this crate (bytes, base64
/// text and the wire form).
///
/// The 64-bit [`Ruid`] layout is the default implementation; `u64` and `u128`
/// are provided so the ring can run over other widths.
///
/// [`Ruid`]: crate::Ruid
pub trait Id: Copy + Ord + Eq + Hash + fmt::Debug + Send + Sync + 'static {
    /// Scalar backing the ID (typically `u64` or `u128`).
    type Ty: Copy + Ord + fmt::Debug + fmt::Display;

    /// Fixed-width byte form, `BYTE_SIZE` bytes long.
    type Bytes: AsRef<[u8]> + AsMut<[u8]> + Default + Copy + fmt::Debug;

    /// Width of the binary form in bytes.
    const BYTE_SIZE: usize;

    /// The reserved sentinel. Generators never produce it.
    const ZERO: Self;

    /// Converts this type into its raw scalar representation.
    fn to_raw(&self) -> Self::Ty;

    /// Converts a raw scalar into this type.
    fn from_raw(raw: Self::Ty) -> Self;

    /// Encodes into the fixed-width byte form.
    fn to_bytes(&self) -> Self::Bytes;

    /// Decodes from exactly [`Id::BYTE_SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::InvalidLength`] for any other length.
    fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError>;

    /// Returns `true` only for [`Id::ZERO`].
    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Hash of a value that already lives in ID space.
    ///
    /// Identity for fixed-width integer layouts. It exists so lookups can
    /// treat an ID and a digest-derived placement key the same way.
    fn self_hash(&self) -> Self {
        *self
    }

    /// Chunks `bytes` into as many whole IDs as fit, in order.
    ///
    /// A 16-byte digest yields two 64-bit IDs or one 128-bit ID; a trailing
    /// partial chunk is ignored.
    fn extract_ids(bytes: &[u8]) -> impl Iterator<Item = Self> + '_ {
        bytes
            .chunks_exact(Self::BYTE_SIZE)
            .filter_map(|chunk| Self::from_bytes(chunk).ok())
    }
}

/// A source of identifiers of one [`Id`] type.
///
/// Mints new IDs, knows the zero value, and turns an arbitrary byte buffer
/// (typically a digest) into placement points.
pub trait IdFactory {
    /// The ID type produced.
    type Id: Id;

    /// Mints a fresh, never-zero ID.
    fn new_id(&self) -> Self::Id;

    /// The reserved zero ID.
    fn zero(&self) -> Self::Id {
        <Self::Id as Id>::ZERO
    }

    /// Extracts zero or more IDs from `bytes`. See [`Id::extract_ids`].
    fn extract_ids(&self, bytes: &[u8]) -> Vec<Self::Id> {
        <Self::Id as Id>::extract_ids(bytes).collect()
    }
}
