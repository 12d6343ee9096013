use crate::{DecodeError, Id};

use super::{base64_len, decode_base64, encode_base64};

/// Extension trait giving every [`Id`] a reversible, URL-safe text form.
///
/// The text is the unpadded URL-safe base64 encoding (`A-Z a-z 0-9 - _`) of
/// the ID's fixed-width byte form, so `decode(encode(x)) == x` for every `x`
/// and the text form agrees with [`Id::to_bytes`] byte for byte.
///
/// # Example
///
/// ```
/// use ruid::{Base64Ext, Ruid};
///
/// let id = Ruid::from_raw(42);
/// assert_eq!(id.encode(), "KgAAAAAAAAA");
/// assert_eq!(Ruid::decode("KgAAAAAAAAA").unwrap(), id);
/// ```
pub trait Base64Ext: Id {
    /// Number of characters in the text form.
    const ENCODED_LEN: usize = base64_len(Self::BYTE_SIZE);

    /// Encodes this ID into a [`String`].
    fn encode(&self) -> String {
        let bytes = self.to_bytes();
        let mut buf = vec![0_u8; Self::ENCODED_LEN];
        encode_base64(bytes.as_ref(), &mut buf);
        buf.into_iter().map(char::from).collect()
    }

    /// Decodes the text form back into an ID.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the input has the wrong length, contains
    /// a character outside the alphabet, or is not the canonical encoding.
    fn decode(s: &str) -> Result<Self, DecodeError> {
        let mut bytes = Self::Bytes::default();
        decode_base64(s, bytes.as_mut())?;
        Self::from_bytes(bytes.as_ref())
    }
}

impl<ID: Id> Base64Ext for ID {}

#[cfg(test)]
mod tests {
    use crate::{Base64Ext, DecodeError, Ruid};

    #[test]
    fn ruid_zero_and_max() {
        assert_eq!(Ruid::ZERO.encode(), "AAAAAAAAAAA");
        assert_eq!(Ruid::MAX.encode(), "__________8");
        assert_eq!(Ruid::decode("AAAAAAAAAAA"), Ok(Ruid::ZERO));
        assert_eq!(Ruid::decode("__________8"), Ok(Ruid::MAX));
    }

    #[test]
    fn encode_agrees_with_display() {
        let id = Ruid::from_components(123_456, 789, 1011);
        assert_eq!(id.encode(), id.to_string());
    }

    #[test]
    fn wide_ids_use_22_chars() {
        let id = u128::MAX - 7;
        let text = id.encode();
        assert_eq!(text.len(), 22);
        assert_eq!(u128::decode(&text), Ok(id));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(
            Ruid::decode(""),
            Err(DecodeError::InvalidLength { len: 0, .. })
        ));
        assert!(matches!(
            Ruid::decode("AAAAAAAAAA!"),
            Err(DecodeError::InvalidAscii { byte: b'!', .. })
        ));
    }
}
