use crate::DecodeError;

const ALPHABET: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";
const NO_VALUE: u8 = 255;
const BITS_PER_CHAR: usize = 6;

/// Lookup table for URL-safe base64 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0;
    while i < 64 {
        lut[ALPHABET[i] as usize] = i as u8;
        i += 1;
    }
    lut
};

/// Number of characters needed to encode `bytes` bytes without padding.
pub const fn base64_len(bytes: usize) -> usize {
    (bytes * 8).div_ceil(BITS_PER_CHAR)
}

/// Encodes `input` as unpadded URL-safe base64 into `buf`.
///
/// `buf` must be exactly [`base64_len`]`(input.len())` bytes long. Bits are
/// consumed most significant first; the final character is zero-filled on the
/// right.
pub fn encode_base64(input: &[u8], buf: &mut [u8]) {
    debug_assert_eq!(buf.len(), base64_len(input.len()));
    let mut acc = 0_u16;
    let mut bits = 0;
    let mut out = 0;

    for &b in input {
        acc = (acc << 8) | u16::from(b);
        bits += 8;
        while bits >= BITS_PER_CHAR {
            bits -= BITS_PER_CHAR;
            buf[out] = ALPHABET[usize::from((acc >> bits) & 0x3F)];
            out += 1;
        }
        acc &= (1 << bits) - 1;
    }

    if bits > 0 {
        buf[out] = ALPHABET[usize::from((acc << (BITS_PER_CHAR - bits)) & 0x3F)];
    }
}

/// Decodes unpadded URL-safe base64 from `encoded` into `out`.
///
/// # Errors
///
/// - [`DecodeError::InvalidLength`] if `encoded` is not exactly
///   [`base64_len`]`(out.len())` characters
/// - [`DecodeError::InvalidAscii`] for a character outside the alphabet
/// - [`DecodeError::NonCanonical`] if the final character sets bits past the
///   end of `out`
pub fn decode_base64(encoded: &str, out: &mut [u8]) -> Result<(), DecodeError> {
    let expected = base64_len(out.len());
    if encoded.len() != expected {
        return Err(DecodeError::InvalidLength {
            expected,
            len: encoded.len(),
        });
    }

    let mut acc = 0_u16;
    let mut bits = 0;
    let mut written = 0;
    let mut last = 0;

    for (index, byte) in encoded.bytes().enumerate() {
        let val = LOOKUP[usize::from(byte)];
        if val == NO_VALUE {
            return Err(DecodeError::InvalidAscii { byte, index });
        }
        last = byte;
        acc = (acc << BITS_PER_CHAR) | u16::from(val);
        bits += BITS_PER_CHAR;
        if bits >= 8 {
            bits -= 8;
            out[written] = (acc >> bits) as u8;
            written += 1;
            acc &= (1 << bits) - 1;
        }
    }

    // Whatever is left over is padding and must be zero.
    if acc != 0 {
        return Err(DecodeError::NonCanonical { byte: last });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(input: &[u8]) -> String {
        let mut buf = vec![0; base64_len(input.len())];
        encode_base64(input, &mut buf);
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn lengths() {
        assert_eq!(base64_len(1), 2);
        assert_eq!(base64_len(3), 4);
        assert_eq!(base64_len(8), 11);
        assert_eq!(base64_len(16), 22);
    }

    #[test]
    fn matches_reference_vectors() {
        // RFC 4648 test vectors with padding stripped
        assert_eq!(encode(b"f"), "Zg");
        assert_eq!(encode(b"fo"), "Zm8");
        assert_eq!(encode(b"foo"), "Zm9v");
        assert_eq!(encode(b"foob"), "Zm9vYg");
        assert_eq!(encode(b"fooba"), "Zm9vYmE");
        assert_eq!(encode(b"foobar"), "Zm9vYmFy");
    }

    #[test]
    fn uses_url_safe_alphabet() {
        assert_eq!(encode(&[0xFB, 0xFF]), "-_8");
        assert_eq!(encode(&[0xFF; 8]), "__________8");
    }

    #[test]
    fn decodes_reference_vectors() {
        let mut out = [0_u8; 6];
        decode_base64("Zm9vYmFy", &mut out).unwrap();
        assert_eq!(&out, b"foobar");

        let mut out = [0_u8; 2];
        decode_base64("-_8", &mut out).unwrap();
        assert_eq!(out, [0xFB, 0xFF]);
    }

    #[test]
    fn rejects_wrong_length() {
        let mut out = [0_u8; 8];
        assert_eq!(
            decode_base64("AAAA", &mut out),
            Err(DecodeError::InvalidLength {
                expected: 11,
                len: 4
            })
        );
    }

    #[test]
    fn rejects_standard_alphabet_and_padding() {
        let mut out = [0_u8; 8];
        assert_eq!(
            decode_base64("AAAAA+AAAAA", &mut out),
            Err(DecodeError::InvalidAscii {
                byte: b'+',
                index: 5
            })
        );
        assert_eq!(
            decode_base64("AAAAAAAAAA=", &mut out),
            Err(DecodeError::InvalidAscii {
                byte: b'=',
                index: 10
            })
        );
    }

    #[test]
    fn rejects_non_canonical_tail() {
        // '9' is 61 = 0b111101: the two low bits fall past the 64th bit.
        let mut out = [0_u8; 8];
        assert_eq!(
            decode_base64("__________9", &mut out),
            Err(DecodeError::NonCanonical { byte: b'9' })
        );
    }

    #[test]
    fn rejects_multibyte_utf8() {
        let mut out = [0_u8; 8];
        let err = decode_base64("AAAAAAAAAé", &mut out).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidAscii { index: 9, .. }));
    }
}
