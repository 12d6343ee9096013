use crate::{DecodeError, Id};

macro_rules! impl_id_for_uint {
    ($($ty:ty),*) => {$(
        impl Id for $ty {
            type Ty = $ty;
            type Bytes = [u8; core::mem::size_of::<$ty>()];

            const BYTE_SIZE: usize = core::mem::size_of::<$ty>();
            const ZERO: Self = 0;

            fn to_raw(&self) -> Self::Ty {
                *self
            }

            fn from_raw(raw: Self::Ty) -> Self {
                raw
            }

            fn to_bytes(&self) -> Self::Bytes {
                self.to_le_bytes()
            }

            fn from_bytes(bytes: &[u8]) -> Result<Self, DecodeError> {
                let bytes: Self::Bytes =
                    bytes.try_into().map_err(|_| DecodeError::InvalidLength {
                        expected: Self::BYTE_SIZE,
                        len: bytes.len(),
                    })?;
                Ok(Self::from_le_bytes(bytes))
            }
        }
    )*};
}

impl_id_for_uint!(u64, u128);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_yields_one_u128_or_two_u64() {
        let digest: [u8; 16] = core::array::from_fn(|i| i as u8);

        let wide: Vec<u128> = u128::extract_ids(&digest).collect();
        assert_eq!(wide, vec![u128::from_le_bytes(digest)]);

        let narrow: Vec<u64> = u64::extract_ids(&digest).collect();
        assert_eq!(narrow.len(), 2);
        assert_eq!(narrow[0], 0x0706_0504_0302_0100);
        assert_eq!(narrow[1], 0x0f0e_0d0c_0b0a_0908);
    }

    #[test]
    fn short_buffer_yields_nothing() {
        assert_eq!(u64::extract_ids(&[1, 2, 3]).count(), 0);
        assert_eq!(u128::extract_ids(&[0; 15]).count(), 0);
    }

    #[test]
    fn from_bytes_rejects_wrong_width() {
        assert_eq!(
            u64::from_bytes(&[0; 7]),
            Err(DecodeError::InvalidLength {
                expected: 8,
                len: 7
            })
        );
    }
}
