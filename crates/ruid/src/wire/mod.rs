//! Fixed-width binary form for external serialization protocols.
//!
//! A protocol that frames IDs asks for [`WireFormat::byte_size`], then calls
//! [`WireFormat::write_to`] into a byte sink or [`WireFormat::read_from`]
//! from a byte source. The bytes are exactly [`Id::to_bytes`], so IDs written
//! here can be read back through [`Id::from_bytes`] and vice versa.

use bytes::{Buf, BufMut};

use crate::{DecodeError, Id};

/// Byte-sink/byte-source glue for fixed-width IDs.
pub trait WireFormat: Sized {
    /// Exact number of bytes written and read.
    const WIRE_SIZE: usize;

    fn byte_size(&self) -> usize {
        Self::WIRE_SIZE
    }

    /// Writes the binary form into `buf`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShortBuffer`] if `buf` cannot take
    /// [`WireFormat::WIRE_SIZE`] more bytes. Nothing is written in that case.
    fn write_to<B: BufMut>(&self, buf: &mut B) -> Result<(), DecodeError>;

    /// Reads the binary form from `buf`, advancing it by
    /// [`WireFormat::WIRE_SIZE`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::ShortBuffer`] if fewer bytes remain. `buf` is
    /// left untouched in that case.
    fn read_from<B: Buf>(buf: &mut B) -> Result<Self, DecodeError>;
}

impl<ID: Id> WireFormat for ID {
    const WIRE_SIZE: usize = <ID as Id>::BYTE_SIZE;

    fn write_to<B: BufMut>(&self, buf: &mut B) -> Result<(), DecodeError> {
        if buf.remaining_mut() < Self::WIRE_SIZE {
            return Err(DecodeError::ShortBuffer {
                needed: Self::WIRE_SIZE,
                remaining: buf.remaining_mut(),
            });
        }
        buf.put_slice(self.to_bytes().as_ref());
        Ok(())
    }

    fn read_from<B: Buf>(buf: &mut B) -> Result<Self, DecodeError> {
        if buf.remaining() < Self::WIRE_SIZE {
            return Err(DecodeError::ShortBuffer {
                needed: Self::WIRE_SIZE,
                remaining: buf.remaining(),
            });
        }
        let mut bytes = ID::Bytes::default();
        buf.copy_to_slice(bytes.as_mut());
        ID::from_bytes(bytes.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use bytes::{BufMut, BytesMut};

    use super::*;
    use crate::Ruid;

    #[test]
    fn byte_size_is_eight_for_ruid() {
        assert_eq!(Ruid::ZERO.byte_size(), 8);
        assert_eq!(<Ruid as WireFormat>::WIRE_SIZE, 8);
        assert_eq!(<u128 as WireFormat>::WIRE_SIZE, 16);
    }

    #[test]
    fn wire_form_matches_to_bytes() {
        let id = Ruid::from_raw(0x0102_0304_0506_0708);
        let mut buf = BytesMut::new();
        id.write_to(&mut buf).unwrap();
        assert_eq!(&buf[..], &id.to_le_bytes()[..]);
    }

    #[test]
    fn reads_consecutive_ids_from_one_frame() {
        let ids = [Ruid::from_raw(1), Ruid::from_raw(u64::MAX), Ruid::from_raw(7)];
        let mut frame = Vec::new();
        frame.put_u8(0xAA);
        for id in &ids {
            id.write_to(&mut frame).unwrap();
        }

        let mut src = &frame[..];
        assert_eq!(src.get_u8(), 0xAA);
        for id in &ids {
            assert_eq!(Ruid::read_from(&mut src).unwrap(), *id);
        }
        assert!(!src.has_remaining());
    }

    #[test]
    fn read_from_short_buffer_is_an_error() {
        let mut src = &[1_u8, 2, 3][..];
        assert_eq!(
            Ruid::read_from(&mut src),
            Err(DecodeError::ShortBuffer {
                needed: 8,
                remaining: 3
            })
        );
        assert_eq!(src.remaining(), 3);
    }

    #[test]
    fn write_to_full_slice_is_an_error() {
        let mut storage = [0_u8; 4];
        let mut sink = &mut storage[..];
        assert_eq!(
            Ruid::from_raw(9).write_to(&mut sink),
            Err(DecodeError::ShortBuffer {
                needed: 8,
                remaining: 4
            })
        );
        assert_eq!(storage, [0; 4]);
    }
}
