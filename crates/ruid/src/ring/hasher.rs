use md5::{Digest, Md5};

/// Deterministic 128-bit digest used to place nodes on the ring.
///
/// The digest must be stable across runs and platforms: two rings built from
/// the same membership must produce identical placement tables.
pub trait PlacementHasher {
    fn digest(&self, input: &[u8]) -> [u8; 16];
}

/// MD5 placement, the classic ketama choice. Used for distribution only, not
/// for any security property.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Md5Hasher;

impl PlacementHasher for Md5Hasher {
    fn digest(&self, input: &[u8]) -> [u8; 16] {
        let mut out = [0_u8; 16];
        out.copy_from_slice(&Md5::digest(input));
        out
    }
}
