use thiserror::Error;

/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Malformed textual or binary input handed to an ID decode path.
///
/// Decode errors are always recoverable: reject the input and carry on.
#[derive(Error, Clone, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input does not have the fixed width of the target ID.
    #[error("invalid length: expected {expected}, got {len}")]
    InvalidLength { expected: usize, len: usize },

    /// The input contains a byte outside the URL-safe base64 alphabet.
    #[error("invalid ascii byte {byte:#04x} at index {index}")]
    InvalidAscii { byte: u8, index: usize },

    /// The final character carries bits past the end of the ID. Accepting it
    /// would let two strings decode to the same ID.
    #[error("non-canonical trailing character {byte:#04x}")]
    NonCanonical { byte: u8 },

    /// A byte source ran out before a full ID could be read.
    #[error("short buffer: need {needed} bytes, {remaining} remaining")]
    ShortBuffer { needed: usize, remaining: usize },
}

/// All errors that `ruid` can produce.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// See [`DecodeError`].
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Two distinct node names hash to the same primary placement key.
    ///
    /// The ring refuses to build rather than silently hand one node's key to
    /// the other; the previously published table (if any) stays in place.
    #[error("ring nodes conflict on placement key {key}: {first:?} and {second:?}")]
    RingConflict {
        first: String,
        second: String,
        key: String,
    },

    /// The node weights would need more virtual replicas than
    /// [`RingConfig::max_replicas`](crate::RingConfig::max_replicas) allows.
    ///
    /// Checked before any hashing; the previously published table stays in
    /// place.
    #[error("ring needs {replicas} replicas, limit is {limit}")]
    RingTooLarge { replicas: u128, limit: u64 },

    /// A shared ring lock was poisoned by a panicking writer.
    ///
    /// Never produced when the `parking-lot` feature is enabled, since
    /// `parking_lot` locks do not poison.
    #[error("lock poisoned")]
    LockPoisoned,
}
