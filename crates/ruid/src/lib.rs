#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod base64;
mod error;
pub mod generator;
pub mod hardware;
pub mod id;
pub mod rand;
pub mod ring;
#[cfg_attr(docsrs, doc(cfg(feature = "serde")))]
#[cfg(feature = "serde")]
pub mod serde;
pub mod time;
pub mod wire;

pub use crate::base64::Base64Ext;
pub use crate::error::*;
pub use crate::generator::{IdGenStatus, RuidGenerator, generator, new};
pub use crate::id::{Id, IdFactory, Ruid};
pub use crate::ring::{Md5Hasher, PlacementHasher, Ring, RingConfig, SharedRing};
pub use crate::wire::WireFormat;
