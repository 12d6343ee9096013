mod config;
mod hasher;
mod lock;
#[allow(clippy::module_inception)]
mod ring;
mod shared;

pub use config::*;
pub use hasher::*;
pub use ring::*;
pub use shared::*;
