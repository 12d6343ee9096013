mod interface;
mod primitive;
mod ruid;

pub use interface::*;
pub use ruid::*;
