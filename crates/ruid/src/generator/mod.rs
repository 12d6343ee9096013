mod global;
mod ruid;
mod status;

pub use global::*;
pub use ruid::*;
pub use status::*;
