mod interface;
mod url_safe;

pub use interface::*;
pub use url_safe::*;
