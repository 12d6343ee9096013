mod interface;
mod mono_clock;
mod wall_clock;

pub use interface::*;
pub use mono_clock::*;
pub use wall_clock::*;

use core::time::Duration;

/// Default epoch: Wednesday, January 1, 2025 00:00:00 UTC
///
/// 41 bits of milliseconds cover roughly 69 years from here.
pub const CUSTOM_EPOCH: Duration = Duration::from_millis(1_735_689_600_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC
///
/// 41 bits of milliseconds since 1970 run out in September 2039.
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);
