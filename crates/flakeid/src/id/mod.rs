mod builder;
mod decoded;
mod mode;
mod precision;

pub use builder::*;
pub use decoded::*;
pub use mode::*;
pub use precision::*;

/// Width of the host field.
pub const HOST_BITS: u32 = 9;

/// Largest host ID that fits in [`HOST_BITS`].
pub const HOST_MAX: u64 = (1 << HOST_BITS) - 1;

/// Width of the generation mode flag.
pub const MODE_BITS: u32 = 1;

/// Width of the precision flag.
pub const PRECISION_BITS: u32 = 1;
