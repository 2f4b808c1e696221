use core::{fmt, str::FromStr};

use crate::Error;

/// How the timestamp field is laid out inside a packed ID.
///
/// Stored in the most significant bit of every ID, so any consumer can tell
/// the two layouts apart without out-of-band configuration.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Mode {
    /// Timestamp bits are stored in natural order. IDs from one generator
    /// sort the same way as the time they were issued.
    #[default]
    Sequential,
    /// Timestamp bits are reversed within their field. Ordering is lost in
    /// exchange for an even spread of raw values, which avoids hot
    /// partitions in range-sharded stores.
    Spread,
}

impl Mode {
    /// The value of the mode flag for this mode.
    pub const fn bit(self) -> u64 {
        match self {
            Self::Sequential => 0,
            Self::Spread => 1,
        }
    }

    /// Inverse of [`Mode::bit`]. Only the lowest bit is inspected.
    pub const fn from_bit(bit: u64) -> Self {
        if bit & 1 == 0 {
            Self::Sequential
        } else {
            Self::Spread
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Sequential => "sequential",
            Self::Spread => "spread",
        })
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Ok(Self::Sequential),
            "spread" => Ok(Self::Spread),
            _ => Err(Error::InvalidMode(s.to_owned())),
        }
    }
}
