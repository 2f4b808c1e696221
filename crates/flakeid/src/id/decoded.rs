use core::fmt;

use crate::{Mode, Precision};

/// Every field of a packed ID, as returned by [`IdBuilder::decode`].
///
/// [`IdBuilder::decode`]: crate::IdBuilder::decode
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct DecodedId {
    pub mode: Mode,
    pub precision: Precision,
    pub host: u64,
    /// Units of `precision` since the generator epoch.
    pub timestamp: u64,
    pub sequence: u64,
}

impl fmt::Display for DecodedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "mode={} precision={} host={} timestamp={} sequence={}",
            self.mode, self.precision, self.host, self.timestamp, self.sequence
        )
    }
}
