use core::{fmt, str::FromStr, time::Duration};

use crate::{Error, HOST_BITS, MODE_BITS, PRECISION_BITS};

/// Timestamp bits used by [`Precision::Millisecond`].
pub const TIMESTAMP_BITS_IN_MILLISECOND: u32 = 41;

/// Sequence bits used by [`Precision::Millisecond`].
pub const SEQUENCE_BITS_IN_MILLISECOND: u32 = 12;

/// Timestamp bits used by [`Precision::Second`].
pub const TIMESTAMP_BITS_IN_SECOND: u32 = 31;

/// Sequence bits used by [`Precision::Second`].
pub const SEQUENCE_BITS_IN_SECOND: u32 = 22;

const _: () = {
    let fixed = MODE_BITS + PRECISION_BITS + HOST_BITS;
    assert!(fixed + TIMESTAMP_BITS_IN_MILLISECOND + SEQUENCE_BITS_IN_MILLISECOND == 64);
    assert!(fixed + TIMESTAMP_BITS_IN_SECOND + SEQUENCE_BITS_IN_SECOND == 64);
};

/// The unit a timestamp is counted in.
///
/// Precision fixes the widths of the timestamp and sequence fields and the
/// pause between clock polls while waiting for the next time slice.
///
/// | precision     | timestamp bits | sequence bits | poll interval |
/// |---------------|----------------|---------------|---------------|
/// | `Millisecond` | 41             | 12            | 1 ms          |
/// | `Second`      | 31             | 22            | 500 ms        |
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Precision {
    /// ~69 years of lifetime, 4096 IDs per millisecond per host.
    Millisecond,
    /// ~68 years of lifetime, 4194304 IDs per second per host.
    #[default]
    Second,
}

impl Precision {
    /// Width of the timestamp field.
    pub const fn timestamp_bits(self) -> u32 {
        match self {
            Self::Millisecond => TIMESTAMP_BITS_IN_MILLISECOND,
            Self::Second => TIMESTAMP_BITS_IN_SECOND,
        }
    }

    /// Width of the sequence field.
    pub const fn sequence_bits(self) -> u32 {
        match self {
            Self::Millisecond => SEQUENCE_BITS_IN_MILLISECOND,
            Self::Second => SEQUENCE_BITS_IN_SECOND,
        }
    }

    /// Largest timestamp the layout can hold, `2^T - 1`.
    pub const fn max_timestamp(self) -> u64 {
        (1 << self.timestamp_bits()) - 1
    }

    /// Largest sequence the layout can hold, `2^S - 1`.
    pub const fn max_sequence(self) -> u64 {
        (1 << self.sequence_bits()) - 1
    }

    /// How long to sleep between clock polls while waiting for a new slice.
    pub const fn wait_duration(self) -> Duration {
        match self {
            Self::Millisecond => Duration::from_millis(1),
            Self::Second => Duration::from_millis(500),
        }
    }

    /// Milliseconds per timestamp unit.
    pub const fn millis_per_unit(self) -> u64 {
        match self {
            Self::Millisecond => 1,
            Self::Second => 1000,
        }
    }

    /// The value of the precision flag for this precision.
    pub const fn bit(self) -> u64 {
        match self {
            Self::Millisecond => 0,
            Self::Second => 1,
        }
    }

    /// Inverse of [`Precision::bit`]. Only the lowest bit is inspected.
    pub const fn from_bit(bit: u64) -> Self {
        if bit & 1 == 0 {
            Self::Millisecond
        } else {
            Self::Second
        }
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
        })
    }
}

impl FromStr for Precision {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "millisecond" | "milliseconds" | "millis" | "ms" => Ok(Self::Millisecond),
            "second" | "seconds" | "sec" | "s" => Ok(Self::Second),
            _ => Err(Error::InvalidPrecision(s.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_widths_fill_the_word() {
        for precision in [Precision::Millisecond, Precision::Second] {
            assert_eq!(precision.timestamp_bits() + precision.sequence_bits(), 53);
        }
        assert_eq!(Precision::Millisecond.max_timestamp(), (1 << 41) - 1);
        assert_eq!(Precision::Millisecond.max_sequence(), 4095);
        assert_eq!(Precision::Second.max_timestamp(), (1 << 31) - 1);
        assert_eq!(Precision::Second.max_sequence(), (1 << 22) - 1);
    }

    #[test]
    fn parses_aliases() {
        assert_eq!("ms".parse::<Precision>(), Ok(Precision::Millisecond));
        assert_eq!("Second".parse::<Precision>(), Ok(Precision::Second));
        assert!(matches!(
            "minute".parse::<Precision>(),
            Err(Error::InvalidPrecision(_))
        ));
    }

    #[test]
    fn flag_round_trips() {
        for precision in [Precision::Millisecond, Precision::Second] {
            assert_eq!(Precision::from_bit(precision.bit()), precision);
            assert_eq!(precision.to_string().parse::<Precision>(), Ok(precision));
        }
    }
}
