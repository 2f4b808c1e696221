use crate::{DecodedId, Error, HOST_BITS, HOST_MAX, Mode, Precision, Result};

/// Bit position of the mode flag.
const MODE_SHIFT: u32 = 63;

/// Packs and unpacks the five fields of an ID for one configuration.
///
/// ```text
///  Second precision (T = 31, S = 22):
///
///  Bit Index:  63     63 62            32 31            31 30    22 21             0
///              +--------+----------------+----------------+--------+---------------+
///  Field:      | mode   | timestamp (31) | precision (1)  | host   | sequence (22) |
///              +--------+----------------+----------------+--------+---------------+
///
///  Millisecond precision (T = 41, S = 12):
///
///  Bit Index:  63     63 62            22 21            21 20    12 11             0
///              +--------+----------------+----------------+--------+---------------+
///  Field:      | mode   | timestamp (41) | precision (1)  | host   | sequence (12) |
///              +--------+----------------+----------------+--------+---------------+
///              |<----------- MSB ------------ 64 bits ------------- LSB ------------>|
/// ```
///
/// In [`Mode::Spread`] the timestamp is bit-reversed within its `T`-bit field
/// before insertion. Reversal over a fixed width is its own inverse, so
/// [`IdBuilder::extract_timestamp`] restores the original value.
///
/// The top bit carries the mode flag, so IDs must be handled as `u64`.
/// Reinterpreting them as `i64` makes every [`Mode::Spread`] ID negative.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct IdBuilder {
    mode: Mode,
    precision: Precision,
    host: u64,
    timestamp_bits: u32,
    timestamp_shift: u32,
    precision_shift: u32,
    host_shift: u32,
    max_timestamp: u64,
    max_sequence: u64,
}

impl Default for IdBuilder {
    fn default() -> Self {
        Self::with_host_unchecked(Mode::default(), Precision::default(), 0)
    }
}

impl IdBuilder {
    /// Creates a builder for the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `host` does not fit in
    /// [`HOST_BITS`] bits.
    ///
    /// # Example
    /// ```
    /// use flakeid::{IdBuilder, Mode, Precision};
    ///
    /// let builder = IdBuilder::new(Mode::Sequential, Precision::Second, 317).unwrap();
    /// let id = builder.build(1_234_567, 2_836_423).unwrap();
    /// assert_eq!(id, 0x0012_d687_cf6b_47c7);
    /// assert_eq!(builder.extract_timestamp(id), 1_234_567);
    /// ```
    pub fn new(mode: Mode, precision: Precision, host: u64) -> Result<Self> {
        check_host(host)?;
        Ok(Self::with_host_unchecked(mode, precision, host))
    }

    const fn with_host_unchecked(mode: Mode, precision: Precision, host: u64) -> Self {
        let sequence_bits = precision.sequence_bits();
        let host_shift = sequence_bits;
        let precision_shift = host_shift + HOST_BITS;
        let timestamp_shift = precision_shift + 1;
        Self {
            mode,
            precision,
            host,
            timestamp_bits: precision.timestamp_bits(),
            timestamp_shift,
            precision_shift,
            host_shift,
            max_timestamp: precision.max_timestamp(),
            max_sequence: precision.max_sequence(),
        }
    }

    pub const fn mode(&self) -> Mode {
        self.mode
    }

    pub const fn precision(&self) -> Precision {
        self.precision
    }

    pub const fn host(&self) -> u64 {
        self.host
    }

    /// Largest timestamp [`IdBuilder::build`] accepts, `2^T - 1`.
    pub const fn max_timestamp(&self) -> u64 {
        self.max_timestamp
    }

    /// Largest sequence [`IdBuilder::build`] accepts, `2^S - 1`.
    pub const fn max_sequence(&self) -> u64 {
        self.max_sequence
    }

    /// Replaces the host stamped into subsequently built IDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `host` does not fit in
    /// [`HOST_BITS`] bits. The current host is left untouched.
    pub fn set_host(&mut self, host: u64) -> Result<()> {
        check_host(host)?;
        self.host = host;
        Ok(())
    }

    /// Packs a timestamp and sequence into an ID.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] if `timestamp > max_timestamp()`
    /// - [`Error::SequenceOverflow`] if `sequence > max_sequence()`
    ///
    /// Out-of-range values are never truncated into the field.
    pub fn build(&self, timestamp: u64, sequence: u64) -> Result<u64> {
        if timestamp > self.max_timestamp {
            return Err(Error::TimestampOverflow {
                timestamp,
                max: self.max_timestamp,
            });
        }
        if sequence > self.max_sequence {
            return Err(Error::SequenceOverflow {
                sequence,
                max: self.max_sequence,
            });
        }
        Ok(self.pack(timestamp, sequence))
    }

    /// Packs fields the caller has already range checked.
    #[inline]
    pub(crate) const fn pack(&self, timestamp: u64, sequence: u64) -> u64 {
        let timestamp = match self.mode {
            Mode::Sequential => timestamp,
            Mode::Spread => reverse_bits(timestamp, self.timestamp_bits),
        };
        (self.mode.bit() << MODE_SHIFT)
            | (timestamp << self.timestamp_shift)
            | (self.precision.bit() << self.precision_shift)
            | (self.host << self.host_shift)
            | sequence
    }

    /// Reads the mode flag stored in `id`.
    pub const fn extract_mode(&self, id: u64) -> Mode {
        Mode::from_bit(id >> MODE_SHIFT)
    }

    /// Reads the precision flag stored in `id`.
    pub const fn extract_precision(&self, id: u64) -> Precision {
        Precision::from_bit(id >> self.precision_shift)
    }

    pub const fn extract_host(&self, id: u64) -> u64 {
        (id >> self.host_shift) & HOST_MAX
    }

    /// Reads the timestamp of `id`, undoing the bit reversal when the mode
    /// flag stored in `id` says [`Mode::Spread`].
    pub const fn extract_timestamp(&self, id: u64) -> u64 {
        let raw = (id >> self.timestamp_shift) & self.max_timestamp;
        match self.extract_mode(id) {
            Mode::Sequential => raw,
            Mode::Spread => reverse_bits(raw, self.timestamp_bits),
        }
    }

    pub const fn extract_sequence(&self, id: u64) -> u64 {
        id & self.max_sequence
    }

    /// Unpacks every field of `id` at once.
    pub const fn decode(&self, id: u64) -> DecodedId {
        DecodedId {
            mode: self.extract_mode(id),
            precision: self.extract_precision(id),
            host: self.extract_host(id),
            timestamp: self.extract_timestamp(id),
            sequence: self.extract_sequence(id),
        }
    }
}

fn check_host(host: u64) -> Result<()> {
    if host > HOST_MAX {
        Err(Error::HostOutOfRange {
            host,
            max: HOST_MAX,
        })
    } else {
        Ok(())
    }
}

/// Reverses the lowest `width` bits of `value`. `width` must be in `1..=64`.
#[inline]
const fn reverse_bits(value: u64, width: u32) -> u64 {
    value.reverse_bits() >> (64 - width)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRECISIONS: [Precision; 2] = [Precision::Millisecond, Precision::Second];
    const MODES: [Mode; 2] = [Mode::Sequential, Mode::Spread];

    fn assert_fields(
        builder: &IdBuilder,
        id: u64,
        mode: Mode,
        precision: Precision,
        host: u64,
        timestamp: u64,
        sequence: u64,
    ) {
        assert_eq!(builder.extract_mode(id), mode);
        assert_eq!(builder.extract_precision(id), precision);
        assert_eq!(builder.extract_host(id), host);
        assert_eq!(builder.extract_timestamp(id), timestamp);
        assert_eq!(builder.extract_sequence(id), sequence);
    }

    #[test]
    fn sequential_second_layout() {
        // mode      = 0
        // timestamp = 0000000000100101101011010000111
        // precision = 1
        // host      = 100111101
        // sequence  = 1010110100011111000111
        let mut builder = IdBuilder::new(Mode::Sequential, Precision::Second, 317).unwrap();
        let id = 0b0_0000000000100101101011010000111_1_100111101_1010110100011111000111;
        assert_eq!(builder.build(1_234_567, 2_836_423), Ok(id));
        assert_fields(&builder, id, Mode::Sequential, Precision::Second, 317, 1_234_567, 2_836_423);

        builder.set_host(0b000111101).unwrap();
        let id = 0b0_0000000000100101101011010000111_1_000111101_1010110100011111000111;
        assert_eq!(builder.build(1_234_567, 2_836_423), Ok(id));
        assert_fields(&builder, id, Mode::Sequential, Precision::Second, 0b000111101, 1_234_567, 2_836_423);
    }

    #[test]
    fn spread_second_layout() {
        // timestamp 0000000000100101101011010000111
        // reversed  1110000101101011010010000000000
        let mut builder = IdBuilder::new(Mode::Spread, Precision::Second, 317).unwrap();
        let id = 0b1_1110000101101011010010000000000_1_100111101_1010110100011111000111;
        assert_eq!(builder.build(1_234_567, 2_836_423), Ok(id));
        assert_fields(&builder, id, Mode::Spread, Precision::Second, 317, 1_234_567, 2_836_423);

        builder.set_host(0b111110101).unwrap();
        let id = 0b1_1110000101101011010010000000000_1_111110101_1010110100011111000111;
        assert_eq!(builder.build(1_234_567, 2_836_423), Ok(id));
        assert_fields(&builder, id, Mode::Spread, Precision::Second, 0b111110101, 1_234_567, 2_836_423);
    }

    #[test]
    fn sequential_millisecond_layout() {
        let mut builder = IdBuilder::new(Mode::Sequential, Precision::Millisecond, 317).unwrap();
        let id = 0b0_00000000000000000000100101101011010000111_0_100111101_100001000101;
        assert_eq!(builder.build(1_234_567, 2117), Ok(id));
        assert_fields(&builder, id, Mode::Sequential, Precision::Millisecond, 317, 1_234_567, 2117);

        builder.set_host(0b100011101).unwrap();
        let id = 0b0_00000000000000000000100101101011010000111_0_100011101_100001000101;
        assert_eq!(builder.build(1_234_567, 2117), Ok(id));
        assert_fields(&builder, id, Mode::Sequential, Precision::Millisecond, 0b100011101, 1_234_567, 2117);
    }

    #[test]
    fn spread_millisecond_layout() {
        // timestamp 00000000000000000000100101101011010000111
        // reversed  11100001011010110100100000000000000000000
        let mut builder = IdBuilder::new(Mode::Spread, Precision::Millisecond, 317).unwrap();
        let id = 0b1_11100001011010110100100000000000000000000_0_100111101_100001000101;
        assert_eq!(builder.build(1_234_567, 2117), Ok(id));
        assert_fields(&builder, id, Mode::Spread, Precision::Millisecond, 317, 1_234_567, 2117);

        builder.set_host(0b100010011).unwrap();
        let id = 0b1_11100001011010110100100000000000000000000_0_100010011_100001000101;
        assert_eq!(builder.build(1_234_567, 2117), Ok(id));
        assert_fields(&builder, id, Mode::Spread, Precision::Millisecond, 0b100010011, 1_234_567, 2117);
    }

    #[test]
    fn constructor_exposes_configuration() {
        for mode in MODES {
            for precision in PRECISIONS {
                for host in [0, 1, 255, HOST_MAX] {
                    let builder = IdBuilder::new(mode, precision, host).unwrap();
                    assert_eq!(builder.mode(), mode);
                    assert_eq!(builder.precision(), precision);
                    assert_eq!(builder.host(), host);
                    assert_eq!(
                        builder.max_timestamp(),
                        (1 << precision.timestamp_bits()) - 1
                    );
                    assert_eq!(builder.max_sequence(), (1 << precision.sequence_bits()) - 1);
                }
            }
        }
    }

    #[test]
    fn rejects_host_outside_nine_bits() {
        assert_eq!(
            IdBuilder::new(Mode::Sequential, Precision::Second, 512),
            Err(Error::HostOutOfRange { host: 512, max: 511 })
        );

        let mut builder = IdBuilder::new(Mode::Spread, Precision::Millisecond, 7).unwrap();
        assert!(builder.set_host(1 << 20).is_err());
        assert_eq!(builder.host(), 7);
    }

    #[test]
    fn rejects_fields_that_do_not_fit() {
        for precision in PRECISIONS {
            let builder = IdBuilder::new(Mode::Sequential, precision, 0).unwrap();
            let max_ts = builder.max_timestamp();
            let max_seq = builder.max_sequence();

            assert!(builder.build(max_ts, max_seq).is_ok());
            assert_eq!(
                builder.build(max_ts + 1, 0),
                Err(Error::TimestampOverflow {
                    timestamp: max_ts + 1,
                    max: max_ts
                })
            );
            assert_eq!(
                builder.build(0, max_seq + 1),
                Err(Error::SequenceOverflow {
                    sequence: max_seq + 1,
                    max: max_seq
                })
            );
        }
    }

    #[test]
    fn every_field_survives_packing() {
        for mode in MODES {
            for precision in PRECISIONS {
                let builder = IdBuilder::new(mode, precision, 0b1_0101_0101).unwrap();
                let max_ts = builder.max_timestamp();
                let max_seq = builder.max_sequence();
                for timestamp in [0, 1, 2, 1_234_567, max_ts / 3, max_ts - 1, max_ts] {
                    for sequence in [0, 1, max_seq / 2, max_seq] {
                        let id = builder.build(timestamp, sequence).unwrap();
                        assert_fields(
                            &builder,
                            id,
                            mode,
                            precision,
                            0b1_0101_0101,
                            timestamp,
                            sequence,
                        );
                        assert_eq!(
                            builder.decode(id),
                            DecodedId {
                                mode,
                                precision,
                                host: 0b1_0101_0101,
                                timestamp,
                                sequence,
                            }
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn spread_scatters_adjacent_timestamps() {
        let builder = IdBuilder::new(Mode::Spread, Precision::Second, 0).unwrap();
        let a = builder.build(1, 0).unwrap();
        let b = builder.build(2, 0).unwrap();
        // Reversed, the lowest timestamp bit lands just below the mode flag.
        assert_eq!(a, (1 << 63) | (1 << 62) | (1 << 31));
        assert_eq!(b, (1 << 63) | (1 << 61) | (1 << 31));
        assert!(a > b);
    }

    #[test]
    fn reversal_is_an_involution() {
        for width in [1, 12, 31, 41, 64] {
            for value in [0_u64, 1, 0b1011, 1_234_567, u64::MAX] {
                let value = if width == 64 {
                    value
                } else {
                    value & ((1 << width) - 1)
                };
                assert_eq!(reverse_bits(reverse_bits(value, width), width), value);
            }
        }
        assert_eq!(reverse_bits(1, 31), 1 << 30);
    }
}
