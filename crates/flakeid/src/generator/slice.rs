use crate::{SEQUENCE_BITS_IN_SECOND, TIMESTAMP_BITS_IN_MILLISECOND};

/// The last (timestamp, sequence) pair a generator handed out.
///
/// Packed into one `u64` so the lock-free generator can swap it with a
/// single compare-and-swap. The sequence slot is as wide as the widest
/// sequence field, which leaves room for the widest timestamp field.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct TimeSlice {
    pub(crate) timestamp: u64,
    pub(crate) sequence: u64,
}

const _: () = assert!(TIMESTAMP_BITS_IN_MILLISECOND + TimeSlice::SEQUENCE_BITS <= 64);

impl TimeSlice {
    const SEQUENCE_BITS: u32 = SEQUENCE_BITS_IN_SECOND;
    const SEQUENCE_MASK: u64 = (1 << Self::SEQUENCE_BITS) - 1;

    pub(crate) const fn new(timestamp: u64, sequence: u64) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }

    pub(crate) const fn to_raw(self) -> u64 {
        (self.timestamp << Self::SEQUENCE_BITS) | self.sequence
    }

    pub(crate) const fn from_raw(raw: u64) -> Self {
        Self {
            timestamp: raw >> Self::SEQUENCE_BITS,
            sequence: raw & Self::SEQUENCE_MASK,
        }
    }
}

/// Records a clock that reads earlier than the last allocated slice.
///
/// Not an error: the generators start a new slice at the earlier timestamp.
#[cold]
#[inline(never)]
pub(crate) fn clock_behind(_now: u64, _last: u64) {
    #[cfg(feature = "tracing")]
    tracing::warn!(
        now = _now,
        last = _last,
        "clock moved backwards, starting a new time slice"
    );
}
