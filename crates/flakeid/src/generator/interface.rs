use core::time::Duration;
use std::time::SystemTime;

use crate::{Error, IdBuilder, Mode, Precision, Result, TimeSource, Timer};

/// The capability shared by [`AtomicIdGenerator`] and [`LockIdGenerator`].
///
/// Both variants hand out the same IDs for the same clock readings; they
/// differ only in how concurrent callers are coordinated.
///
/// # Example
/// ```
/// use flakeid::{AtomicIdGenerator, Config, IdGenerator, LockIdGenerator, SystemClock};
///
/// fn issue(generator: &dyn IdGenerator<Time = SystemClock>) -> u64 {
///     generator.generate().unwrap()
/// }
///
/// let atomic = AtomicIdGenerator::new(Config::default()).unwrap();
/// let lock = LockIdGenerator::new(Config::default().with_host(1)).unwrap();
/// assert_ne!(issue(&atomic), issue(&lock));
/// ```
///
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
/// [`LockIdGenerator`]: crate::LockIdGenerator
pub trait IdGenerator {
    /// The clock the generator reads.
    type Time: TimeSource;

    /// The layout IDs are packed with.
    fn builder(&self) -> &IdBuilder;

    /// The timer converting clock readings into timestamps.
    fn timer(&self) -> &Timer<Self::Time>;

    /// Generates the next ID.
    ///
    /// Blocks only when the sequence space of the current time slice is
    /// exhausted, until the clock moves on to the next slice.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] once the clock passes the last
    ///   timestamp the layout can hold.
    /// - [`Error::InstantBeforeEpoch`] while the clock reads earlier than the
    ///   epoch.
    /// - `Error::LockPoisoned` from [`LockIdGenerator`] if a thread panicked
    ///   while holding the lock (std mutex only).
    ///
    /// [`LockIdGenerator`]: crate::LockIdGenerator
    fn generate(&self) -> Result<u64>;

    /// Retires the current time slice.
    ///
    /// The next call to [`IdGenerator::generate`] starts at sequence 0 of a
    /// later slice, waiting for the clock if it still reads the retired one.
    /// No ID issued before the reset is issued again.
    ///
    /// # Errors
    ///
    /// Only fails if the generator's lock is poisoned.
    fn reset(&self) -> Result<()>;

    /// Packs an explicit instant and sequence, bypassing the clock and the
    /// generator's state.
    ///
    /// Uniqueness of the result is the caller's responsibility. Intended for
    /// backfills and deterministic tests.
    ///
    /// # Errors
    ///
    /// - [`Error::SequenceOverflow`] if `sequence` exceeds the layout.
    /// - [`Error::InstantBeforeEpoch`] if `instant` precedes the epoch.
    /// - [`Error::TimestampOverflow`] if `instant` is past the layout's
    ///   lifetime.
    fn generate_at(&self, instant: SystemTime, sequence: u64) -> Result<u64> {
        let builder = self.builder();
        if sequence > builder.max_sequence() {
            return Err(Error::SequenceOverflow {
                sequence,
                max: builder.max_sequence(),
            });
        }
        let timestamp = self.timer().timestamp(instant)?;
        builder.build(timestamp, sequence)
    }

    fn mode(&self) -> Mode {
        self.builder().mode()
    }

    fn precision(&self) -> Precision {
        self.builder().precision()
    }

    fn host(&self) -> u64 {
        self.builder().host()
    }

    fn epoch(&self) -> Duration {
        self.timer().epoch()
    }
}
