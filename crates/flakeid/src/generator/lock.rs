#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Config, DEFAULT_EPOCH, Error, IdBuilder, IdGenerator, Precision, Result, SystemClock,
    TimeSource, Timer,
    generator::{
        Mutex, MutexGuard,
        slice::{TimeSlice, clock_behind},
    },
};

/// A lock-based ID generator suitable for multi-threaded environments.
///
/// The last allocated (timestamp, sequence) pair is guarded by a [`Mutex`]
/// held across the whole read-modify-write, including any wait for the next
/// time slice. Callers are therefore served strictly one after another, and
/// the order sequences are assigned in is a total order across threads.
///
/// The lock is a `std::sync::Mutex` by default and a `parking_lot::Mutex`
/// with the `parking-lot` feature.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Allocation order is serialized across threads
/// - ❌ Every waiter queues behind a caller sleeping through a slice rollover
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support atomics
///
/// ## See Also
/// - [`AtomicIdGenerator`]
///
/// [`AtomicIdGenerator`]: crate::AtomicIdGenerator
#[derive(Debug)]
pub struct LockIdGenerator<T = SystemClock> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<Mutex<TimeSlice>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Mutex<TimeSlice>,
    builder: IdBuilder,
    timer: Timer<T>,
}

impl LockIdGenerator<SystemClock> {
    /// Creates a generator reading the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `config.host` does not fit in the
    /// host field.
    ///
    /// # Example
    /// ```
    /// use flakeid::{Config, LockIdGenerator, Mode};
    ///
    /// let generator = LockIdGenerator::new(Config::default().with_mode(Mode::Spread)).unwrap();
    ///
    /// let id = generator.generate().unwrap();
    /// assert_eq!(generator.builder().extract_mode(id), Mode::Spread);
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        Self::with_time_source(config, SystemClock)
    }
}

impl Default for LockIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::from_parts(
            IdBuilder::default(),
            Timer::new(Precision::default(), DEFAULT_EPOCH),
        )
    }
}

impl<T: TimeSource> LockIdGenerator<T> {
    /// Creates a generator reading from a custom [`TimeSource`].
    ///
    /// The time slice starts at timestamp 0, sequence 0.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `config.host` does not fit in the
    /// host field.
    pub fn with_time_source(config: Config, time: T) -> Result<Self> {
        config.validate()?;
        let builder = IdBuilder::new(config.mode, config.precision, config.host)?;
        let timer = Timer::with_time_source(config.precision, config.epoch, time);
        Ok(Self::from_parts(builder, timer))
    }

    fn from_parts(builder: IdBuilder, timer: Timer<T>) -> Self {
        let slice = TimeSlice::default();
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(Mutex::new(slice)),
            #[cfg(not(feature = "cache-padded"))]
            state: Mutex::new(slice),
            builder,
            timer,
        }
    }

    /// Replaces the host stamped into subsequent IDs.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `host` does not fit in the host
    /// field.
    pub fn set_host(&mut self, host: u64) -> Result<()> {
        self.builder.set_host(host)
    }

    pub const fn builder(&self) -> &IdBuilder {
        &self.builder
    }

    pub const fn timer(&self) -> &Timer<T> {
        &self.timer
    }

    /// Generates the next ID.
    ///
    /// Within one time slice the sequence counts up from 0. When it would
    /// pass the maximum, the caller sleeps (still holding the lock) until the
    /// clock reaches the next slice and takes sequence 0 there. A clock
    /// reading that differs from the stored slice in either direction starts
    /// a new slice.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] once the clock passes the last
    ///   timestamp the layout can hold.
    /// - [`Error::InstantBeforeEpoch`] while the clock reads earlier than the
    ///   epoch.
    /// - `Error::LockPoisoned` if the lock has been poisoned (std mutex only).
    ///
    /// The stored slice is left untouched on error.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<u64> {
        let (timestamp, sequence) = {
            let mut slice = self.lock()?;
            let mut timestamp = self.timer.now()?;

            let sequence = if timestamp == slice.timestamp {
                let sequence = slice.sequence + 1;
                if sequence > self.builder.max_sequence() {
                    timestamp = self.timer.wait_for_next(timestamp)?;
                    0
                } else {
                    sequence
                }
            } else {
                if timestamp < slice.timestamp {
                    clock_behind(timestamp, slice.timestamp);
                }
                0
            };

            if timestamp > self.builder.max_timestamp() {
                return Err(Self::cold_timestamp_overflow(
                    timestamp,
                    self.builder.max_timestamp(),
                ));
            }

            *slice = TimeSlice::new(timestamp, sequence);
            (timestamp, sequence)
        };

        Ok(self.builder.pack(timestamp, sequence))
    }

    /// Retires the current time slice.
    ///
    /// The stored timestamp is kept and its sequence marked exhausted, so the
    /// next call starts at sequence 0 of a later slice and never reissues an
    /// ID.
    ///
    /// # Errors
    ///
    /// Returns `Error::LockPoisoned` if the lock has been poisoned (std mutex
    /// only).
    pub fn reset(&self) -> Result<()> {
        self.lock()?.sequence = self.builder.max_sequence();
        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, TimeSlice>> {
        #[cfg(feature = "parking-lot")]
        {
            Ok(self.state.lock())
        }
        #[cfg(not(feature = "parking-lot"))]
        {
            Ok(self.state.lock()?)
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64, max: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(timestamp, max, "generator lifetime exhausted");
        Error::TimestampOverflow { timestamp, max }
    }
}

impl<T: TimeSource> IdGenerator for LockIdGenerator<T> {
    type Time = T;

    fn builder(&self) -> &IdBuilder {
        self.builder()
    }

    fn timer(&self) -> &Timer<T> {
        self.timer()
    }

    fn generate(&self) -> Result<u64> {
        self.generate()
    }

    fn reset(&self) -> Result<()> {
        self.reset()
    }
}
