use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Config, DEFAULT_EPOCH, Error, IdBuilder, IdGenerator, Precision, Result, SystemClock,
    TimeSource, Timer,
    generator::slice::{TimeSlice, clock_behind},
};

/// A lock-free ID generator suitable for multi-threaded environments.
///
/// The last allocated (timestamp, sequence) pair lives in an [`AtomicU64`].
/// Each call reads it, derives the next pair from the clock, and publishes
/// the pair with a compare-and-swap. A caller that loses the race discards
/// its work and retries, so no two calls ever commit the same pair.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Readers never block
/// - ❌ No fairness: a caller may retry indefinitely under heavy contention
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`LockIdGenerator`]
///
/// [`LockIdGenerator`]: crate::LockIdGenerator
#[derive(Debug)]
pub struct AtomicIdGenerator<T = SystemClock> {
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    builder: IdBuilder,
    timer: Timer<T>,
}

impl AtomicIdGenerator<SystemClock> {
    /// Creates a generator reading the system wall clock.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `config.host` does not fit in the
    /// host field.
    ///
    /// # Example
    /// ```
    /// use flakeid::{AtomicIdGenerator, Config, Mode, Precision};
    ///
    /// let generator = AtomicIdGenerator::new(
    ///     Config::default()
    ///         .with_mode(Mode::Sequential)
    ///         .with_precision(Precision::Millisecond)
    ///         .with_host(3),
    /// )
    /// .unwrap();
    ///
    /// let id = generator.generate().unwrap();
    /// assert_eq!(generator.builder().extract_host(id), 3);
    /// ```
    pub fn new(config: Config) -> Result<Self> {
        Self::with_time_source(config, SystemClock)
    }
}

impl Default for AtomicIdGenerator<SystemClock> {
    fn default() -> Self {
        Self::from_parts(
            IdBuilder::default(),
            Timer::new(Precision::default(), DEFAULT_EPOCH),
        )
    }
}

impl<T: TimeSource> AtomicIdGenerator<T> {
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
        let initial = TimeSlice::default().to_raw();
        Self {
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(initial)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(initial),
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
    /// wrap past the maximum, the caller sleeps until the clock reaches the
    /// next slice and takes sequence 0 there. A clock reading that differs
    /// from the stored slice in either direction starts a new slice.
    ///
    /// # Errors
    ///
    /// - [`Error::TimestampOverflow`] once the clock passes the last
    ///   timestamp the layout can hold.
    /// - [`Error::InstantBeforeEpoch`] while the clock reads earlier than the
    ///   epoch.
    ///
    /// The stored slice is left untouched on error.
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn generate(&self) -> Result<u64> {
        let max_sequence = self.builder.max_sequence();
        loop {
            let current_raw = self.state.load(Ordering::Relaxed);
            let current = TimeSlice::from_raw(current_raw);
            let mut timestamp = self.timer.now()?;

            let sequence = if timestamp == current.timestamp {
                let sequence = (current.sequence + 1) & max_sequence;
                if sequence == 0 {
                    timestamp = self.timer.wait_for_next(timestamp)?;
                }
                sequence
            } else {
                if timestamp < current.timestamp {
                    clock_behind(timestamp, current.timestamp);
                }
                0
            };

            if timestamp > self.builder.max_timestamp() {
                return Err(Self::cold_timestamp_overflow(
                    timestamp,
                    self.builder.max_timestamp(),
                ));
            }

            let next_raw = TimeSlice::new(timestamp, sequence).to_raw();
            if self
                .state
                .compare_exchange(current_raw, next_raw, Ordering::Relaxed, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(self.builder.pack(timestamp, sequence));
            }
            // CAS failed - another thread won the race. Start over.
            core::hint::spin_loop();
        }
    }

    /// Retires the current time slice.
    ///
    /// The stored timestamp is kept and its sequence marked exhausted, so the
    /// next call starts at sequence 0 of a later slice and never reissues an
    /// ID.
    pub fn reset(&self) {
        let max_sequence = self.builder.max_sequence();
        let _ = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |raw| {
                let current = TimeSlice::from_raw(raw);
                Some(TimeSlice::new(current.timestamp, max_sequence).to_raw())
            });
    }

    #[cold]
    #[inline(never)]
    fn cold_timestamp_overflow(timestamp: u64, max: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(timestamp, max, "generator lifetime exhausted");
        Error::TimestampOverflow { timestamp, max }
    }
}

impl<T: TimeSource> IdGenerator for AtomicIdGenerator<T> {
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
        self.reset();
        Ok(())
    }
}
