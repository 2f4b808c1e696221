use core::time::Duration;
use std::{
    thread,
    time::{SystemTime, UNIX_EPOCH},
};

use crate::{Error, Precision, Result, SystemClock, TimeSource};

/// Converts clock readings into integer timestamps counted in units of a
/// [`Precision`] since a fixed epoch.
///
/// A timer holds only immutable configuration plus its [`TimeSource`], so
/// [`Timer::now`] can be called from any number of threads without
/// synchronization.
#[derive(Clone, Debug)]
pub struct Timer<T = SystemClock> {
    precision: Precision,
    epoch: Duration,
    epoch_millis: u64,
    millis_per_unit: u64,
    wait: Duration,
    time: T,
}

impl Timer<SystemClock> {
    /// Creates a timer reading the system wall clock.
    ///
    /// # Parameters
    ///
    /// - `precision`: the unit timestamps are counted in.
    /// - `epoch`: timestamp zero, as a [`Duration`] since 1970-01-01 UTC.
    pub fn new(precision: Precision, epoch: Duration) -> Self {
        Self::with_time_source(precision, epoch, SystemClock)
    }
}

impl<T: TimeSource> Timer<T> {
    /// Creates a timer reading from a custom [`TimeSource`].
    pub fn with_time_source(precision: Precision, epoch: Duration, time: T) -> Self {
        Self {
            precision,
            epoch,
            epoch_millis: u64::try_from(epoch.as_millis()).unwrap_or(u64::MAX),
            millis_per_unit: precision.millis_per_unit(),
            wait: precision.wait_duration(),
            time,
        }
    }

    pub const fn precision(&self) -> Precision {
        self.precision
    }

    /// Timestamp zero, as a [`Duration`] since 1970-01-01 UTC.
    pub const fn epoch(&self) -> Duration {
        self.epoch
    }

    pub const fn time_source(&self) -> &T {
        &self.time
    }

    /// The current timestamp: whole precision units elapsed since the epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstantBeforeEpoch`] if the clock reads earlier than
    /// the epoch.
    #[inline]
    pub fn now(&self) -> Result<u64> {
        let millis = self.time.current_millis();
        match millis.checked_sub(self.epoch_millis) {
            Some(elapsed) => Ok(elapsed / self.millis_per_unit),
            None => Err(self.cold_clock_before_epoch(millis)),
        }
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_before_epoch(&self, _millis: u64) -> Error {
        #[cfg(feature = "tracing")]
        tracing::error!(
            now_ms = _millis,
            epoch_ms = self.epoch_millis,
            "clock reads earlier than the generator epoch"
        );
        Error::InstantBeforeEpoch
    }

    /// Blocks until [`Timer::now`] differs from `last_timestamp`, then returns
    /// the new timestamp.
    ///
    /// The calling thread sleeps for [`Precision::wait_duration`] between
    /// polls and re-checks the clock after every wake, so an early wake-up
    /// never ends the wait. The wait ends on any change of timestamp, which
    /// includes the clock stepping backwards.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstantBeforeEpoch`] if the clock steps back past the
    /// epoch while waiting.
    pub fn wait_for_next(&self, last_timestamp: u64) -> Result<u64> {
        let mut timestamp = self.now()?;
        if timestamp != last_timestamp {
            return Ok(timestamp);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            timestamp = last_timestamp,
            wait_ms = self.wait.as_millis() as u64,
            "time slice exhausted, waiting for the clock to advance"
        );

        while timestamp == last_timestamp {
            thread::sleep(self.wait);
            timestamp = self.now()?;
        }
        Ok(timestamp)
    }

    /// The absolute instant at which `timestamp` begins.
    ///
    /// Exact inverse of [`Timer::timestamp`] for any timestamp a generator
    /// can emit.
    pub fn instant(&self, timestamp: u64) -> SystemTime {
        let millis = timestamp
            .saturating_mul(self.millis_per_unit)
            .saturating_add(self.epoch_millis);
        UNIX_EPOCH + Duration::from_millis(millis)
    }

    /// The timestamp containing `instant`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InstantBeforeEpoch`] if `instant` precedes the epoch.
    pub fn timestamp(&self, instant: SystemTime) -> Result<u64> {
        let millis = instant
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::InstantBeforeEpoch)?
            .as_millis();
        let millis = u64::try_from(millis).unwrap_or(u64::MAX);
        let elapsed = millis
            .checked_sub(self.epoch_millis)
            .ok_or(Error::InstantBeforeEpoch)?;
        Ok(elapsed / self.millis_per_unit)
    }
}
