use core::time::Duration;
use std::sync::Arc;

/// Default epoch: Sunday, December 2, 2018 00:00:00 UTC
pub const DEFAULT_EPOCH: Duration = Duration::from_millis(1_543_708_800_000);

/// Twitter epoch: Thursday, November 4, 2010 1:42:54.657 UTC
pub const TWITTER_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// A source of wall-clock readings.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests. Readings are **milliseconds since the Unix epoch**; the
/// [`Timer`] converts them into timestamps relative to a configurable epoch.
///
/// Implementations must be callable from many threads at once.
///
/// # Example
///
/// ```
/// use flakeid::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
///
/// [`Timer`]: crate::Timer
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
