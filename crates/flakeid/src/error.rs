/// A result type defaulting to this crate's [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `flakeid` can emit.
///
/// Configuration and range errors are raised synchronously and never retried.
/// Contention between concurrent callers is not an error: generators retry
/// internally and the caller never observes it.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The host ID does not fit in the 9-bit host field.
    #[error("host {host} is out of range [0, {max}]")]
    HostOutOfRange {
        /// The rejected host ID.
        host: u64,
        /// The largest accepted host ID.
        max: u64,
    },

    /// The timestamp does not fit in the timestamp field of the active
    /// precision.
    ///
    /// Raised by the explicit generation path, and by `generate` once the
    /// clock has run past the generator's lifetime of `2^T` units after the
    /// epoch.
    #[error("timestamp {timestamp} overflows the maximum of {max}")]
    TimestampOverflow {
        /// The rejected timestamp.
        timestamp: u64,
        /// The largest timestamp the layout can hold.
        max: u64,
    },

    /// The sequence does not fit in the sequence field of the active
    /// precision.
    #[error("sequence {sequence} overflows the maximum of {max}")]
    SequenceOverflow {
        /// The rejected sequence.
        sequence: u64,
        /// The largest sequence the layout can hold.
        max: u64,
    },

    /// An instant passed to the explicit generation path precedes the epoch.
    #[error("instant precedes the generator epoch")]
    InstantBeforeEpoch,

    /// A textual generation mode could not be parsed.
    #[error("invalid generation mode: {0:?}")]
    InvalidMode(String),

    /// A textual precision could not be parsed.
    #[error("invalid precision: {0:?}")]
    InvalidPrecision(String),

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(not(feature = "parking-lot"))))]
    #[cfg(not(feature = "parking-lot"))]
    #[error("lock poisoned")]
    LockPoisoned,
}

#[cfg(not(feature = "parking-lot"))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg(not(feature = "parking-lot"))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}
