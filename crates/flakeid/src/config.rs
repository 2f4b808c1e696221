use core::time::Duration;

use crate::{DEFAULT_EPOCH, Error, HOST_MAX, Mode, Precision, Result};

/// Construction-time settings shared by every generator.
///
/// | option      | default                    |
/// |-------------|----------------------------|
/// | `mode`      | [`Mode::Sequential`]       |
/// | `precision` | [`Precision::Second`]      |
/// | `host`      | `0`, must be below 512     |
/// | `epoch`     | [`DEFAULT_EPOCH`]          |
///
/// The epoch must predate every timestamp the generator will issue. A
/// generator stays usable for `2^T` precision units after its epoch.
///
/// # Example
/// ```
/// use flakeid::{Config, Mode, Precision, TWITTER_EPOCH};
///
/// let config = Config::default()
///     .with_mode(Mode::Spread)
///     .with_precision(Precision::Millisecond)
///     .with_host(17)
///     .with_epoch(TWITTER_EPOCH);
/// assert!(config.validate().is_ok());
/// assert!(config.with_host(512).validate().is_err());
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Config {
    pub mode: Mode,
    pub precision: Precision,
    /// Identifies the producing node. Must be unique among generators
    /// sharing an epoch; assigning it is the caller's responsibility.
    pub host: u64,
    /// Timestamp zero, as a [`Duration`] since 1970-01-01 UTC.
    pub epoch: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            precision: Precision::default(),
            host: 0,
            epoch: DEFAULT_EPOCH,
        }
    }
}

impl Config {
    #[must_use]
    pub const fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_precision(mut self, precision: Precision) -> Self {
        self.precision = precision;
        self
    }

    #[must_use]
    pub const fn with_host(mut self, host: u64) -> Self {
        self.host = host;
        self
    }

    #[must_use]
    pub const fn with_epoch(mut self, epoch: Duration) -> Self {
        self.epoch = epoch;
        self
    }

    /// Checks the settings without building anything.
    ///
    /// # Errors
    ///
    /// Returns [`Error::HostOutOfRange`] if `host` exceeds [`HOST_MAX`].
    pub fn validate(&self) -> Result<()> {
        if self.host > HOST_MAX {
            return Err(Error::HostOutOfRange {
                host: self.host,
                max: HOST_MAX,
            });
        }
        Ok(())
    }
}
