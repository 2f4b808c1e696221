use std::time::{SystemTime, UNIX_EPOCH};

use crate::TimeSource;

/// The operating system's wall clock.
///
/// Readings follow `SystemTime::now()` and may step backwards when the clock
/// is corrected (e.g. by NTP). The generators treat any change of timestamp
/// as a new time slice, so a backward step restarts the sequence at an
/// earlier timestamp instead of failing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| {
                u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX)
            })
    }
}
