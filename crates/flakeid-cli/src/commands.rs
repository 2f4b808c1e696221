use anyhow::anyhow;
use flakeid::{AtomicIdGenerator, Config, DecodedId, IdBuilder, IdGenerator, LockIdGenerator, Timer};
use std::{thread::scope, time::UNIX_EPOCH};

use crate::config::Strategy;

/// Generates `count` IDs from one generator shared by `threads` threads.
///
/// Returns one batch per thread, each in the order that thread received its
/// IDs. The first `count % threads` threads take one extra ID.
#[tracing::instrument(level = "debug", skip(config))]
pub fn generate(
    config: Config,
    strategy: Strategy,
    count: usize,
    threads: usize,
) -> anyhow::Result<Vec<Vec<u64>>> {
    match strategy {
        Strategy::Atomic => generate_with(&AtomicIdGenerator::new(config)?, count, threads),
        Strategy::Lock => generate_with(&LockIdGenerator::new(config)?, count, threads),
    }
}

fn generate_with<G>(generator: &G, count: usize, threads: usize) -> anyhow::Result<Vec<Vec<u64>>>
where
    G: IdGenerator + Sync,
{
    let base = count / threads;
    let extra = count % threads;

    scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|index| {
                let share = base + usize::from(index < extra);
                s.spawn(move || {
                    (0..share)
                        .map(|_| generator.generate())
                        .collect::<flakeid::Result<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .map_err(|_| anyhow!("generator thread panicked"))?
                    .map_err(anyhow::Error::from)
            })
            .collect()
    })
}

/// A decoded ID with its timestamp resolved to wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded {
    pub id: u64,
    pub fields: DecodedId,
    /// Start of the ID's time slice, in milliseconds since 1970-01-01 UTC.
    pub unix_millis: u64,
}

/// Decodes `id` with the layout described by `config`.
///
/// The mode bit is honored as found in the ID. A precision bit that
/// disagrees with `config` means the other fields were cut at the wrong
/// widths, which is logged but not rejected.
pub fn decode(config: &Config, id: u64) -> anyhow::Result<Decoded> {
    let builder = IdBuilder::new(config.mode, config.precision, config.host)?;
    let fields = builder.decode(id);
    if fields.precision != config.precision {
        tracing::warn!(
            id,
            found = %fields.precision,
            configured = %config.precision,
            "precision bit disagrees with the configured layout"
        );
    }

    let timer = Timer::new(config.precision, config.epoch);
    let unix_millis = timer
        .instant(fields.timestamp)
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))?;

    Ok(Decoded {
        id,
        fields,
        unix_millis,
    })
}
