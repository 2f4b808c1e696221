//! Console logging for the `flakeid` binary.
//!
//! Events go to stderr so that stdout carries nothing but IDs and decoded
//! fields. The filter is read from `RUST_LOG` and defaults to `info`; set
//! `RUST_LOG=flakeid=debug` to see slice-exhaustion waits, or `trace` for the
//! per-call generator spans.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_telemetry() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_thread_ids(true)
                .with_line_number(true)
                .with_target(false)
                .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339()),
        )
        .try_init()?;

    Ok(())
}
