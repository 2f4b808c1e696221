#![doc = include_str!("../README.md")]

mod commands;
mod config;
mod telemetry;

use clap::Parser;
use config::{CliArgs, RunConfig, Task};
use std::io::{BufWriter, Write};
use std::time::Instant;
use telemetry::init_telemetry;

// Using mimalloc for better performance under contention, especially in musl
// environments.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let run = RunConfig::try_from(args)?;

    init_telemetry()?;
    if cfg!(debug_assertions) {
        tracing::debug!("Starting with full config: {:#?}", run);
    }

    let mut out = BufWriter::new(std::io::stdout().lock());
    match run.task {
        Task::Generate {
            count,
            strategy,
            threads,
        } => {
            let start = Instant::now();
            let batches = commands::generate(run.config, strategy, count, threads)?;
            let elapsed = start.elapsed();

            for id in batches.iter().flatten() {
                writeln!(out, "{id}")?;
            }
            tracing::info!(
                count,
                threads,
                ?strategy,
                mode = %run.config.mode,
                precision = %run.config.precision,
                host = run.config.host,
                elapsed_us = elapsed.as_micros() as u64,
                "generated ids"
            );
        }
        Task::Decode { ids } => {
            for id in ids {
                let decoded = commands::decode(&run.config, id)?;
                writeln!(
                    out,
                    "{} {} unix_ms={}",
                    decoded.id, decoded.fields, decoded.unix_millis
                )?;
            }
        }
    }
    out.flush()?;

    Ok(())
}
