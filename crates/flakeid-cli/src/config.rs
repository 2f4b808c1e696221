use anyhow::bail;
use clap::{Parser, Subcommand, ValueEnum};
use core::time::Duration;
use flakeid::{Config, DEFAULT_EPOCH, Mode, Precision};

const DEFAULT_EPOCH_MS: u64 = DEFAULT_EPOCH.as_millis() as u64;

/// Command-line configuration for the `flakeid` binary.
///
/// The layout options are global so they can be given before or after the
/// subcommand, and each falls back to an environment variable (a `.env` file
/// in the working directory is loaded first).
#[derive(Parser, Debug, Clone)]
#[command(
    name = "flakeid",
    version,
    about = "Generate and decode 64-bit Snowflake-style IDs"
)]
pub struct CliArgs {
    /// Timestamp layout: `sequential` or `spread` (bit-reversed).
    ///
    /// Environment variable: `FLAKEID_MODE`
    #[arg(long, global = true, env = "FLAKEID_MODE", default_value_t = Mode::Sequential)]
    pub mode: Mode,

    /// Timestamp unit: `second` or `millisecond`.
    ///
    /// Environment variable: `FLAKEID_PRECISION`
    #[arg(long, global = true, env = "FLAKEID_PRECISION", default_value_t = Precision::Second)]
    pub precision: Precision,

    /// Host ID stamped into every generated ID, in `[0, 511]`.
    ///
    /// Environment variable: `FLAKEID_HOST`
    #[arg(long, global = true, env = "FLAKEID_HOST", default_value_t = 0)]
    pub host: u64,

    /// Epoch as milliseconds since 1970-01-01 UTC. Defaults to
    /// 2018-12-02T00:00:00Z.
    ///
    /// Environment variable: `FLAKEID_EPOCH_MS`
    #[arg(long, global = true, env = "FLAKEID_EPOCH_MS", default_value_t = DEFAULT_EPOCH_MS)]
    pub epoch_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Generate IDs and print one per line.
    Generate {
        /// Total number of IDs to generate.
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,

        /// Concurrency strategy of the shared generator.
        #[arg(short, long, value_enum, default_value_t = Strategy::Atomic)]
        strategy: Strategy,

        /// Number of threads sharing the generator.
        #[arg(short, long, default_value_t = 1)]
        threads: usize,
    },
    /// Decode IDs given in decimal or `0x`-prefixed hex.
    Decode {
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Lock-free compare-and-swap.
    Atomic,
    /// Mutex-guarded critical section.
    Lock,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    Generate {
        count: usize,
        strategy: Strategy,
        threads: usize,
    },
    Decode {
        ids: Vec<u64>,
    },
}

/// Validated settings for one invocation.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub config: Config,
    pub task: Task,
}

impl TryFrom<CliArgs> for RunConfig {
    type Error = anyhow::Error;

    fn try_from(args: CliArgs) -> Result<Self, Self::Error> {
        let config = Config::default()
            .with_mode(args.mode)
            .with_precision(args.precision)
            .with_host(args.host)
            .with_epoch(Duration::from_millis(args.epoch_ms));
        config.validate()?;

        let task = match args.command {
            Command::Generate {
                count,
                strategy,
                threads,
            } => {
                if count == 0 {
                    bail!("--count must be greater than 0");
                }
                if threads == 0 {
                    bail!("--threads must be greater than 0");
                }
                Task::Generate {
                    count,
                    strategy,
                    threads,
                }
            }
            Command::Decode { ids } => Task::Decode {
                ids: ids
                    .iter()
                    .map(|id| parse_id(id))
                    .collect::<anyhow::Result<_>>()?,
            },
        };

        Ok(Self { config, task })
    }
}

fn parse_id(input: &str) -> anyhow::Result<u64> {
    let trimmed = input.trim();
    let parsed = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => trimmed.parse(),
    };
    match parsed {
        Ok(id) => Ok(id),
        Err(e) => bail!("invalid id {input:?}: {e}"),
    }
}
