//! 64-bit Snowflake-style identifiers.
//!
//! Every ID packs five fields into a `u64`, from the most significant bit
//! down:
//!
//! ```text
//! [mode:1][timestamp:T][precision:1][host:9][sequence:S]
//! ```
//!
//! where `T + S = 53`. [`Precision::Millisecond`] uses 41 timestamp bits and
//! 12 sequence bits, [`Precision::Second`] uses 31 and 22. In
//! [`Mode::Spread`] the timestamp field is bit-reversed so consecutive IDs
//! scatter across the value space instead of clustering.
//!
//! Two thread-safe generators share the [`IdGenerator`] interface:
//!
//! - [`AtomicIdGenerator`] allocates (timestamp, sequence) pairs with a
//!   compare-and-swap retry loop.
//! - [`LockIdGenerator`] allocates them inside a mutex, which also serializes
//!   allocation order across threads.
//!
//! ```
//! use flakeid::{AtomicIdGenerator, Config, IdGenerator, Mode, Precision};
//!
//! let config = Config::default()
//!     .with_mode(Mode::Sequential)
//!     .with_precision(Precision::Millisecond)
//!     .with_host(42);
//! let generator = AtomicIdGenerator::new(config).unwrap();
//!
//! let a = generator.generate().unwrap();
//! let b = generator.generate().unwrap();
//! assert!(a < b);
//! assert_eq!(generator.builder().extract_host(b), 42);
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod error;
mod generator;
mod id;
mod time;

pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::time::*;
