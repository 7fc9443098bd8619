//! Push-throughput race and benchmark helpers for `dsx-vec`.
//!
//! - [`race::run`]: times `DynArray::push` against `Vec::push` for
//!   iteration counts `10^0 ..= 10^k`, sequentially or in parallel
//! - [`config::RaceConfig`]: race parameters, with `DSX_BENCH_*` overrides
//! - [`logging::init_logging`]: stderr `tracing` subscriber for binaries

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod logging;
pub mod race;

pub use config::{RaceConfig, RaceError, RaceMode};
pub use race::{race, run, Contender, RaceOutcome};
