//! Push-race configuration and errors.

use std::error::Error;
use std::fmt;

use dsx_vec::DynArrayError;
use tracing::warn;

use crate::race::Contender;

/// Environment variable holding the largest power of ten to race.
pub const ENV_MAX_EXPONENT: &str = "DSX_BENCH_MAX_EXP";
/// Environment variable selecting [`RaceMode`] (`sequential` / `parallel`).
pub const ENV_MODE: &str = "DSX_BENCH_MODE";
/// Environment variable toggling pre-sizing (`0` / `1`).
pub const ENV_PRESIZE: &str = "DSX_BENCH_PRESIZE";

// ── RaceMode ───────────────────────────────────────────────────────

/// How the two contenders are timed against each other.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RaceMode {
    /// One after the other on the calling thread.
    Sequential,
    /// Concurrently, each on its own thread, with independent containers.
    Parallel,
}

impl RaceMode {
    /// Parse a mode name, case-insensitively.
    pub fn parse(spec: &str) -> Option<Self> {
        match spec.to_ascii_lowercase().as_str() {
            "sequential" | "seq" => Some(Self::Sequential),
            "parallel" | "par" | "async" => Some(Self::Parallel),
            _ => None,
        }
    }
}

impl fmt::Display for RaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Sequential => "sequential",
            Self::Parallel => "parallel",
        };
        f.write_str(text)
    }
}

// ── RaceError ──────────────────────────────────────────────────────

/// Errors from configuring or running a push race.
#[derive(Debug, PartialEq)]
pub enum RaceError {
    /// `max_exponent` is past [`RaceConfig::MAX_EXPONENT_LIMIT`].
    ExponentTooLarge {
        /// The configured exponent.
        configured: u32,
        /// The largest accepted exponent.
        limit: u32,
    },
    /// The iteration count does not fit in `usize` on this platform.
    IterationsTooLarge {
        /// The requested iteration count.
        iterations: u64,
    },
    /// The dynamic array contender failed.
    Array(DynArrayError),
    /// The `Vec` contender could not reserve its buffer.
    StdReserveFailed {
        /// Number of elements requested.
        requested: usize,
    },
    /// A timing thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
    /// A timing thread exited without reporting.
    WorkerLost {
        /// The contender whose timing never arrived.
        contender: Contender,
    },
}

impl fmt::Display for RaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExponentTooLarge { configured, limit } => {
                write!(f, "max_exponent {configured} exceeds limit of {limit}")
            }
            Self::IterationsTooLarge { iterations } => {
                write!(f, "{iterations} iterations do not fit in usize")
            }
            Self::Array(e) => write!(f, "dyn array: {e}"),
            Self::StdReserveFailed { requested } => {
                write!(f, "std vec: reserving {requested} elements failed")
            }
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "thread spawn failed: {reason}")
            }
            Self::WorkerLost { contender } => {
                write!(f, "{contender} timing thread exited without a result")
            }
        }
    }
}

impl Error for RaceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Array(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DynArrayError> for RaceError {
    fn from(e: DynArrayError) -> Self {
        Self::Array(e)
    }
}

// ── RaceConfig ─────────────────────────────────────────────────────

/// Parameters of a push race over iteration counts `10^0 ..= 10^max_exponent`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RaceConfig {
    /// Largest power of ten to race. Default: 7.
    pub max_exponent: u32,
    /// Whether both contenders reserve the full iteration count before
    /// timing starts. Default: true.
    pub presize: bool,
    /// Sequential or parallel timing. Default: sequential.
    pub mode: RaceMode,
}

impl RaceConfig {
    /// Default largest exponent.
    pub const DEFAULT_MAX_EXPONENT: u32 = 7;

    /// Largest accepted exponent (10^10 pushes).
    pub const MAX_EXPONENT_LIMIT: u32 = 10;

    /// Check that the configuration can be run.
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.max_exponent > Self::MAX_EXPONENT_LIMIT {
            return Err(RaceError::ExponentTooLarge {
                configured: self.max_exponent,
                limit: Self::MAX_EXPONENT_LIMIT,
            });
        }
        Ok(())
    }

    /// Iteration counts raced by this configuration, smallest first.
    pub fn iteration_counts(&self) -> Vec<u64> {
        iteration_counts(self.max_exponent)
    }

    /// Defaults overridden by the `DSX_BENCH_*` environment variables.
    ///
    /// Unparseable values are ignored with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed by the
    /// `DSX_BENCH_*` variable names.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(raw) = lookup(ENV_MAX_EXPONENT) {
            match raw.trim().parse::<u32>() {
                Ok(value) => config.max_exponent = value,
                Err(_) => warn!(key = ENV_MAX_EXPONENT, value = %raw, "ignoring invalid value"),
            }
        }
        if let Some(raw) = lookup(ENV_MODE) {
            match RaceMode::parse(raw.trim()) {
                Some(mode) => config.mode = mode,
                None => warn!(key = ENV_MODE, value = %raw, "ignoring invalid value"),
            }
        }
        if let Some(raw) = lookup(ENV_PRESIZE) {
            match raw.trim() {
                "1" | "true" => config.presize = true,
                "0" | "false" => config.presize = false,
                _ => warn!(key = ENV_PRESIZE, value = %raw, "ignoring invalid value"),
            }
        }
        config
    }
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            max_exponent: Self::DEFAULT_MAX_EXPONENT,
            presize: true,
            mode: RaceMode::Sequential,
        }
    }
}

/// `10^0 ..= 10^max_exponent`.
pub fn iteration_counts(max_exponent: u32) -> Vec<u64> {
    (0..=max_exponent).map(|exp| 10u64.pow(exp)).collect()
}
