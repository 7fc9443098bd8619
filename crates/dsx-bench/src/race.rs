//! Push-throughput race between [`DynArray`] and `std::vec::Vec`.
//!
//! Each race times `n` pushes of `i32` into a fresh container of each kind.
//! In [`RaceMode::Parallel`] the two timings run on separate scoped threads
//! and report back over a bounded crossbeam channel; the containers are
//! never shared between threads.

use std::fmt;
use std::hint::black_box;
use std::thread;
use std::time::{Duration, Instant};

use dsx_vec::DynArray;
use tracing::{debug, info};

use crate::config::{RaceConfig, RaceError, RaceMode};

/// One side of a push race.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Contender {
    /// [`dsx_vec::DynArray`].
    DynArray,
    /// `std::vec::Vec`.
    StdVec,
}

impl Contender {
    /// Short machine-friendly name, used for thread names and log fields.
    pub fn label(self) -> &'static str {
        match self {
            Self::DynArray => "dyn_array",
            Self::StdVec => "std_vec",
        }
    }

    /// Time `iterations` pushes into a fresh container of this kind.
    pub fn time_push(self, iterations: u64, presize: bool) -> Result<Duration, RaceError> {
        match self {
            Self::DynArray => time_dyn_array_push(iterations, presize),
            Self::StdVec => time_std_vec_push(iterations, presize),
        }
    }
}

impl fmt::Display for Contender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::DynArray => "DynArray",
            Self::StdVec => "std Vec",
        };
        f.write_str(text)
    }
}

/// Timings of both contenders for one iteration count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RaceOutcome {
    /// Number of pushes each contender performed.
    pub iterations: u64,
    /// Elapsed time for the dynamic array.
    pub dyn_array: Duration,
    /// Elapsed time for `Vec`.
    pub std_vec: Duration,
}

impl RaceOutcome {
    /// The faster contender. Ties go to `Vec`.
    pub fn winner(&self) -> Contender {
        if self.dyn_array < self.std_vec {
            Contender::DynArray
        } else {
            Contender::StdVec
        }
    }

    /// How much faster the winner was.
    pub fn delta(&self) -> Duration {
        self.dyn_array.abs_diff(self.std_vec)
    }

    /// Elapsed time of `contender`.
    pub fn elapsed(&self, contender: Contender) -> Duration {
        match contender {
            Contender::DynArray => self.dyn_array,
            Contender::StdVec => self.std_vec,
        }
    }
}

fn slots_for(iterations: u64) -> Result<usize, RaceError> {
    usize::try_from(iterations).map_err(|_| RaceError::IterationsTooLarge { iterations })
}

/// An empty [`DynArray`] whose capacity covers `iterations` pushes without
/// growing. Push grows once `len + 1` reaches the capacity, so this needs
/// one slot more than `Vec` does.
pub fn presized_dyn_array(iterations: u64) -> Result<DynArray<i32>, RaceError> {
    let slots = slots_for(iterations)?
        .checked_add(1)
        .ok_or(RaceError::IterationsTooLarge { iterations })?;
    Ok(DynArray::with_capacity(slots)?)
}

/// Time `iterations` pushes into a [`DynArray`].
///
/// With `presize`, the array comes from [`presized_dyn_array`], so the
/// timed loop never reallocates.
pub fn time_dyn_array_push(iterations: u64, presize: bool) -> Result<Duration, RaceError> {
    let mut arr = if presize {
        presized_dyn_array(iterations)?
    } else {
        DynArray::new()
    };
    let mut value = 0i32;
    let start = Instant::now();
    for _ in 0..iterations {
        arr.push(value)?;
        value = value.wrapping_add(1);
    }
    let elapsed = start.elapsed();
    black_box(arr.len());
    Ok(elapsed)
}

/// Time `iterations` pushes into a `Vec`. With `presize`, exactly
/// `iterations` elements are reserved up front.
pub fn time_std_vec_push(iterations: u64, presize: bool) -> Result<Duration, RaceError> {
    let mut vec: Vec<i32> = Vec::new();
    if presize {
        let requested = slots_for(iterations)?;
        vec.try_reserve_exact(requested)
            .map_err(|_| RaceError::StdReserveFailed { requested })?;
    }
    let mut value = 0i32;
    let start = Instant::now();
    for _ in 0..iterations {
        vec.push(value);
        value = value.wrapping_add(1);
    }
    let elapsed = start.elapsed();
    black_box(vec.len());
    Ok(elapsed)
}

/// Race both contenders once at `iterations` pushes.
pub fn race(iterations: u64, config: &RaceConfig) -> Result<RaceOutcome, RaceError> {
    match config.mode {
        RaceMode::Sequential => Ok(RaceOutcome {
            iterations,
            dyn_array: Contender::DynArray.time_push(iterations, config.presize)?,
            std_vec: Contender::StdVec.time_push(iterations, config.presize)?,
        }),
        RaceMode::Parallel => race_parallel(iterations, config.presize),
    }
}

fn race_parallel(iterations: u64, presize: bool) -> Result<RaceOutcome, RaceError> {
    race_parallel_with(iterations, presize, Contender::time_push)
}

fn race_parallel_with<F>(iterations: u64, presize: bool, time: F) -> Result<RaceOutcome, RaceError>
where
    F: Fn(Contender, u64, bool) -> Result<Duration, RaceError> + Sync,
{
    let (tx, rx) = crossbeam_channel::bounded(2);
    let time = &time;
    thread::scope(|scope| -> Result<(), RaceError> {
        let mut workers = Vec::with_capacity(2);
        for contender in [Contender::DynArray, Contender::StdVec] {
            let tx = tx.clone();
            let handle = thread::Builder::new()
                .name(format!("race-{}", contender.label()))
                .spawn_scoped(scope, move || {
                    tx.send((contender, time(contender, iterations, presize)))
                })
                .map_err(|e| RaceError::ThreadSpawnFailed {
                    reason: format!("{}: {e}", contender.label()),
                })?;
            workers.push((contender, handle));
        }
        for (contender, handle) in workers {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(_)) | Err(_) => return Err(RaceError::WorkerLost { contender }),
            }
        }
        Ok(())
    })?;
    drop(tx);

    let mut dyn_array = None;
    let mut std_vec = None;
    for (contender, elapsed) in rx.iter() {
        debug!(contender = contender.label(), iterations, "timing received");
        match contender {
            Contender::DynArray => dyn_array = Some(elapsed?),
            Contender::StdVec => std_vec = Some(elapsed?),
        }
    }
    Ok(RaceOutcome {
        iterations,
        dyn_array: dyn_array.ok_or(RaceError::WorkerLost {
            contender: Contender::DynArray,
        })?,
        std_vec: std_vec.ok_or(RaceError::WorkerLost {
            contender: Contender::StdVec,
        })?,
    })
}

/// Race every iteration count in `config`, smallest first.
pub fn run(config: &RaceConfig) -> Result<Vec<RaceOutcome>, RaceError> {
    config.validate()?;
    info!(
        max_exponent = config.max_exponent,
        presize = config.presize,
        mode = %config.mode,
        "starting push race"
    );
    let mut outcomes = Vec::new();
    for iterations in config.iteration_counts() {
        let outcome = race(iterations, config)?;
        info!(
            iterations,
            dyn_array_ms = millis(outcome.dyn_array),
            std_vec_ms = millis(outcome.std_vec),
            winner = %outcome.winner(),
            "race finished"
        );
        outcomes.push(outcome);
    }
    Ok(outcomes)
}

/// `duration` in fractional milliseconds.
pub fn millis(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}
