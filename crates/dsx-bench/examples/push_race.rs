//! Push-throughput race between `DynArray` and `Vec`.
//!
//! Runs the configured iteration counts and prints one block per count.
//! Configure with `DSX_BENCH_MAX_EXP`, `DSX_BENCH_MODE`, and
//! `DSX_BENCH_PRESIZE`; log output is controlled by `RUST_LOG`.

use dsx_bench::logging::init_logging;
use dsx_bench::race::millis;
use dsx_bench::{run, Contender, RaceConfig, RaceError};

fn main() -> Result<(), RaceError> {
    init_logging();
    let config = RaceConfig::from_env();

    println!("Benchmarking push() ({} mode):", config.mode);
    println!("------------------------");

    for outcome in run(&config)? {
        println!("Iterations: {}", outcome.iterations);
        for contender in [Contender::DynArray, Contender::StdVec] {
            println!(
                "{contender} time: {:.4} ms",
                millis(outcome.elapsed(contender))
            );
        }
        println!("Winner: {}", outcome.winner());
        println!("Faster by: {:.4} ms", millis(outcome.delta()));
        println!("---------------------------------");
    }
    Ok(())
}
