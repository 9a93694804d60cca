use std::process::ExitCode;

use strand::batch::{
    BatchError, BatchRunner, DEFAULT_DELAY, ExecutionStrategy, FixedPool, PerUnit, Work,
};
use tracing_subscriber::EnvFilter;

const POOL_WORKERS: usize = 100;
const POOL_UNITS: usize = 1_000;
const PER_UNIT_COUNTS: [usize; 3] = [1_000, 10_000, 100_000];

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "batch failed");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run() -> Result<(), BatchError> {
    let runner = BatchRunner::new(Work::random(DEFAULT_DELAY));

    measure(&runner, &FixedPool::new(POOL_WORKERS), POOL_UNITS)?;

    let per_unit = PerUnit::new();
    for count in PER_UNIT_COUNTS {
        measure(&runner, &per_unit, count)?;
    }

    Ok(())
}

fn measure(
    runner: &BatchRunner,
    strategy: &dyn ExecutionStrategy,
    count: usize,
) -> Result<(), BatchError> {
    println!("Will begin {strategy} execution for {count} units.");

    let report = runner.run(strategy, count)?;

    println!(
        "{strategy} finish : sum = {}; time = {} ms",
        report.sum,
        report.elapsed.as_millis()
    );
    println!("---------------------------");

    Ok(())
}
