use std::sync::Arc;
use std::thread;
use std::time::Duration;

use strand::RuntimeBuilder;
use strand::batch::{
    BatchError, BatchRunner, CANCELLED, ExecutionStrategy, FixedPool, PerUnit, Work, WorkError,
};

fn per_unit() -> PerUnit {
    PerUnit::with_runtime(RuntimeBuilder::new().worker_threads(4).build())
}

/// Retries until the batch started and published its tokens.
fn interrupt_when_running(runner: &BatchRunner, id: usize) {
    while !runner.interrupt(id) {
        thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn three_units_on_three_threads_take_one_delay() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(200)));

    let report = runner.run(&FixedPool::new(3), 3).unwrap();

    assert_eq!(report.len(), 3);
    assert!(report.results.iter().all(|value| (0..100).contains(value)));
    assert!(report.elapsed >= Duration::from_millis(200));
    assert!(
        report.elapsed < Duration::from_millis(390),
        "expected a single round, took {:?}",
        report.elapsed
    );
}

#[test]
fn ten_units_on_two_threads_take_five_rounds() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(100)));

    let report = runner.run(&FixedPool::new(2), 10).unwrap();

    assert_eq!(report.len(), 10);
    assert!(report.elapsed >= Duration::from_millis(500));
    assert!(
        report.elapsed < Duration::from_millis(1_000),
        "expected five rounds, took {:?}",
        report.elapsed
    );
}

#[test]
fn per_unit_elapsed_does_not_grow_with_count() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(200)));
    let strategy = per_unit();

    let report = runner.run(&strategy, 10_000).unwrap();

    assert_eq!(report.len(), 10_000);
    assert_eq!(report.cancelled, 0);
    assert!(report.elapsed >= Duration::from_millis(200));
    assert!(
        report.elapsed < Duration::from_secs(2),
        "ten thousand units should overlap, took {:?}",
        report.elapsed
    );
}

#[test]
fn sum_matches_results() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(10)));

    let pooled = FixedPool::new(4);
    let lightweight = per_unit();
    let strategies: [&dyn ExecutionStrategy; 2] = [&pooled, &lightweight];

    for strategy in strategies {
        let report = runner.run(strategy, 50).unwrap();

        let expected: i64 = report.results.iter().map(|&v| i64::from(v)).sum();
        assert_eq!(report.sum, expected);
        assert!(report.results.iter().all(|value| (-1..100).contains(value)));
    }
}

#[test]
fn custom_producer_sees_every_unit() {
    let runner = BatchRunner::new(Work::new(Duration::from_millis(10), |unit| {
        Ok(unit.id() as i32)
    }));

    let report = runner.run(&per_unit(), 20).unwrap();

    let mut results = report.results.clone();
    results.sort_unstable();
    assert_eq!(results, (0..20).collect::<Vec<_>>());
    assert_eq!(report.sum, (0..20).sum::<i64>());
}

#[test]
fn interrupted_unit_reports_cancelled_and_is_not_fatal() {
    let runner = Arc::new(BatchRunner::new(Work::new(Duration::from_millis(500), |_| Ok(5))));

    let background = {
        let runner = runner.clone();
        thread::spawn(move || runner.run(&FixedPool::new(4), 4))
    };

    interrupt_when_running(&runner, 1);

    let report = background.join().unwrap().unwrap();

    assert_eq!(report.cancelled, 1);
    assert_eq!(report.results.iter().filter(|&&v| v == CANCELLED).count(), 1);
    assert_eq!(report.sum, 5 * 3 + i64::from(CANCELLED));
}

#[test]
fn interrupt_all_cancels_lightweight_units() {
    let runner = Arc::new(BatchRunner::new(Work::new(Duration::from_secs(10), |_| Ok(1))));

    let background = {
        let runner = runner.clone();
        thread::spawn(move || runner.run(&per_unit(), 100))
    };

    interrupt_when_running(&runner, 0);
    runner.interrupt_all();

    let report = background.join().unwrap().unwrap();

    assert_eq!(report.cancelled, 100);
    assert_eq!(report.sum, -100);
    assert!(report.elapsed < Duration::from_secs(5));
}

#[test]
fn interrupt_without_batch_is_a_no_op() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(1)));

    assert!(!runner.interrupt(0));
    assert_eq!(runner.interrupt_all(), 0);
}

#[test]
fn failing_producer_aborts_pool_batch() {
    let runner = BatchRunner::new(Work::new(Duration::from_millis(20), |unit| {
        if unit.id() == 3 {
            Err(WorkError::failed(unit.id(), "bad input"))
        } else {
            Ok(1)
        }
    }));

    let err = runner.run(&FixedPool::new(2), 10).unwrap_err();

    assert!(matches!(err, BatchError::Work(WorkError::Failed { id: 3, .. })));
}

#[test]
fn failing_producer_aborts_per_unit_batch() {
    let runner = BatchRunner::new(Work::new(Duration::from_millis(20), |unit| {
        if unit.id() == 7 {
            Err(WorkError::failed(unit.id(), "bad input"))
        } else {
            Ok(1)
        }
    }));

    let err = runner.run(&per_unit(), 100).unwrap_err();

    match err {
        BatchError::Work(work) => assert_eq!(work.unit_id(), 7),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn panicking_producer_is_reported() {
    let runner = BatchRunner::new(Work::new(Duration::from_millis(1), |unit| {
        if unit.id() == 0 {
            panic!("producer exploded");
        }
        Ok(0)
    }));

    let err = runner.run(&FixedPool::new(1), 2).unwrap_err();

    assert_eq!(
        err.to_string(),
        "unit 0 panicked: producer exploded",
        "panic should surface as a work error"
    );
}

#[test]
fn empty_batch_is_rejected() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(1)));

    assert!(matches!(
        runner.run(&FixedPool::new(1), 0),
        Err(BatchError::Empty)
    ));
}

#[test]
fn strategies_describe_themselves() {
    assert_eq!(FixedPool::new(100).to_string(), "fixed pool of 100 threads");
    assert_eq!(FixedPool::new(100).workers(), 100);
    assert_eq!(per_unit().to_string(), "one lightweight task per unit");
}

#[test]
fn runner_exposes_its_work() {
    let runner = BatchRunner::new(Work::random(Duration::from_millis(250)));

    assert_eq!(runner.work().delay(), Duration::from_millis(250));
}

#[test]
fn interrupt_reaches_newer_batch_after_older_one_finishes() {
    let runner = Arc::new(BatchRunner::new(Work::new(Duration::from_millis(1_000), |_| Ok(5))));

    let older = {
        let runner = runner.clone();
        thread::spawn(move || runner.run(&FixedPool::new(1), 1))
    };

    thread::sleep(Duration::from_millis(300));

    let newer = {
        let runner = runner.clone();
        thread::spawn(move || runner.run(&FixedPool::new(1), 1))
    };

    let older = older.join().unwrap().unwrap();
    assert_eq!(older.cancelled, 0);

    assert!(runner.interrupt(0), "the newer batch is still running");

    let newer = newer.join().unwrap().unwrap();
    assert_eq!(newer.cancelled, 1);
    assert_eq!(newer.sum, i64::from(CANCELLED));

    assert!(!runner.interrupt(0), "no batch is running any more");
}

#[test]
fn interrupted_lightweight_unit_leaves_siblings_alone() {
    let runner = Arc::new(BatchRunner::new(Work::new(Duration::from_millis(500), |_| Ok(5))));

    let background = {
        let runner = runner.clone();
        thread::spawn(move || runner.run(&per_unit(), 10))
    };

    interrupt_when_running(&runner, 3);

    let report = background.join().unwrap().unwrap();

    assert_eq!(report.len(), 10);
    assert_eq!(report.cancelled, 1);
    assert_eq!(report.sum, 5 * 9 + i64::from(CANCELLED));
}

#[test]
fn panicking_producer_is_reported_per_unit() {
    let runner = BatchRunner::new(Work::new(Duration::from_millis(1), |unit| {
        if unit.id() == 4 {
            panic!("producer exploded");
        }
        Ok(0)
    }));

    let err = runner.run(&per_unit(), 8).unwrap_err();

    assert!(matches!(err, BatchError::Work(WorkError::Panicked { id: 4, .. })));
}
