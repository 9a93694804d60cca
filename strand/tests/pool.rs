use std::sync::{Arc, mpsc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use strand::pool::{PoolError, ThreadPool};

#[test]
fn submit_returns_output() {
    let pool = ThreadPool::new(2).unwrap();

    let handle = pool.submit(|| 6 * 7);
    assert_eq!(handle.join(), Ok(42));
    assert_eq!(pool.workers(), 2);
}

#[test]
fn jobs_run_on_named_threads() {
    let pool = ThreadPool::new(1).unwrap();

    let name = pool
        .submit(|| thread::current().name().map(str::to_owned))
        .join()
        .unwrap();

    assert_eq!(name.as_deref(), Some("strand-pool-0"));
}

#[test]
fn panicking_job_does_not_kill_worker() {
    let pool = ThreadPool::new(1).unwrap();

    let failed = pool.submit(|| -> i32 { panic!("job exploded") });
    let after = pool.submit(|| 1);

    assert_eq!(failed.join(), Err(PoolError::Panicked("job exploded".to_string())));
    assert_eq!(after.join(), Ok(1));
}

#[test]
fn workers_run_jobs_concurrently() {
    let pool = ThreadPool::new(4).unwrap();

    let start = Instant::now();
    let handles: Vec<_> = (0..4)
        .map(|_| pool.submit(|| thread::sleep(Duration::from_millis(100))))
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert!(start.elapsed() < Duration::from_millis(350));
}

#[test]
fn queued_jobs_finish_after_shutdown() {
    let counter = Arc::new(AtomicUsize::new(0));
    let mut pool = ThreadPool::new(2).unwrap();

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let counter = counter.clone();
            pool.submit(move || {
                thread::sleep(Duration::from_millis(5));
                counter.fetch_add(1, Ordering::SeqCst)
            })
        })
        .collect();

    pool.shutdown();

    assert_eq!(counter.load(Ordering::SeqCst), 10);
    assert!(handles.into_iter().all(|handle| handle.join().is_ok()));
}

#[test]
fn submit_after_shutdown_is_closed() {
    let mut pool = ThreadPool::new(1).unwrap();
    pool.shutdown();

    assert_eq!(pool.submit(|| 1).join(), Err(PoolError::Closed));
}

#[test]
#[should_panic(expected = "a thread pool needs at least one worker")]
fn zero_workers_panics() {
    let _ = ThreadPool::new(0);
}

#[test]
fn try_join_does_not_block() {
    let pool = ThreadPool::new(1).unwrap();
    let (release, gate) = mpsc::channel::<()>();

    let handle = pool.submit(move || {
        gate.recv().unwrap();
        11
    });

    assert_eq!(handle.try_join(), None);

    release.send(()).unwrap();

    let output = loop {
        if let Some(output) = handle.try_join() {
            break output;
        }
        thread::sleep(Duration::from_millis(1));
    };

    assert_eq!(output, Ok(11));
}
