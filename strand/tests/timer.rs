use std::time::{Duration, Instant};

use strand::time::{instrumented, sleep};

#[strand::test]
async fn test_sleep_basic() {
    let start = Instant::now();
    sleep(Duration::from_millis(50)).await;
    let elapsed = start.elapsed();

    assert!(
        elapsed >= Duration::from_millis(50),
        "Sleep should wait at least the specified duration"
    );
}

#[strand::test]
async fn test_sleep_zero_duration() {
    let start = Instant::now();
    sleep(Duration::from_millis(0)).await;

    assert!(
        start.elapsed() < Duration::from_millis(50),
        "Zero duration sleep should be fast"
    );
}

#[strand::test]
async fn test_many_sleeps_overlap() {
    let start = Instant::now();

    let handles: Vec<_> = (0..1_000)
        .map(|_| strand::task::spawn(sleep(Duration::from_millis(100))))
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }

    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(100));
    assert!(
        elapsed < Duration::from_millis(1_000),
        "Concurrent sleeps should not run back to back, took {elapsed:?}"
    );
}

#[strand::test]
async fn test_dropped_sleep_does_not_wake() {
    let early = sleep(Duration::from_millis(20));
    drop(early);

    let start = Instant::now();
    sleep(Duration::from_millis(40)).await;
    assert!(start.elapsed() >= Duration::from_millis(40));
}

#[strand::test]
async fn test_instrumented_measures_elapsed() {
    let (value, elapsed) = instrumented(async {
        sleep(Duration::from_millis(30)).await;
        "done"
    })
    .await;

    assert_eq!(value, "done");
    assert!(elapsed >= Duration::from_millis(30));
}

#[test]
#[should_panic(expected = "Sleep polled outside of runtime")]
fn test_sleep_outside_runtime_panics() {
    use std::future::Future;
    use std::pin::pin;
    use std::task::{Context, Waker};

    let mut pending = pin!(sleep(Duration::from_secs(1)));
    let mut cx = Context::from_waker(Waker::noop());
    let _ = pending.as_mut().poll(&mut cx);
}

#[strand::test]
async fn test_sleep_deadline_is_fixed_at_creation() {
    let before = Instant::now();
    let pending = sleep(Duration::from_millis(40));
    let deadline = pending.deadline();

    assert!(deadline >= before + Duration::from_millis(40));
    assert!(!pending.is_elapsed());

    pending.await;
    assert!(Instant::now() >= deadline);
}
