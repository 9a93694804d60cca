use std::thread;
use std::time::{Duration, Instant};

use strand::sync::{Cancelled, CancellationToken};
use strand::time::sleep;

#[test]
fn sleep_blocking_runs_full_duration() {
    let token = CancellationToken::new();

    let start = Instant::now();
    assert_eq!(token.sleep_blocking(Duration::from_millis(50)), Ok(()));
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
fn sleep_blocking_returns_early_on_cancel() {
    let token = CancellationToken::new();
    let remote = token.clone();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        remote.cancel();
    });

    let start = Instant::now();
    assert_eq!(token.sleep_blocking(Duration::from_secs(10)), Err(Cancelled));
    assert!(start.elapsed() < Duration::from_secs(5));

    canceller.join().unwrap();
}

#[test]
fn already_cancelled_token_does_not_sleep() {
    let token = CancellationToken::new();
    token.cancel();
    token.cancel();

    let start = Instant::now();
    assert_eq!(token.sleep_blocking(Duration::from_secs(10)), Err(Cancelled));
    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(token.is_cancelled());
}

#[test]
fn clones_share_state() {
    let token = CancellationToken::new();
    let clone = token.clone();

    assert!(!clone.is_cancelled());
    token.cancel();
    assert!(clone.is_cancelled());
}

#[strand::test]
async fn run_until_cancelled_completes() {
    let token = CancellationToken::new();

    let output = token
        .run_until_cancelled(async {
            sleep(Duration::from_millis(10)).await;
            9
        })
        .await;

    assert_eq!(output, Some(9));
}

#[strand::test]
async fn run_until_cancelled_interrupts_sleep() {
    let token = CancellationToken::new();
    let remote = token.clone();

    strand::task::spawn(async move {
        sleep(Duration::from_millis(30)).await;
        remote.cancel();
    });

    let start = Instant::now();
    let output = token
        .run_until_cancelled(sleep(Duration::from_secs(10)))
        .await;

    assert_eq!(output, None);
    assert!(start.elapsed() < Duration::from_secs(5));
}

#[strand::test]
async fn cancelled_future_wakes_every_waiter() {
    let token = CancellationToken::new();

    let waiters: Vec<_> = (0..8)
        .map(|_| {
            let token = token.clone();
            strand::task::spawn(async move { token.cancelled().await })
        })
        .collect();

    sleep(Duration::from_millis(20)).await;
    token.cancel();

    for waiter in waiters {
        assert_eq!(waiter.await, Ok(()));
    }
}
