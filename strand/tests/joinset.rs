use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use strand::task::JoinSet;
use strand::time::sleep;

#[strand::test]
async fn joinset_abort_all() {
    let mut set = JoinSet::new();

    set.spawn(async move {
        sleep(Duration::from_millis(500)).await;
        "should be cancelled"
    });

    set.abort_all();

    assert!(set.is_empty(), "Set should be empty after abort_all");
    assert!(set.join_next().await.is_none());
}

#[strand::test]
async fn joinset_completion_order() {
    let mut set = JoinSet::new();

    set.spawn(async move {
        sleep(Duration::from_millis(200)).await;
        "slow"
    });

    set.spawn(async move {
        sleep(Duration::from_millis(10)).await;
        "fast"
    });

    assert_eq!(set.join_next().await, Some(Ok("fast")));
    assert_eq!(set.join_next().await, Some(Ok("slow")));
    assert_eq!(set.join_next().await, None);
}

#[strand::test]
async fn joinset_drop_cancels_tasks() {
    let flag = Arc::new(AtomicBool::new(false));
    let flag_clone = flag.clone();

    {
        let mut set = JoinSet::new();
        set.spawn(async move {
            sleep(Duration::from_millis(100)).await;
            flag_clone.store(true, Ordering::SeqCst);
        });
    }

    sleep(Duration::from_millis(150)).await;

    assert!(
        !flag.load(Ordering::SeqCst),
        "Task should have been cancelled on drop"
    );
}

#[strand::test]
async fn joinset_is_empty_and_len() {
    let mut set = JoinSet::new();
    assert!(set.is_empty());
    assert_eq!(set.len(), 0);

    set.spawn(async move { sleep(Duration::from_millis(10)).await });
    set.spawn(async move { sleep(Duration::from_millis(10)).await });

    assert!(!set.is_empty());
    assert_eq!(set.len(), 2);

    set.join_next().await;
    assert_eq!(set.len(), 1);

    set.join_next().await;
    assert!(set.is_empty());
}

#[strand::test]
async fn joinset_reports_panics() {
    let mut set: JoinSet<i32> = JoinSet::new();

    set.spawn(async move {
        if true {
            panic!("unit exploded");
        }
        0
    });
    set.spawn(async move { 3 });

    let mut outputs = set.join_all().await;
    outputs.sort_by_key(|output| output.is_err());

    assert_eq!(outputs[0], Ok(3));
    assert!(outputs[1].as_ref().unwrap_err().is_panic());
}

#[strand::test(worker_threads = 4)]
async fn joinset_many_tasks() {
    let mut set = JoinSet::new();

    for i in 0..10_000u64 {
        set.spawn(async move { i });
    }

    let mut sum = 0;
    while let Some(output) = set.join_next().await {
        sum += output.unwrap();
    }

    assert_eq!(sum, (0..10_000u64).sum::<u64>());
}
