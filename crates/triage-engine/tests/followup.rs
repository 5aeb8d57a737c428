use std::time::Duration;

use triage_engine::followup::{DelayRange, FollowUpScheduler};

#[test]
fn delay_pick_stays_in_range() {
    let range = DelayRange::default();
    assert_eq!(range.min, Duration::from_millis(1_500));
    assert_eq!(range.max, Duration::from_millis(3_000));

    for seed in [0u128, 1, 1_500, 1_501, 99_999, u128::MAX] {
        let delay = range.pick(seed);
        assert!(delay >= range.min && delay <= range.max, "{delay:?}");
    }
    assert_eq!(range.pick(0), range.min);
    assert_eq!(range.pick(1_500), range.max);
}

#[test]
fn reversed_bounds_are_swapped() {
    let range = DelayRange::new(Duration::from_secs(5), Duration::from_secs(1));
    assert_eq!(range.min, Duration::from_secs(1));
    assert_eq!(range.max, Duration::from_secs(5));

    let fixed = DelayRange::new(Duration::from_secs(2), Duration::from_secs(2));
    assert_eq!(fixed.pick(12345), Duration::from_secs(2));
}

#[test]
fn delay_range_serializes_as_millis() {
    let json = serde_json::to_value(DelayRange::default()).expect("serialize");
    assert_eq!(json, serde_json::json!({ "min_ms": 1500, "max_ms": 3000 }));
}

#[tokio::test(start_paused = true)]
async fn reversed_bounds_from_json_are_swapped() {
    let range: DelayRange =
        serde_json::from_value(serde_json::json!({ "min_ms": 3000, "max_ms": 1000 }))
            .expect("deserialize");
    assert_eq!(range.min, Duration::from_millis(1_000));
    assert_eq!(range.max, Duration::from_millis(3_000));

    let (scheduler, mut replies) = FollowUpScheduler::new(range, 1);
    let handle = scheduler.schedule("patient-6", "checking in");
    assert!(handle.delay() >= range.min && handle.delay() <= range.max);
    assert_eq!(replies.recv().await.expect("reply delivered").id, handle.id());
}

#[test]
fn pick_never_underflows_on_a_hand_built_range() {
    let range = DelayRange {
        min: Duration::from_secs(3),
        max: Duration::from_secs(1),
    };
    assert_eq!(range.pick(42), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn reply_arrives_after_the_delay() {
    let (scheduler, mut replies) = FollowUpScheduler::new(DelayRange::default(), 8);

    let started = tokio::time::Instant::now();
    let handle = scheduler.schedule("patient-4", "A doctor has reviewed your answers.");
    let reply = replies.recv().await.expect("reply delivered");

    assert_eq!(reply.id, handle.id());
    assert_eq!(reply.actor_id, "patient-4");
    assert_eq!(reply.message, "A doctor has reviewed your answers.");
    assert!(started.elapsed() >= handle.delay());
    assert!(handle.delay() >= Duration::from_millis(1_500));
}

#[tokio::test(start_paused = true)]
async fn cancelled_reply_is_never_sent() {
    let (scheduler, mut replies) = FollowUpScheduler::new(DelayRange::default(), 8);

    let cancelled = scheduler.schedule("patient-4", "never");
    cancelled.cancel();
    let kept = scheduler.schedule("patient-5", "kept");

    let reply = replies.recv().await.expect("reply delivered");
    assert_eq!(reply.id, kept.id());

    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(replies.try_recv().is_err());
    assert!(cancelled.is_finished());
}
