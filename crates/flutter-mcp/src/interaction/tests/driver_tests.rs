//! Tests for injection payloads and polling

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use crate::interaction::driver::{long_press_payload, scroll_payload, tap_payload};
use crate::interaction::wait_for;

#[test]
fn test_tap_payload_shape() {
    let payload = tap_payload(12.5, 40.0);
    assert_eq!(payload["command"], "tapAt");
    assert_eq!(payload["x"], 12.5);
    assert_eq!(payload["y"], 40.0);
    assert!(payload.get("duration").is_none());
}

#[test]
fn test_scroll_payload_shape() {
    let payload = scroll_payload(100.0, 200.0, 0.0, -300.0, Duration::from_millis(250));
    assert_eq!(payload["command"], "scrollAt");
    assert_eq!(payload["dx"], 0.0);
    assert_eq!(payload["dy"], -300.0);
    assert_eq!(payload["duration"], 250);
}

#[test]
fn test_long_press_payload_shape() {
    let payload = long_press_payload(5.0, 6.0, Duration::from_millis(800));
    assert_eq!(payload["command"], "longPressAt");
    assert_eq!(payload["duration"], 800);
}

#[tokio::test]
async fn test_wait_for_immediate_success() {
    assert!(wait_for(|| async { true }, Duration::from_millis(10)).await);
}

#[tokio::test]
async fn test_wait_for_eventual_success() {
    let calls = Arc::new(AtomicUsize::new(0));
    let calls_in_predicate = Arc::clone(&calls);

    let ok = wait_for(
        move || {
            let calls = Arc::clone(&calls_in_predicate);
            async move { calls.fetch_add(1, Ordering::SeqCst) >= 2 }
        },
        Duration::from_secs(2),
    )
    .await;

    assert!(ok);
    assert!(calls.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_wait_for_timeout() {
    let start = tokio::time::Instant::now();
    let ok = wait_for(|| async { false }, Duration::from_millis(250)).await;

    assert!(!ok);
    assert!(start.elapsed() >= Duration::from_millis(250));
}
