use core_logic::testing::RecordingSleeper;
use core_logic::{OpError, RetryPolicy};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

fn policy(max_attempts: u32, sleeper: &Arc<RecordingSleeper>) -> RetryPolicy {
    RetryPolicy::new(max_attempts, Duration::from_millis(100)).with_sleeper(sleeper.clone())
}

#[tokio::test]
async fn test_retry_success_first_try() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<&str, OpError> = policy(3, &sleeper)
        .run("0x1234...abcd", "test_op", || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok("success")
        })
        .await;

    assert_eq!(result.unwrap(), "success");
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_retry_success_after_failures() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<&str, OpError> = policy(3, &sleeper)
        .run("actor", "test_op", || async {
            let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if count < 3 {
                Err(OpError::transient("rpc", "temporary error"))
            } else {
                Ok("success")
            }
        })
        .await;

    assert!(result.is_ok());
    assert_eq!(counter.load(Ordering::SeqCst), 3);
    assert_eq!(
        sleeper.calls(),
        vec![Duration::from_millis(100), Duration::from_millis(200)]
    );
}

#[tokio::test]
async fn test_retry_all_failures_returns_last_error() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<(), OpError> = policy(4, &sleeper)
        .run("actor", "test_op", || async {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            Err(OpError::transient("rpc", format!("failure {}", n)))
        })
        .await;

    assert_eq!(result.unwrap_err(), OpError::transient("rpc", "failure 4"));
    assert_eq!(counter.load(Ordering::SeqCst), 4);
    // No wait after the final attempt
    assert_eq!(
        sleeper.calls(),
        vec![
            Duration::from_millis(100),
            Duration::from_millis(200),
            Duration::from_millis(300)
        ]
    );
}

#[tokio::test]
async fn test_insufficient_funds_never_retried() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<(), OpError> = policy(5, &sleeper)
        .run("actor", "deploy", || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OpError::insufficient_funds("insufficient funds for gas * price + value"))
        })
        .await;

    assert!(result.unwrap_err().is_insufficient_funds());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_funds_error_after_transient_stops_immediately() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<(), OpError> = policy(5, &sleeper)
        .run("actor", "transfer", || async {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n == 1 {
                Err(OpError::transient("rpc", "timeout"))
            } else {
                Err(OpError::insufficient_funds("INSUFFICIENT_FUNDS"))
            }
        })
        .await;

    assert!(result.unwrap_err().is_insufficient_funds());
    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(sleeper.calls(), vec![Duration::from_millis(100)]);
}

#[tokio::test]
async fn test_rate_limited_and_invalid_short_circuit() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);
    let retry = policy(3, &sleeper);

    let limited: Result<(), OpError> = retry
        .run("actor", "faucet", || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OpError::RateLimited {
                endpoint: "faucet".into(),
            })
        })
        .await;
    assert!(matches!(limited, Err(OpError::RateLimited { .. })));

    let invalid: Result<(), OpError> = retry
        .run("actor", "compile", || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OpError::invalid("contract", "no bytecode"))
        })
        .await;
    assert!(matches!(invalid, Err(OpError::Invalid { .. })));

    assert_eq!(counter.load(Ordering::SeqCst), 2);
    assert_eq!(sleeper.count(), 0);
}

#[tokio::test]
async fn test_single_attempt_policy() {
    let sleeper = Arc::new(RecordingSleeper::new());
    let counter = AtomicUsize::new(0);

    let result: Result<(), OpError> = policy(1, &sleeper)
        .run("actor", "test_op", || async {
            counter.fetch_add(1, Ordering::SeqCst);
            Err(OpError::transient("rpc", "down"))
        })
        .await;

    assert!(result.is_err());
    assert_eq!(counter.load(Ordering::SeqCst), 1);
    assert_eq!(sleeper.count(), 0);
}
