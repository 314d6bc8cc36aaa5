use anyhow::anyhow;
use async_trait::async_trait;
use core_logic::testing::{FixedPicker, RecordingSleeper};
use core_logic::traits::Sleeper;
use core_logic::{CycleScheduler, DelayRange, ProxyConfig, ProxyManager, WalletProcessor};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Fails wallet "err", panics on wallet "boom", records everything it sees.
#[derive(Default)]
struct ScriptedProcessor {
    seen: Mutex<Vec<(String, Option<String>)>>,
    prepare_failures: AtomicUsize,
}

#[async_trait]
impl WalletProcessor for ScriptedProcessor {
    type Wallet = String;

    fn label(&self, wallet: &String) -> String {
        wallet.clone()
    }

    async fn prepare_cycle(&self) -> anyhow::Result<()> {
        let remaining = self.prepare_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.prepare_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(anyhow!("rpc unreachable"));
        }
        Ok(())
    }

    async fn process(&self, wallet: String, proxy: Option<ProxyConfig>) -> anyhow::Result<()> {
        self.seen
            .lock()
            .unwrap()
            .push((wallet.clone(), proxy.map(|p| p.url)));
        match wallet.as_str() {
            "err" => Err(anyhow!("wallet pass failed")),
            "boom" => panic!("wallet pass panicked"),
            _ => Ok(()),
        }
    }
}

impl ScriptedProcessor {
    fn seen_wallets(&self) -> Vec<String> {
        self.seen.lock().unwrap().iter().map(|(w, _)| w.clone()).collect()
    }
}

/// Cancels the token after a fixed number of sleeps.
struct CancellingSleeper {
    inner: RecordingSleeper,
    token: CancellationToken,
    cancel_after: usize,
}

#[async_trait]
impl Sleeper for CancellingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.inner.sleep(duration).await;
        if self.inner.count() >= self.cancel_after {
            self.token.cancel();
        }
    }
}

fn wallets(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn test_failing_and_panicking_wallets_do_not_stop_cycle() {
    let processor = Arc::new(ScriptedProcessor::default());
    let sleeper = Arc::new(RecordingSleeper::new());
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a", "err", "boom", "d"]),
        ProxyManager::default(),
        DelayRange::new(1000, 2000),
        sleeper.clone(),
        Arc::new(FixedPicker::first()),
    );

    let summary = scheduler.run_cycle(&CancellationToken::new()).await.unwrap();

    assert_eq!(processor.seen_wallets(), wallets(&["a", "err", "boom", "d"]));
    assert_eq!(summary.processed, 4);
    assert_eq!(summary.failed, 2);
    // One inter-wallet delay per wallet
    assert_eq!(sleeper.count_of(Duration::from_millis(1000)), 4);
}

#[tokio::test]
async fn test_proxies_assigned_by_position_with_fallback() {
    let processor = Arc::new(ScriptedProcessor::default());
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a", "b", "c"]),
        ProxyManager::parse("10.0.0.1:80\n10.0.0.2:80"),
        DelayRange::new(0, 0),
        Arc::new(RecordingSleeper::new()),
        Arc::new(FixedPicker::first()),
    );

    scheduler.run_cycle(&CancellationToken::new()).await.unwrap();

    let proxies: Vec<Option<String>> = processor
        .seen
        .lock()
        .unwrap()
        .iter()
        .map(|(_, p)| p.clone())
        .collect();
    assert_eq!(
        proxies,
        vec![
            Some("http://10.0.0.1:80".to_string()),
            Some("http://10.0.0.2:80".to_string()),
            Some("http://10.0.0.1:80".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_no_proxies_means_direct() {
    let processor = Arc::new(ScriptedProcessor::default());
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a"]),
        ProxyManager::default(),
        DelayRange::new(0, 0),
        Arc::new(RecordingSleeper::new()),
        Arc::new(FixedPicker::first()),
    );

    scheduler.run_cycle(&CancellationToken::new()).await.unwrap();
    assert_eq!(processor.seen.lock().unwrap()[0].1, None);
}

#[tokio::test]
async fn test_run_waits_cycle_cooldown_between_cycles() {
    let processor = Arc::new(ScriptedProcessor::default());
    let token = CancellationToken::new();
    let sleeper = Arc::new(CancellingSleeper {
        inner: RecordingSleeper::new(),
        token: token.clone(),
        // wallet delay + cooldown, twice
        cancel_after: 4,
    });
    let cycle = Duration::from_secs(25 * 60 * 60);
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a"]),
        ProxyManager::default(),
        DelayRange::new(10, 10),
        sleeper.clone(),
        Arc::new(FixedPicker::first()),
    );

    scheduler.run(token).await;

    assert_eq!(processor.seen_wallets(), wallets(&["a", "a"]));
    assert_eq!(
        sleeper.inner.calls(),
        vec![Duration::from_millis(10), cycle, Duration::from_millis(10), cycle]
    );
}

#[tokio::test]
async fn test_cycle_failure_uses_short_cooldown() {
    let processor = Arc::new(ScriptedProcessor::default());
    processor.prepare_failures.store(1, Ordering::SeqCst);
    let token = CancellationToken::new();
    let sleeper = Arc::new(CancellingSleeper {
        inner: RecordingSleeper::new(),
        token: token.clone(),
        cancel_after: 3,
    });
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a"]),
        ProxyManager::default(),
        DelayRange::new(10, 10),
        sleeper.clone(),
        Arc::new(FixedPicker::first()),
    )
    .with_cooldowns(Duration::from_secs(3600), Duration::from_secs(60));

    scheduler.run(token).await;

    assert_eq!(
        sleeper.inner.calls(),
        vec![
            Duration::from_secs(60),
            Duration::from_millis(10),
            Duration::from_secs(3600)
        ]
    );
    assert_eq!(processor.seen_wallets(), wallets(&["a"]));
}

#[tokio::test]
async fn test_cancelled_before_start_does_nothing() {
    let processor = Arc::new(ScriptedProcessor::default());
    let token = CancellationToken::new();
    token.cancel();
    let scheduler = CycleScheduler::new(
        processor.clone(),
        wallets(&["a", "b"]),
        ProxyManager::default(),
        DelayRange::default(),
        Arc::new(RecordingSleeper::new()),
        Arc::new(FixedPicker::first()),
    );

    scheduler.run(token).await;
    assert!(processor.seen_wallets().is_empty());
}
