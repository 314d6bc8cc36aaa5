use crate::config::DelayRange;
use crate::traits::{Sleeper, VariantPicker, WalletProcessor};
use crate::utils::proxy_manager::ProxyManager;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, Instrument};

/// Cooldown between two complete cycles.
pub const CYCLE_COOLDOWN: Duration = Duration::from_secs(25 * 60 * 60);
/// Cooldown after a cycle-level failure before the cycle is retried.
pub const FAILURE_COOLDOWN: Duration = Duration::from_secs(60);

const ACTOR: &str = "Bot";

/// Token cancelled on the first Ctrl+C.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let cloned_token = token.clone();

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => {
                info!(wallet = ACTOR, "Received Ctrl+C. Shutting down after the current step...");
                cloned_token.cancel();
            }
            Err(err) => {
                error!(wallet = ACTOR, "Unable to listen for shutdown signal: {}", err);
            }
        }
    });

    token
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleSummary {
    pub processed: usize,
    pub failed: usize,
}

/// Walks every wallet one at a time, forever.
///
/// Each wallet's pass runs in its own Tokio task that is awaited before the
/// next one starts, so passes never overlap and a panicking pass is
/// contained like an error.
pub struct CycleScheduler<P: WalletProcessor> {
    processor: Arc<P>,
    wallets: Vec<P::Wallet>,
    proxies: ProxyManager,
    delays: DelayRange,
    sleeper: Arc<dyn Sleeper>,
    picker: Arc<dyn VariantPicker>,
    cycle_cooldown: Duration,
    failure_cooldown: Duration,
}

impl<P: WalletProcessor> CycleScheduler<P> {
    pub fn new(
        processor: Arc<P>,
        wallets: Vec<P::Wallet>,
        proxies: ProxyManager,
        delays: DelayRange,
        sleeper: Arc<dyn Sleeper>,
        picker: Arc<dyn VariantPicker>,
    ) -> Self {
        Self {
            processor,
            wallets,
            proxies,
            delays,
            sleeper,
            picker,
            cycle_cooldown: CYCLE_COOLDOWN,
            failure_cooldown: FAILURE_COOLDOWN,
        }
    }

    pub fn with_cooldowns(mut self, cycle: Duration, failure: Duration) -> Self {
        self.cycle_cooldown = cycle;
        self.failure_cooldown = failure;
        self
    }

    /// Runs cycles until `shutdown` is cancelled. Never returns an error.
    pub async fn run(&self, shutdown: CancellationToken) {
        let mut cycle = 0u64;
        while !shutdown.is_cancelled() {
            cycle += 1;
            info!(wallet = ACTOR, "======= Starting cycle {} =======", cycle);

            let cooldown = match self.run_cycle(&shutdown).await {
                Ok(summary) => {
                    info!(
                        wallet = ACTOR,
                        "======= Cycle {} completed: {} wallets, {} failed =======",
                        cycle,
                        summary.processed,
                        summary.failed
                    );
                    info!(
                        wallet = ACTOR,
                        "Waiting {} hours before next cycle",
                        self.cycle_cooldown.as_secs() / 3600
                    );
                    self.cycle_cooldown
                }
                Err(e) => {
                    error!(wallet = ACTOR, "Cycle {} FAILED: {:#}", cycle, e);
                    self.failure_cooldown
                }
            };

            tokio::select! {
                _ = self.sleeper.sleep(cooldown) => {}
                _ = shutdown.cancelled() => {}
            }
        }
        info!(wallet = ACTOR, "Shutdown requested, scheduler stopped");
    }

    /// One pass over every wallet.
    pub async fn run_cycle(&self, shutdown: &CancellationToken) -> Result<CycleSummary> {
        self.processor.prepare_cycle().await?;

        let total = self.wallets.len();
        let mut summary = CycleSummary::default();

        for (i, wallet) in self.wallets.iter().enumerate() {
            if shutdown.is_cancelled() {
                break;
            }

            let label = self.processor.label(wallet);
            info!(wallet = ACTOR, "Processing wallet {}/{} ({})", i + 1, total, label);

            let processor = Arc::clone(&self.processor);
            let wallet = wallet.clone();
            let proxy = self.proxies.assign(i).cloned();
            let span = tracing::info_span!("wallet_pass", index = i + 1);

            let handle = tokio::spawn(
                async move { processor.process(wallet, proxy).await }.instrument(span),
            );

            match handle.await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    summary.failed += 1;
                    error!(
                        wallet = ACTOR,
                        "Failed processing wallet {}, moving to next wallet: {:#}",
                        i + 1,
                        e
                    );
                }
                Err(join_err) if join_err.is_panic() => {
                    summary.failed += 1;
                    error!(
                        wallet = ACTOR,
                        "Wallet {} pass panicked, moving to next wallet", i + 1
                    );
                }
                Err(join_err) => {
                    return Err(anyhow!("wallet {} pass was cancelled: {}", i + 1, join_err));
                }
            }
            summary.processed += 1;

            let delay = self.delays.pick(self.picker.as_ref());
            tokio::select! {
                _ = self.sleeper.sleep(delay) => {}
                _ = shutdown.cancelled() => {}
            }
        }

        Ok(summary)
    }
}
