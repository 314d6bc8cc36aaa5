use crate::config::ProxyConfig;
use crate::error::OpError;
use async_trait::async_trait;
use rand::Rng;
use std::time::Duration;

/// Injectable clock used for every delay the bot takes.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Real clock backed by the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Chooses one of `n` variants. Used for names, counts and jitter.
pub trait VariantPicker: Send + Sync {
    /// Returns an index in `0..n`. `n` is never zero.
    fn pick(&self, n: usize) -> usize;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RandomPicker;

impl VariantPicker for RandomPicker {
    fn pick(&self, n: usize) -> usize {
        rand::thread_rng().gen_range(0..n.max(1))
    }
}

#[derive(Debug, Clone)]
pub struct TaskResult {
    pub message: String,
    pub tx_hash: Option<String>,
}

#[async_trait]
pub trait Task<Ctx>: Send + Sync {
    /// Returns the name of the task
    fn name(&self) -> &str;

    /// Executes the task
    async fn run(&self, ctx: &Ctx) -> Result<TaskResult, OpError>;
}

/// One wallet's pass through a cycle.
///
/// Implementations own their failure handling; anything they let escape
/// (including a panic) is contained by [`crate::CycleScheduler`].
#[async_trait]
pub trait WalletProcessor: Send + Sync + 'static {
    type Wallet: Clone + Send + Sync + 'static;

    /// Short label for logs, usually the masked address.
    fn label(&self, wallet: &Self::Wallet) -> String;

    /// Called once before each cycle. An error here fails the whole cycle.
    async fn prepare_cycle(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn process(
        &self,
        wallet: Self::Wallet,
        proxy: Option<ProxyConfig>,
    ) -> anyhow::Result<()>;
}
