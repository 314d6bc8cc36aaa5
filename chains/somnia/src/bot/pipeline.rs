//! Per-wallet state machine.
//!
//! `BalanceCheck -> FaucetClaim? -> BalanceCheck -> ThresholdGate ->
//! DeploymentBatch -> TransferBatch -> Done`. Each stage isolates its own
//! failures; only an unreadable balance or an under-funded wallet ends the
//! pass early.

use crate::client::ChainClient;
use crate::config::{SomniaConfig, SYMBOL};
use crate::contracts::{ContractCompiler, ContractKind};
use crate::faucet::FaucetClient;
use crate::task::{
    check_balance, claim_faucet, DeployConfidentialErc20Task, DeployMemeTokenTask, DeployNftTask,
    FaucetOutcome, SomniaTask, Task, TaskContext, TransferTask,
};
use crate::utils::gas::GasEstimator;
use anyhow::anyhow;
use async_trait::async_trait;
use core_logic::config::ProxyConfig;
use core_logic::error::OpError;
use core_logic::traits::{Sleeper, VariantPicker, WalletProcessor};
use core_logic::{mask_address, RetryPolicy};
use ethers::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Wallets below this balance (0.01 native units) skip deployments and transfers.
pub const MIN_BALANCE_WEI: u64 = 10_000_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    BalanceCheck,
    FaucetClaim,
    ThresholdGate,
    DeploymentBatch,
    TransferBatch,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    BalanceUnavailable(OpError),
    BelowThreshold { balance: U256 },
}

/// Outcome of one sequential batch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub attempted: u32,
    pub succeeded: u32,
    pub stopped_for_funds: bool,
}

/// What happened to one wallet during one cycle. Not kept across cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletRunRecord {
    pub address: Address,
    pub stages: Vec<Stage>,
    pub initial_balance: Option<U256>,
    pub faucet: Option<Result<FaucetOutcome, OpError>>,
    pub gated_balance: Option<U256>,
    pub deployments: Vec<(ContractKind, BatchReport)>,
    pub transfers: Option<BatchReport>,
    pub stopped: Option<StopReason>,
}

impl WalletRunRecord {
    fn new(address: Address) -> Self {
        Self {
            address,
            stages: Vec::new(),
            initial_balance: None,
            faucet: None,
            gated_balance: None,
            deployments: Vec::new(),
            transfers: None,
            stopped: None,
        }
    }

    pub fn deployment(&self, kind: ContractKind) -> Option<&BatchReport> {
        self.deployments
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, report)| report)
    }

    pub fn reached(&self, stage: Stage) -> bool {
        self.stages.contains(&stage)
    }
}

/// Collaborators shared by every wallet pass. Read-only.
#[derive(Clone)]
pub struct PipelineServices {
    pub client: Arc<dyn ChainClient>,
    pub faucet: Arc<dyn FaucetClient>,
    pub compiler: Arc<dyn ContractCompiler>,
    pub sleeper: Arc<dyn Sleeper>,
    pub picker: Arc<dyn VariantPicker>,
}

#[derive(Clone)]
pub struct WalletPipeline {
    config: Arc<SomniaConfig>,
    services: PipelineServices,
}

impl WalletPipeline {
    pub fn new(config: Arc<SomniaConfig>, services: PipelineServices) -> Self {
        Self { config, services }
    }

    fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::from_settings(&self.config.retry).with_sleeper(self.services.sleeper.clone())
    }

    pub fn context(&self, wallet: LocalWallet, proxy: Option<ProxyConfig>) -> TaskContext {
        TaskContext {
            wallet,
            proxy,
            client: self.services.client.clone(),
            faucet: self.services.faucet.clone(),
            compiler: self.services.compiler.clone(),
            gas: GasEstimator::new(self.services.client.clone())
                .with_config(self.config.gas_config()),
            retry: self.retry_policy(),
            sleeper: self.services.sleeper.clone(),
            picker: self.services.picker.clone(),
            delays: self.config.delays,
        }
    }

    /// One full pass for one wallet.
    pub async fn run(&self, wallet: LocalWallet, proxy: Option<ProxyConfig>) -> WalletRunRecord {
        let ctx = self.context(wallet, proxy);
        let actor = ctx.actor();
        let mut record = WalletRunRecord::new(ctx.address());

        info!(wallet = %actor, "==== Starting wallet processing ====");
        self.drive(&ctx, &mut record).await;
        record.stages.push(Stage::Done);
        info!(wallet = %actor, "==== Wallet processing completed ====");

        record
    }

    async fn drive(&self, ctx: &TaskContext, record: &mut WalletRunRecord) {
        let actor = ctx.actor();
        let features = &self.config.features;

        record.stages.push(Stage::BalanceCheck);
        match check_balance(ctx).await {
            Ok(balance) => record.initial_balance = Some(balance),
            Err(e) => {
                error!(wallet = %actor, "Balance check FAILED: {}", e);
                record.stopped = Some(StopReason::BalanceUnavailable(e));
                return;
            }
        }

        if features.claim_faucet {
            record.stages.push(Stage::FaucetClaim);
            let outcome = claim_faucet(ctx).await;
            if outcome.is_ok() {
                ctx.random_delay().await;
            }
            record.faucet = Some(outcome);
        } else {
            info!(wallet = %actor, "Faucet claiming is disabled in config");
        }

        record.stages.push(Stage::BalanceCheck);
        let balance = match check_balance(ctx).await {
            Ok(balance) => balance,
            Err(e) => {
                error!(wallet = %actor, "Balance recheck FAILED: {}", e);
                record.stopped = Some(StopReason::BalanceUnavailable(e));
                return;
            }
        };
        record.gated_balance = Some(balance);

        record.stages.push(Stage::ThresholdGate);
        if balance < U256::from(MIN_BALANCE_WEI) {
            info!(
                wallet = %actor,
                "Balance below threshold (0.01 {}), skipping operations for this wallet",
                SYMBOL
            );
            record.stopped = Some(StopReason::BelowThreshold { balance });
            return;
        }
        info!(wallet = %actor, "Balance sufficient, proceeding with operations");

        if features.deploy_contracts {
            record.stages.push(Stage::DeploymentBatch);
            self.deployment_batch(ctx, record).await;
        } else {
            info!(wallet = %actor, "Contract deployments are disabled in config");
        }

        if features.transfer_to_team {
            record.stages.push(Stage::TransferBatch);
            record.transfers = self.transfer_batch(ctx).await;
        } else {
            info!(wallet = %actor, "Team transfers are disabled in config");
        }
    }

    async fn deployment_batch(&self, ctx: &TaskContext, record: &mut WalletRunRecord) {
        let counts = &self.config.deployments;
        let plan: [(ContractKind, u32, Box<SomniaTask>); 3] = [
            (
                ContractKind::ConfidentialErc20,
                counts.confidential_erc20_count,
                Box::new(DeployConfidentialErc20Task),
            ),
            (ContractKind::Nft, counts.nft_count, Box::new(DeployNftTask)),
            (
                ContractKind::MemeToken,
                counts.meme_token_count,
                Box::new(DeployMemeTokenTask),
            ),
        ];

        info!(wallet = %ctx.actor(), "Starting contract deployments");
        for (kind, count, task) in plan.iter() {
            let report = run_batch(ctx, task.as_ref(), *count).await;
            record.deployments.push((*kind, report));
        }
    }

    async fn transfer_batch(&self, ctx: &TaskContext) -> Option<BatchReport> {
        let actor = ctx.actor();

        let amount = match self.config.transfers.amount_wei() {
            Ok(amount) => amount,
            Err(e) => {
                error!(wallet = %actor, "Skipping team transfers: {}", e);
                return None;
            }
        };
        let destinations = match self.config.team_addresses() {
            Ok(destinations) => destinations,
            Err(e) => {
                error!(wallet = %actor, "Skipping team transfers: {}", e);
                return None;
            }
        };

        info!(wallet = %actor, "Starting team transfers");
        let mut report = BatchReport::default();
        for to in destinations {
            let task = TransferTask { to, amount };
            report.attempted += 1;
            match task.run(ctx).await {
                Ok(result) => {
                    report.succeeded += 1;
                    info!(wallet = %actor, "{} SUCCESS", result.message);
                }
                Err(e) if e.is_insufficient_funds() => {
                    warn!(
                        wallet = %actor,
                        "Insufficient funds for transfer to {}, stopping transfers",
                        mask_address(&format!("{:?}", to))
                    );
                    report.stopped_for_funds = true;
                    break;
                }
                Err(e) => {
                    error!(wallet = %actor, "Team transfer FAILED: {}", e);
                }
            }
            ctx.random_delay().await;
        }
        Some(report)
    }
}

/// Runs `task` up to `count` times. Ordinary failures move on to the next
/// iteration; running out of funds ends the batch.
async fn run_batch(ctx: &TaskContext, task: &SomniaTask, count: u32) -> BatchReport {
    let actor = ctx.actor();
    let mut report = BatchReport::default();

    for i in 1..=count {
        info!(
            wallet = %actor,
            "Attempting {} deployment {}/{}", task.name(), i, count
        );
        report.attempted += 1;

        match task.run(ctx).await {
            Ok(result) => {
                report.succeeded += 1;
                info!(wallet = %actor, "{} SUCCESS", result.message);
                ctx.random_delay().await;
            }
            Err(e) if e.is_insufficient_funds() => {
                warn!(
                    wallet = %actor,
                    "Insufficient funds for {}: {}", task.name(), e
                );
                report.stopped_for_funds = true;
                break;
            }
            Err(e) => {
                error!(wallet = %actor, "{} deployment FAILED: {}", task.name(), e);
            }
        }
    }
    report
}

#[async_trait]
impl WalletProcessor for WalletPipeline {
    type Wallet = LocalWallet;

    fn label(&self, wallet: &LocalWallet) -> String {
        mask_address(&format!("{:?}", wallet.address()))
    }

    /// Confirms the RPC endpoint is reachable and serves the configured chain.
    async fn prepare_cycle(&self) -> anyhow::Result<()> {
        let client = self.services.client.clone();
        let chain_id = self
            .retry_policy()
            .run("Bot", "Chain id check", || client.chain_id())
            .await
            .map_err(|e| anyhow!("RPC unavailable: {}", e))?;

        if chain_id != self.config.chain_id {
            return Err(anyhow!(
                "RPC serves chain {} but {} is configured",
                chain_id,
                self.config.chain_id
            ));
        }
        Ok(())
    }

    async fn process(&self, wallet: LocalWallet, proxy: Option<ProxyConfig>) -> anyhow::Result<()> {
        let record = self.run(wallet, proxy).await;
        match record.stopped {
            Some(StopReason::BalanceUnavailable(e)) => {
                Err(anyhow!("balance of {:?} unavailable: {}", record.address, e))
            }
            _ => Ok(()),
        }
    }
}
