use crate::client::{ChainClient, OperationReceipt, UnsignedOperation};
use crate::contracts::ContractCompiler;
use crate::faucet::FaucetClient;
use crate::utils::gas::GasEstimator;
use core_logic::config::{DelayRange, ProxyConfig};
use core_logic::error::OpError;
use core_logic::traits::{Sleeper, VariantPicker};
use core_logic::{mask_address, RetryPolicy};
use ethers::prelude::*;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub mod t01_check_balance;
pub mod t02_claim_faucet;
pub mod t03_deploy_contract;
pub mod t04_deploy_nft;
pub mod t05_mint_nft;
pub mod t06_transfer_team;

pub use self::t01_check_balance::check_balance;
pub use self::t02_claim_faucet::{claim_faucet, FaucetOutcome};
pub use self::t03_deploy_contract::{
    deploy_contract, DeployConfidentialErc20Task, DeployMemeTokenTask,
};
pub use self::t04_deploy_nft::DeployNftTask;
pub use self::t05_mint_nft::mint_nft;
pub use self::t06_transfer_team::TransferTask;

pub use core_logic::traits::{Task, TaskResult};

/// Everything one wallet's operations need. Built once per wallet pass.
#[derive(Clone)]
pub struct TaskContext {
    pub wallet: LocalWallet,
    pub proxy: Option<ProxyConfig>,
    pub client: Arc<dyn ChainClient>,
    pub faucet: Arc<dyn FaucetClient>,
    pub compiler: Arc<dyn ContractCompiler>,
    pub gas: GasEstimator,
    pub retry: RetryPolicy,
    pub sleeper: Arc<dyn Sleeper>,
    pub picker: Arc<dyn VariantPicker>,
    pub delays: DelayRange,
}

impl TaskContext {
    pub fn address(&self) -> Address {
        self.wallet.address()
    }

    /// Masked address used as the `wallet` field of every log line.
    pub fn actor(&self) -> String {
        mask_address(&format!("{:?}", self.address()))
    }

    /// Inter-operation jitter from the configured delay range.
    pub async fn random_delay(&self) {
        let delay = self.delays.pick(self.picker.as_ref());
        self.pause(delay).await;
    }

    pub async fn pause(&self, delay: Duration) {
        info!(
            wallet = %self.actor(),
            "Waiting {:.1} seconds...",
            delay.as_secs_f64()
        );
        self.sleeper.sleep(delay).await;
    }

    /// Build, quote, sign and submit as one retried unit.
    ///
    /// `build` runs on every attempt so each attempt gets a fresh operation
    /// and a fresh gas quote.
    pub async fn execute<B>(&self, label: &str, build: B) -> Result<OperationReceipt, OpError>
    where
        B: Fn() -> Result<UnsignedOperation, OpError> + Send + Sync,
    {
        let actor = self.actor();
        self.retry
            .run(&actor, label, || async {
                let op = build()?;
                let quote = self.gas.quote(&op).await;
                self.client.sign_and_submit(&self.wallet, &op, &quote).await
            })
            .await
    }
}

// Trait alias
pub type SomniaTask = dyn Task<TaskContext> + Send + Sync;
