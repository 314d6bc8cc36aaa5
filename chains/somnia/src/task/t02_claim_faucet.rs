use crate::task::TaskContext;
use core_logic::error::OpError;
use tracing::{error, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaucetOutcome {
    Claimed(String),
    /// The faucet answered 429. Not a failure.
    Cooldown,
}

/// Claims testnet funds through the wallet's proxy.
///
/// A cooldown answer becomes [`FaucetOutcome::Cooldown`] before the retry
/// policy sees it, so it is never retried.
pub async fn claim_faucet(ctx: &TaskContext) -> Result<FaucetOutcome, OpError> {
    let actor = ctx.actor();
    let address = ctx.address();
    let proxy = ctx.proxy.as_ref();

    info!(wallet = %actor, "Claiming faucet...");

    let result = ctx
        .retry
        .run(&actor, "Faucet claim", || async {
            match ctx.faucet.claim(address, proxy).await {
                Ok(hash) => Ok(FaucetOutcome::Claimed(hash)),
                Err(OpError::RateLimited { .. }) => Ok(FaucetOutcome::Cooldown),
                Err(e) => Err(e),
            }
        })
        .await;

    match &result {
        Ok(FaucetOutcome::Claimed(hash)) => {
            info!(wallet = %actor, "Faucet claim SUCCESS: {}", hash)
        }
        Ok(FaucetOutcome::Cooldown) => {
            info!(wallet = %actor, "Faucet is on cooldown for this wallet, continuing")
        }
        Err(e) => error!(wallet = %actor, "Faucet claim FAILED: {}", e),
    }
    result
}
