use crate::config::SYMBOL;
use crate::task::TaskContext;
use core_logic::error::OpError;
use ethers::prelude::*;
use tracing::info;

/// Native balance of the context wallet, retried on transient failures.
pub async fn check_balance(ctx: &TaskContext) -> Result<U256, OpError> {
    let actor = ctx.actor();
    let address = ctx.address();

    let balance = ctx
        .retry
        .run(&actor, "Balance check", || ctx.client.balance(address))
        .await?;

    info!(
        wallet = %actor,
        "Balance: {} {}",
        ethers::utils::format_ether(balance),
        SYMBOL
    );
    Ok(balance)
}
