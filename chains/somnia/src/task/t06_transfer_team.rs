use crate::client::UnsignedOperation;
use crate::config::SYMBOL;
use crate::task::{Task, TaskContext, TaskResult};
use async_trait::async_trait;
use core_logic::error::OpError;
use core_logic::mask_address;
use ethers::prelude::*;
use tracing::info;

/// Sends a fixed native amount to one destination wallet.
pub struct TransferTask {
    pub to: Address,
    pub amount: U256,
}

#[async_trait]
impl Task<TaskContext> for TransferTask {
    fn name(&self) -> &str {
        "Transfer"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult, OpError> {
        let actor = ctx.actor();
        let from = ctx.address();
        let (to, amount) = (self.to, self.amount);
        let target = mask_address(&format!("{:?}", to));

        info!(
            wallet = %actor,
            "Sending {} {} to {}",
            ethers::utils::format_ether(amount),
            SYMBOL,
            target
        );
        let receipt = ctx
            .execute(&format!("Transfer to {}", target), || {
                Ok(UnsignedOperation::transfer(from, to, amount))
            })
            .await?;

        Ok(TaskResult {
            message: format!(
                "Transferred {} {} to {}",
                ethers::utils::format_ether(amount),
                SYMBOL,
                target
            ),
            tx_hash: Some(format!("{:?}", receipt.tx_hash)),
        })
    }
}
