use crate::contracts::ContractKind;
use crate::task::{deploy_contract, mint_nft, Task, TaskContext, TaskResult};
use crate::utils::names;
use async_trait::async_trait;
use core_logic::error::OpError;
use tracing::{error, info, warn};

/// Deploys a collection, then mints 1 to 5 tokens from it.
///
/// Each mint is retried on its own. Running out of funds ends the mint loop
/// but the deployment still counts as a success.
pub struct DeployNftTask;

#[async_trait]
impl Task<TaskContext> for DeployNftTask {
    fn name(&self) -> &str {
        "NFT"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult, OpError> {
        let actor = ctx.actor();
        let params = names::nft_collection(ctx.picker.as_ref());
        let deployed = deploy_contract(ctx, ContractKind::Nft, &params.constructor_args()).await?;

        let count = names::mint_count(ctx.picker.as_ref());
        info!(wallet = %actor, "Minting {} NFTs...", count);

        let mut minted = 0;
        for i in 1..=count {
            match mint_nft(ctx, &deployed.compiled, deployed.address, params.price).await {
                Ok(receipt) => {
                    minted += 1;
                    info!(
                        wallet = %actor,
                        "Mint {}/{} SUCCESS: {:?}", i, count, receipt.tx_hash
                    );
                }
                Err(e) if e.is_insufficient_funds() => {
                    warn!(
                        wallet = %actor,
                        "Insufficient funds for mint {}/{}, stopping mint loop", i, count
                    );
                    break;
                }
                Err(e) => {
                    error!(wallet = %actor, "Mint {}/{} FAILED: {}", i, count, e);
                }
            }

            ctx.pause(names::mint_delay(ctx.picker.as_ref())).await;
        }

        Ok(TaskResult {
            message: format!(
                "Deployed {} ({}) at {:?}, minted {}/{}",
                params.name, params.symbol, deployed.address, minted, count
            ),
            tx_hash: Some(format!("{:?}", deployed.receipt.tx_hash)),
        })
    }
}
