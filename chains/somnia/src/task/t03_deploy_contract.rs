use crate::client::{OperationReceipt, UnsignedOperation};
use crate::contracts::{CompiledContract, ContractKind};
use crate::task::{Task, TaskContext, TaskResult};
use crate::utils::names;
use async_trait::async_trait;
use core_logic::error::OpError;
use ethers::abi::Token;
use ethers::prelude::*;
use tracing::info;

pub struct DeployedContract {
    pub compiled: CompiledContract,
    pub receipt: OperationReceipt,
    pub address: Address,
}

/// Compiles `kind` and deploys it with `args`.
///
/// Compilation is not retried; a bad template or missing compiler is
/// [`OpError::Invalid`]. The deployment transaction is retried as a unit.
pub async fn deploy_contract(
    ctx: &TaskContext,
    kind: ContractKind,
    args: &[Token],
) -> Result<DeployedContract, OpError> {
    let actor = ctx.actor();
    let from = ctx.address();

    let compiled = ctx.compiler.compile(kind)?;
    let data = compiled.deploy_data(args)?;

    info!(wallet = %actor, "Deploying {}...", kind);
    let receipt = ctx
        .execute(&format!("Deploy {}", kind), || {
            Ok(UnsignedOperation::deploy(from, data.clone()))
        })
        .await?;

    let address = receipt
        .contract_address
        .ok_or_else(|| OpError::invalid(kind.name(), "receipt has no contract address"))?;

    info!(wallet = %actor, "{} deployed SUCCESS at {:?}", kind, address);
    Ok(DeployedContract {
        compiled,
        receipt,
        address,
    })
}

pub struct DeployConfidentialErc20Task;

#[async_trait]
impl Task<TaskContext> for DeployConfidentialErc20Task {
    fn name(&self) -> &str {
        "ConfidentialERC20"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult, OpError> {
        let params = names::confidential_token(ctx.picker.as_ref());
        let deployed =
            deploy_contract(ctx, ContractKind::ConfidentialErc20, &params.constructor_args())
                .await?;

        Ok(TaskResult {
            message: format!(
                "Deployed {} ({}) at {:?}",
                params.name, params.symbol, deployed.address
            ),
            tx_hash: Some(format!("{:?}", deployed.receipt.tx_hash)),
        })
    }
}

pub struct DeployMemeTokenTask;

#[async_trait]
impl Task<TaskContext> for DeployMemeTokenTask {
    fn name(&self) -> &str {
        "MemeToken"
    }

    async fn run(&self, ctx: &TaskContext) -> Result<TaskResult, OpError> {
        let params = names::meme_token(ctx.picker.as_ref());
        let deployed =
            deploy_contract(ctx, ContractKind::MemeToken, &params.constructor_args()).await?;

        Ok(TaskResult {
            message: format!(
                "Deployed {} ({}) at {:?}",
                params.name, params.symbol, deployed.address
            ),
            tx_hash: Some(format!("{:?}", deployed.receipt.tx_hash)),
        })
    }
}
