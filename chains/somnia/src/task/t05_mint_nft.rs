use crate::client::{OperationReceipt, UnsignedOperation};
use crate::contracts::CompiledContract;
use crate::task::TaskContext;
use core_logic::error::OpError;
use ethers::prelude::*;

/// Calls `mint()` on a deployed collection, paying `price`.
pub async fn mint_nft(
    ctx: &TaskContext,
    collection: &CompiledContract,
    contract: Address,
    price: U256,
) -> Result<OperationReceipt, OpError> {
    let from = ctx.address();
    let data = collection.call_data("mint", &[])?;

    ctx.execute("Mint NFT", || {
        Ok(UnsignedOperation::call(from, contract, data.clone(), Some(price)))
    })
    .await
}
