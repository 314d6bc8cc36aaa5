//! Chain access behind a narrow trait.
//!
//! [`ChainClient`] is the only way the bot talks to the RPC node. Every
//! failure leaves this module already classified as an [`OpError`], so the
//! layers above never inspect error text.

use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::clean_error_message;
use core_logic::error::{is_insufficient_funds_message, OpError};
use ethers::prelude::*;
use ethers::types::transaction::eip2718::TypedTransaction;
use std::time::Duration;

/// Inputs to gas estimation and signing. Built fresh for every attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnsignedOperation {
    pub from: Address,
    pub to: Option<Address>,
    pub data: Option<Bytes>,
    pub value: Option<U256>,
}

impl UnsignedOperation {
    pub fn deploy(from: Address, data: Bytes) -> Self {
        Self {
            from,
            data: Some(data),
            ..Default::default()
        }
    }

    pub fn call(from: Address, to: Address, data: Bytes, value: Option<U256>) -> Self {
        Self {
            from,
            to: Some(to),
            data: Some(data),
            value,
        }
    }

    pub fn transfer(from: Address, to: Address, value: U256) -> Self {
        Self {
            from,
            to: Some(to),
            value: Some(value),
            ..Default::default()
        }
    }

    /// Decoded payload length in bytes. Empty data counts as no payload.
    pub fn payload_len(&self) -> Option<usize> {
        self.data.as_ref().map(|d| d.len()).filter(|len| *len > 0)
    }

    pub fn to_typed_transaction(&self, quote: Option<&GasQuote>) -> TypedTransaction {
        let mut tx = TransactionRequest::new().from(self.from);
        if let Some(to) = self.to {
            tx = tx.to(to);
        }
        if let Some(data) = &self.data {
            tx = tx.data(data.clone());
        }
        if let Some(value) = self.value {
            tx = tx.value(value);
        }
        if let Some(quote) = quote {
            tx = tx.gas(quote.limit).gas_price(quote.price);
        }
        tx.into()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GasQuote {
    pub price: U256,
    pub limit: U256,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationReceipt {
    pub tx_hash: H256,
    pub contract_address: Option<Address>,
}

#[async_trait]
pub trait ChainClient: Send + Sync {
    async fn chain_id(&self) -> Result<u64, OpError>;

    async fn balance(&self, address: Address) -> Result<U256, OpError>;

    async fn gas_price(&self) -> Result<U256, OpError>;

    async fn estimate_gas(&self, op: &UnsignedOperation) -> Result<U256, OpError>;

    /// Signs `op` with `wallet`, broadcasts it and waits for the receipt.
    async fn sign_and_submit(
        &self,
        wallet: &LocalWallet,
        op: &UnsignedOperation,
        quote: &GasQuote,
    ) -> Result<OperationReceipt, OpError>;
}

/// Stateless handle over an HTTP provider. Cheap to clone and share.
#[derive(Debug, Clone)]
pub struct EthersChainClient {
    provider: Provider<Http>,
    chain_id: u64,
}

impl EthersChainClient {
    pub fn new(rpc_url: &str, chain_id: u64) -> Result<Self> {
        let provider = Provider::<Http>::try_from(rpc_url)
            .with_context(|| format!("Invalid RPC URL {}", rpc_url))?
            .interval(Duration::from_millis(1000));
        Ok(Self { provider, chain_id })
    }
}

#[async_trait]
impl ChainClient for EthersChainClient {
    async fn chain_id(&self) -> Result<u64, OpError> {
        self.provider
            .get_chainid()
            .await
            .map(|id| id.as_u64())
            .map_err(|e| classify_middleware_error("chain id", e))
    }

    async fn balance(&self, address: Address) -> Result<U256, OpError> {
        self.provider
            .get_balance(address, None)
            .await
            .map_err(|e| classify_middleware_error("balance query", e))
    }

    async fn gas_price(&self) -> Result<U256, OpError> {
        self.provider
            .get_gas_price()
            .await
            .map_err(|e| classify_middleware_error("gas price query", e))
    }

    async fn estimate_gas(&self, op: &UnsignedOperation) -> Result<U256, OpError> {
        self.provider
            .estimate_gas(&op.to_typed_transaction(None), None)
            .await
            .map_err(|e| classify_middleware_error("gas estimation", e))
    }

    async fn sign_and_submit(
        &self,
        wallet: &LocalWallet,
        op: &UnsignedOperation,
        quote: &GasQuote,
    ) -> Result<OperationReceipt, OpError> {
        let signer = wallet.clone().with_chain_id(self.chain_id);
        let client = SignerMiddleware::new(self.provider.clone(), signer);

        let pending = client
            .send_transaction(op.to_typed_transaction(Some(quote)), None)
            .await
            .map_err(|e| classify_middleware_error("submit", e))?;
        let tx_hash = pending.tx_hash();

        let receipt = pending
            .await
            .map_err(|e| classify_middleware_error("receipt", e))?
            .ok_or_else(|| {
                OpError::transient("receipt", format!("transaction {:?} dropped", tx_hash))
            })?;

        if receipt.status == Some(U64::zero()) {
            return Err(OpError::transient(
                "receipt",
                format!("transaction {:?} reverted", receipt.transaction_hash),
            ));
        }

        Ok(OperationReceipt {
            tx_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
        })
    }
}

/// Turns a provider or signer failure into an [`OpError`].
///
/// The JSON-RPC error body is preferred over the wrapper's display text
/// because that is where nodes report funds shortfalls.
pub fn classify_middleware_error<E: MiddlewareError>(context: &str, err: E) -> OpError {
    let message = match err.as_error_response() {
        Some(response) => response.message.clone(),
        None => err.to_string(),
    };
    classify_message(context, &message)
}

pub fn classify_message(context: &str, message: &str) -> OpError {
    let reason = clean_error_message(message);
    if is_insufficient_funds_message(message) {
        OpError::insufficient_funds(reason)
    } else {
        OpError::transient(context, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_len() {
        let from = Address::zero();
        assert_eq!(
            UnsignedOperation::deploy(from, Bytes::from(vec![0u8; 1200])).payload_len(),
            Some(1200)
        );
        assert_eq!(
            UnsignedOperation::call(from, from, Bytes::new(), None).payload_len(),
            None
        );
        assert_eq!(
            UnsignedOperation::transfer(from, from, U256::one()).payload_len(),
            None
        );
    }

    #[test]
    fn test_typed_transaction_carries_quote() {
        let op =
            UnsignedOperation::transfer(Address::zero(), Address::repeat_byte(1), U256::from(7));
        let quote = GasQuote {
            price: U256::from(100),
            limit: U256::from(21_000),
        };
        let tx = op.to_typed_transaction(Some(&quote));
        assert_eq!(tx.gas(), Some(&U256::from(21_000)));
        assert_eq!(tx.gas_price(), Some(U256::from(100)));
        assert_eq!(tx.value(), Some(&U256::from(7)));
        assert_eq!(tx.to_addr(), Some(&Address::repeat_byte(1)));
    }

    #[test]
    fn test_classify_message() {
        assert!(classify_message("submit", "insufficient funds for gas * price + value")
            .is_insufficient_funds());
        assert_eq!(
            classify_message("submit", "nonce too low"),
            OpError::transient("submit", "nonce too low")
        );
    }
}
