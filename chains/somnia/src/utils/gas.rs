use crate::client::{ChainClient, GasQuote, UnsignedOperation};
use core_logic::GasConfig;
use ethers::prelude::*;
use std::sync::Arc;
use tracing::debug;

/// Gas price and limit for one pending operation.
///
/// Network values get a buffer (price +10%, limit +50%, rounded down).
/// When a query fails the static fallbacks from [`GasConfig`] are used, so
/// [`GasEstimator::quote`] always resolves.
#[derive(Clone)]
pub struct GasEstimator {
    client: Arc<dyn ChainClient>,
    config: GasConfig,
}

impl GasEstimator {
    pub fn new(client: Arc<dyn ChainClient>) -> Self {
        Self {
            client,
            config: GasConfig::default(),
        }
    }

    pub fn with_config(mut self, config: GasConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &GasConfig {
        &self.config
    }

    pub async fn quote(&self, op: &UnsignedOperation) -> GasQuote {
        GasQuote {
            price: self.price().await,
            limit: self.limit(op).await,
        }
    }

    pub async fn price(&self) -> U256 {
        match self.client.gas_price().await {
            Ok(price) => buffered(price, self.config.price_buffer_percent),
            Err(e) => {
                let fallback = U256::from(self.config.fallback_price_wei());
                debug!("Gas price query failed ({}), using fallback {} wei", e, fallback);
                fallback
            }
        }
    }

    pub async fn limit(&self, op: &UnsignedOperation) -> U256 {
        match self.client.estimate_gas(op).await {
            Ok(estimate) => buffered(estimate, self.config.limit_buffer_percent),
            Err(e) => {
                let shape = self.config.shape_for(op.payload_len());
                let fallback = self.config.fallback_limit(shape);
                debug!(
                    "Gas estimation failed ({}), using {} fallback {}",
                    e,
                    shape.as_str(),
                    fallback
                );
                U256::from(fallback)
            }
        }
    }
}

/// `value * percent / 100`, rounded down.
pub fn buffered(value: U256, percent: u64) -> U256 {
    value.saturating_mul(U256::from(percent)) / U256::from(100u64)
}
