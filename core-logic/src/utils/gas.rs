//! # Core Logic - Gas Configuration
//!
//! Chain-agnostic gas policy: the buffers applied to queried values and the
//! static fallbacks used when a query fails. Chain crates do the querying and
//! the big-integer arithmetic; this module only owns the numbers.

use serde::Deserialize;

/// What an operation looks like from its payload, for fallback gas limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationShape {
    /// Payload longer than the threshold: treated as contract creation.
    Creation,
    /// Short payload: treated as a contract call.
    Call,
    /// No payload: plain value transfer.
    Transfer,
}

impl OperationShape {
    pub fn as_str(self) -> &'static str {
        match self {
            OperationShape::Creation => "creation",
            OperationShape::Call => "call",
            OperationShape::Transfer => "transfer",
        }
    }
}

/// Standard fallback gas limits, one per [`OperationShape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardGasLimits {
    pub creation: u64,
    pub call: u64,
    pub transfer: u64,
}

impl Default for StandardGasLimits {
    fn default() -> Self {
        Self {
            creation: 4_000_000,
            call: 500_000,
            transfer: 30_000,
        }
    }
}

/// Configuration for gas quoting
#[derive(Debug, Clone, PartialEq)]
pub struct GasConfig {
    /// Gas price multiplier as `numerator / 100`. 110 = +10%.
    pub price_buffer_percent: u64,
    /// Gas limit multiplier as `numerator / 100`. 150 = +50%.
    pub limit_buffer_percent: u64,
    pub fallback_price_gwei: f64,
    /// Payloads strictly longer than this many bytes count as creation.
    pub creation_payload_threshold: usize,
    pub limits: StandardGasLimits,
}

impl Default for GasConfig {
    fn default() -> Self {
        Self {
            price_buffer_percent: 110,
            limit_buffer_percent: 150,
            fallback_price_gwei: 5.0,
            creation_payload_threshold: 1000,
            limits: StandardGasLimits::default(),
        }
    }
}

impl GasConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_price(mut self, gwei: f64) -> Self {
        self.fallback_price_gwei = gwei;
        self
    }

    pub fn with_limits(mut self, limits: StandardGasLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn fallback_price_wei(&self) -> u128 {
        gwei_to_wei(self.fallback_price_gwei)
    }

    /// Classifies an operation by its payload length in bytes.
    /// `None` and an empty payload are both a plain transfer.
    pub fn shape_for(&self, payload_len: Option<usize>) -> OperationShape {
        match payload_len {
            Some(len) if len > self.creation_payload_threshold => OperationShape::Creation,
            Some(len) if len > 0 => OperationShape::Call,
            _ => OperationShape::Transfer,
        }
    }

    pub fn fallback_limit(&self, shape: OperationShape) -> u64 {
        match shape {
            OperationShape::Creation => self.limits.creation,
            OperationShape::Call => self.limits.call,
            OperationShape::Transfer => self.limits.transfer,
        }
    }

    pub fn fallback_limit_for(&self, payload_len: Option<usize>) -> u64 {
        self.fallback_limit(self.shape_for(payload_len))
    }
}

/// Convert gwei to wei
pub fn gwei_to_wei(gwei: f64) -> u128 {
    (gwei * 1e9) as u128
}

/// Deserialize helper for GasConfig overrides
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
pub struct GasConfigOverrides {
    pub fallback_price_gwei: Option<f64>,
    pub limit_creation: Option<u64>,
    pub limit_call: Option<u64>,
    pub limit_transfer: Option<u64>,
}

impl From<GasConfigOverrides> for GasConfig {
    fn from(overrides: GasConfigOverrides) -> Self {
        let defaults = StandardGasLimits::default();
        Self {
            fallback_price_gwei: overrides.fallback_price_gwei.unwrap_or(5.0),
            limits: StandardGasLimits {
                creation: overrides.limit_creation.unwrap_or(defaults.creation),
                call: overrides.limit_call.unwrap_or(defaults.call),
                transfer: overrides.limit_transfer.unwrap_or(defaults.transfer),
            },
            ..Self::default()
        }
    }
}
