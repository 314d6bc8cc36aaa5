//! # Core Error Types
//!
//! Centralized error definitions for the core-logic crate.
//! All errors implement `std::error::Error` and `std::fmt::Display`.
//!
//! [`OpError`] is the closed taxonomy every on-chain or HTTP operation
//! reports. It is produced once, where the underlying call fails, so that
//! retry and loop decisions are a `match` over [`ErrorKind`].

use thiserror::Error;

/// Configuration-related errors
#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Private key list errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Invalid private key format: expected 64 hex chars with optional 0x prefix")]
    InvalidKeyFormat,

    #[error("Private key has wrong length: expected 64 hex chars, got {length}")]
    InvalidKeyLength { length: usize },

    #[error("Private key is not a valid secp256k1 secret (zero or out of range)")]
    InvalidKey,

    #[error("Mnemonic phrases ({words} words) are not supported, provide a raw private key")]
    UnsupportedMnemonic { words: usize },
}

/// Proxy list errors
#[derive(Error, Debug, Clone)]
pub enum NetworkError {
    #[error("Invalid proxy '{proxy}': {reason}")]
    InvalidProxy { proxy: String, reason: String },
}

/// Failure class of an operation. Drives retry and loop-break decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The signing account cannot cover the cost. Structural, never retried.
    InsufficientFunds,
    /// A remote service asked us to back off (faucet cooldown).
    RateLimited,
    /// Network, RPC or estimation hiccup. Retried with backoff.
    Transient,
    /// Bad compile output, malformed input. Skipped for the affected unit.
    Invalid,
}

impl ErrorKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, ErrorKind::Transient)
    }
}

/// Anything a [`crate::RetryPolicy`] can make decisions about.
pub trait Classify {
    fn kind(&self) -> ErrorKind;
}

/// Typed failure of a single on-chain or HTTP operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OpError {
    #[error("insufficient funds: {reason}")]
    InsufficientFunds { reason: String },

    #[error("rate limited by {endpoint}")]
    RateLimited { endpoint: String },

    #[error("{context}: {reason}")]
    Transient { context: String, reason: String },

    #[error("invalid {unit}: {reason}")]
    Invalid { unit: String, reason: String },
}

impl OpError {
    pub fn transient(context: impl Into<String>, reason: impl Into<String>) -> Self {
        OpError::Transient {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        OpError::Invalid {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    pub fn insufficient_funds(reason: impl Into<String>) -> Self {
        OpError::InsufficientFunds {
            reason: reason.into(),
        }
    }

    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self, OpError::InsufficientFunds { .. })
    }
}

impl Classify for OpError {
    fn kind(&self) -> ErrorKind {
        match self {
            OpError::InsufficientFunds { .. } => ErrorKind::InsufficientFunds,
            OpError::RateLimited { .. } => ErrorKind::RateLimited,
            OpError::Transient { .. } => ErrorKind::Transient,
            OpError::Invalid { .. } => ErrorKind::Invalid,
        }
    }
}

/// Failure signatures nodes use when an account cannot pay for a transaction.
pub const INSUFFICIENT_FUNDS_SIGNATURES: [&str; 3] =
    ["insufficient funds", "insufficient balance", "insufficient_funds"];

/// Boundary check used when turning a raw node or HTTP message into an [`OpError`].
pub fn is_insufficient_funds_message(message: &str) -> bool {
    let lower = message.to_lowercase();
    INSUFFICIENT_FUNDS_SIGNATURES
        .iter()
        .any(|signature| lower.contains(signature))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(ErrorKind::Transient.is_retryable());
        assert!(!ErrorKind::InsufficientFunds.is_retryable());
        assert!(!ErrorKind::RateLimited.is_retryable());
        assert!(!ErrorKind::Invalid.is_retryable());
    }

    #[test]
    fn test_funds_signatures() {
        assert!(is_insufficient_funds_message(
            "insufficient funds for gas * price + value"
        ));
        assert!(is_insufficient_funds_message("code=INSUFFICIENT_FUNDS"));
        assert!(is_insufficient_funds_message("Insufficient Balance for transfer"));
        assert!(!is_insufficient_funds_message("nonce too low"));
    }

    #[test]
    fn test_op_error_kind() {
        assert_eq!(
            OpError::insufficient_funds("x").kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(
            OpError::RateLimited {
                endpoint: "faucet".into()
            }
            .kind(),
            ErrorKind::RateLimited
        );
        assert_eq!(OpError::transient("rpc", "timeout").kind(), ErrorKind::Transient);
        assert_eq!(OpError::invalid("contract", "bad").kind(), ErrorKind::Invalid);
    }
}
