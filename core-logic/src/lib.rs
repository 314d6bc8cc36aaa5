//! # Core Logic - Shared Plumbing for Testnet Bots
//!
//! Chain-agnostic pieces every bot crate builds on: typed errors, the retry
//! policy, gas buffer/fallback rules, key and proxy loading, logging and the
//! cycle scheduler that walks wallets forever.
//!
//! ## Modules
//!
//! - [`config`] - Shared configuration structures
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - Core trait definitions (tasks, clock, picker, wallet processor)
//! - [`utils`] - Retry, gas, logger, key/proxy loading and the scheduler

pub mod config;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod traits;
pub mod utils;

pub use config::{ChainConfig, DelayRange, ProxyConfig, RetrySettings};
pub use error::{Classify, ConfigError, ErrorKind, NetworkError, OpError, WalletError};
pub use traits::{
    RandomPicker, Sleeper, Task, TaskResult, TokioSleeper, VariantPicker, WalletProcessor,
};

pub use utils::{
    clean_error_message, mask_address, normalize_private_key, setup_logger, shutdown_on_ctrl_c,
    CycleScheduler, CycleSummary, GasConfig, OperationShape, PrivateKey, ProxyManager,
    RetryPolicy, StandardGasLimits, WalletManager,
};
