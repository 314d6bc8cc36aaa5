//! # Utilities Module

pub mod gas;
pub mod logger;
pub mod proxy_manager;
pub mod retry;
pub mod runner;
pub mod wallet_manager;

pub use gas::{GasConfig, OperationShape, StandardGasLimits};
pub use logger::{clean_error_message, mask_address, setup_logger};
pub use proxy_manager::ProxyManager;
pub use retry::RetryPolicy;
pub use runner::{shutdown_on_ctrl_c, CycleScheduler, CycleSummary};
pub use wallet_manager::{normalize_private_key, PrivateKey, WalletManager};
