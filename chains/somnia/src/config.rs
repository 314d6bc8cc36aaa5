use anyhow::{Context, Result};
use config::{Config, Environment, File};
use core_logic::config::{ChainConfig, DelayRange, RetrySettings};
use core_logic::error::ConfigError;
use core_logic::utils::gas::{GasConfig, GasConfigOverrides};
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::path::PathBuf;

pub const NETWORK_NAME: &str = "Somnia Testnet";
pub const CHAIN_ID: u64 = 50312;
pub const RPC_URL: &str = "https://dream-rpc.somnia.network";
pub const FAUCET_URL: &str = "https://testnet.somnia.network/api/faucet";
pub const SYMBOL: &str = "STT";

/// Destination wallets for the transfer batch unless overridden.
pub const TEAM_WALLETS: [&str; 5] = [
    "0xDA1feA7873338F34C6915A44028aA4D9aBA1346B",
    "0x018604C67a7423c03dE3057a49709aaD1D178B85",
    "0xcF8D30A5Ee0D9d5ad1D7087822bA5Bab1081FdB7",
    "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
    "0x95222290DD7278Aa3Ddd389Cc1E1d165CC4BAfe5",
];

// The `config` crate lowercases keys coming from the environment, hence the aliases.

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Features {
    #[serde(rename = "claimFaucet", alias = "claimfaucet")]
    pub claim_faucet: bool,
    #[serde(rename = "deployContracts", alias = "deploycontracts")]
    pub deploy_contracts: bool,
    #[serde(rename = "transferToTeam", alias = "transfertoteam")]
    pub transfer_to_team: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            claim_faucet: true,
            deploy_contracts: true,
            transfer_to_team: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Deployments {
    #[serde(rename = "confidentialERC20Count", alias = "confidentialerc20count")]
    pub confidential_erc20_count: u32,
    #[serde(rename = "nftCount", alias = "nftcount")]
    pub nft_count: u32,
    #[serde(rename = "memeTokenCount", alias = "memetokencount")]
    pub meme_token_count: u32,
}

impl Default for Deployments {
    fn default() -> Self {
        Self {
            confidential_erc20_count: 1,
            nft_count: 1,
            meme_token_count: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Transfers {
    /// Native-unit decimal string, e.g. `"0.001"`.
    pub amount: String,
}

impl Default for Transfers {
    fn default() -> Self {
        Self {
            amount: "0.001".to_string(),
        }
    }
}

impl Transfers {
    pub fn amount_wei(&self) -> Result<U256, ConfigError> {
        ethers::utils::parse_ether(self.amount.trim()).map_err(|e| ConfigError::InvalidValue {
            field: "transfers.amount".into(),
            reason: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SomniaConfig {
    #[serde(rename = "rpcUrl", alias = "rpcurl")]
    pub rpc_url: String,
    #[serde(rename = "chainId", alias = "chainid")]
    pub chain_id: u64,
    #[serde(rename = "faucetUrl", alias = "fauceturl")]
    pub faucet_url: String,
    #[serde(rename = "privateKeyFile", alias = "privatekeyfile")]
    pub private_key_file: PathBuf,
    #[serde(rename = "proxyFile", alias = "proxyfile")]
    pub proxy_file: PathBuf,
    #[serde(rename = "contractsDir", alias = "contractsdir")]
    pub contracts_dir: PathBuf,
    #[serde(rename = "teamWallets", alias = "teamwallets")]
    pub team_wallets: Vec<String>,
    pub retry: RetrySettings,
    pub delays: DelayRange,
    pub features: Features,
    pub deployments: Deployments,
    pub transfers: Transfers,
    pub gas: GasConfigOverrides,
}

impl Default for SomniaConfig {
    fn default() -> Self {
        Self {
            rpc_url: RPC_URL.to_string(),
            chain_id: CHAIN_ID,
            faucet_url: FAUCET_URL.to_string(),
            private_key_file: PathBuf::from("pk.txt"),
            proxy_file: PathBuf::from("proxy.txt"),
            contracts_dir: PathBuf::from("contracts"),
            team_wallets: TEAM_WALLETS.iter().map(|s| s.to_string()).collect(),
            retry: RetrySettings::default(),
            delays: DelayRange::default(),
            features: Features::default(),
            deployments: Deployments::default(),
            transfers: Transfers::default(),
            gas: GasConfigOverrides::default(),
        }
    }
}

impl SomniaConfig {
    /// Reads the JSON file at `path` and layers `SOMNIA__*` environment
    /// variables on top, e.g. `SOMNIA__RETRY__MAXATTEMPTS=5`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(Environment::with_prefix("SOMNIA").separator("__"))
            .build()
            .with_context(|| format!("Failed to read config {}", path))?;

        settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path, e))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rpc = url::Url::parse(&self.rpc_url).map_err(|_| ConfigError::InvalidRpcUrl {
            url: self.rpc_url.clone(),
        })?;
        if !matches!(rpc.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidRpcUrl {
                url: self.rpc_url.clone(),
            });
        }

        url::Url::parse(&self.faucet_url).map_err(|e| ConfigError::InvalidValue {
            field: "faucetUrl".into(),
            reason: e.to_string(),
        })?;

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.maxAttempts".into(),
                reason: "must be at least 1".into(),
            });
        }

        if self.delays.min > self.delays.max {
            return Err(ConfigError::InvalidValue {
                field: "delays".into(),
                reason: format!("min ({}) exceeds max ({})", self.delays.min, self.delays.max),
            });
        }

        self.transfers.amount_wei()?;
        self.team_addresses()?;
        Ok(())
    }

    pub fn team_addresses(&self) -> Result<Vec<Address>, ConfigError> {
        self.team_wallets
            .iter()
            .map(|w| {
                w.parse::<Address>().map_err(|_| ConfigError::InvalidValue {
                    field: "teamWallets".into(),
                    reason: format!("'{}' is not an address", w),
                })
            })
            .collect()
    }

    pub fn chain(&self) -> ChainConfig {
        ChainConfig {
            name: NETWORK_NAME.to_string(),
            rpc_endpoint: self.rpc_url.clone(),
            chain_id: self.chain_id,
            symbol: SYMBOL.to_string(),
        }
    }

    pub fn gas_config(&self) -> GasConfig {
        self.gas.clone().into()
    }
}
