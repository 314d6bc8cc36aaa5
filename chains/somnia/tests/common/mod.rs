#![allow(dead_code)]

use async_trait::async_trait;
use core_logic::config::{DelayRange, ProxyConfig};
use core_logic::error::OpError;
use core_logic::testing::{FixedPicker, RecordingSleeper};
use ethers::abi::Abi;
use ethers::prelude::*;
use somnia_project::bot::{PipelineServices, WalletPipeline};
use somnia_project::client::{ChainClient, GasQuote, OperationReceipt, UnsignedOperation};
use somnia_project::config::SomniaConfig;
use somnia_project::contracts::{CompiledContract, ContractCompiler, ContractKind};
use somnia_project::faucet::FaucetClient;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEPLOYED_AT: Address = H160([0xCC; 20]);

pub fn ether(milli: u64) -> U256 {
    U256::from(milli) * U256::exp10(15)
}

pub fn test_wallet() -> LocalWallet {
    TEST_KEY.parse::<LocalWallet>().unwrap().with_chain_id(50312u64)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpKind {
    Deploy,
    Call,
    Transfer,
}

pub fn kind_of(op: &UnsignedOperation) -> OpKind {
    match (op.to, op.payload_len()) {
        (None, _) => OpKind::Deploy,
        (Some(_), Some(_)) => OpKind::Call,
        (Some(_), None) => OpKind::Transfer,
    }
}

/// Scripted chain. Submissions pop `submit_script` in order and succeed
/// once it is empty.
pub struct MockChain {
    pub chain_id: u64,
    pub balance: Mutex<Result<U256, OpError>>,
    pub balance_calls: AtomicUsize,
    pub gas_price: Mutex<Result<U256, OpError>>,
    pub estimate: Mutex<Result<U256, OpError>>,
    pub submit_script: Mutex<VecDeque<Result<(), OpError>>>,
    pub submitted: Mutex<Vec<(UnsignedOperation, GasQuote)>>,
}

impl MockChain {
    pub fn with_balance(balance: U256) -> Self {
        Self {
            chain_id: 50312,
            balance: Mutex::new(Ok(balance)),
            balance_calls: AtomicUsize::new(0),
            gas_price: Mutex::new(Ok(U256::from(1_000_000_000u64))),
            estimate: Mutex::new(Ok(U256::from(100_000u64))),
            submit_script: Mutex::new(VecDeque::new()),
            submitted: Mutex::new(Vec::new()),
        }
    }

    pub fn script(&self, results: Vec<Result<(), OpError>>) {
        self.submit_script.lock().unwrap().extend(results);
    }

    pub fn fail_estimates(&self) {
        *self.gas_price.lock().unwrap() = Err(OpError::transient("gas price query", "timeout"));
        *self.estimate.lock().unwrap() = Err(OpError::transient("gas estimation", "timeout"));
    }

    pub fn submitted(&self) -> Vec<(UnsignedOperation, GasQuote)> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn count(&self, kind: OpKind) -> usize {
        self.submitted()
            .iter()
            .filter(|(op, _)| kind_of(op) == kind)
            .count()
    }
}

#[async_trait]
impl ChainClient for MockChain {
    async fn chain_id(&self) -> Result<u64, OpError> {
        Ok(self.chain_id)
    }

    async fn balance(&self, _address: Address) -> Result<U256, OpError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance.lock().unwrap().clone()
    }

    async fn gas_price(&self) -> Result<U256, OpError> {
        self.gas_price.lock().unwrap().clone()
    }

    async fn estimate_gas(&self, _op: &UnsignedOperation) -> Result<U256, OpError> {
        self.estimate.lock().unwrap().clone()
    }

    async fn sign_and_submit(
        &self,
        _wallet: &LocalWallet,
        op: &UnsignedOperation,
        quote: &GasQuote,
    ) -> Result<OperationReceipt, OpError> {
        self.submitted.lock().unwrap().push((op.clone(), *quote));
        let scripted = self.submit_script.lock().unwrap().pop_front();
        scripted.unwrap_or(Ok(()))?;

        let n = self.submitted.lock().unwrap().len() as u64;
        Ok(OperationReceipt {
            tx_hash: H256::from_low_u64_be(n),
            contract_address: op.to.is_none().then_some(DEPLOYED_AT),
        })
    }
}

pub struct MockFaucet {
    pub script: Mutex<VecDeque<Result<String, OpError>>>,
    pub calls: AtomicUsize,
    pub proxies: Mutex<Vec<Option<String>>>,
}

impl MockFaucet {
    pub fn new(results: Vec<Result<String, OpError>>) -> Self {
        Self {
            script: Mutex::new(results.into()),
            calls: AtomicUsize::new(0),
            proxies: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaucetClient for MockFaucet {
    async fn claim(
        &self,
        _address: Address,
        proxy: Option<&ProxyConfig>,
    ) -> Result<String, OpError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.proxies
            .lock()
            .unwrap()
            .push(proxy.map(|p| p.url.clone()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("0xfaucet".to_string()))
    }
}

const TOKEN_ABI: &str = r#"[
    {"type":"constructor","stateMutability":"nonpayable","inputs":[
        {"name":"name","type":"string"},{"name":"symbol","type":"string"}]},
    {"type":"function","name":"mint","stateMutability":"nonpayable","outputs":[],"inputs":[
        {"name":"to","type":"address"},{"name":"amount","type":"uint256"}]}
]"#;

const NFT_ABI: &str = r#"[
    {"type":"constructor","stateMutability":"nonpayable","inputs":[
        {"name":"name","type":"string"},{"name":"symbol","type":"string"},
        {"name":"baseURI","type":"string"},{"name":"_maxSupply","type":"uint256"},
        {"name":"_price","type":"uint256"}]},
    {"type":"function","name":"mint","stateMutability":"payable","outputs":[],"inputs":[]}
]"#;

/// Hands out fixed artifacts. Bytecode is long enough to count as creation.
pub struct MockCompiler {
    pub fail: bool,
}

impl ContractCompiler for MockCompiler {
    fn compile(&self, kind: ContractKind) -> Result<CompiledContract, OpError> {
        if self.fail {
            return Err(OpError::invalid(kind.name(), "solc not found"));
        }
        let abi_json = match kind {
            ContractKind::Nft => NFT_ABI,
            _ => TOKEN_ABI,
        };
        let abi: Abi = serde_json::from_str(abi_json).unwrap();
        Ok(CompiledContract {
            abi,
            bytecode: Bytes::from(vec![0x60; 1200]),
        })
    }
}

/// Defaults tuned for tests: short retry delays, fixed jitter, every
/// feature off. Tests switch on what they exercise.
pub fn base_config() -> SomniaConfig {
    let mut config = SomniaConfig::default();
    config.retry.max_attempts = 3;
    config.retry.delay_between_retries = 100;
    config.delays = DelayRange::new(1_000, 1_000);
    config.features.claim_faucet = false;
    config.features.deploy_contracts = false;
    config.features.transfer_to_team = false;
    config.deployments.confidential_erc20_count = 0;
    config.deployments.nft_count = 0;
    config.deployments.meme_token_count = 0;
    config
}

pub struct Harness {
    pub chain: Arc<MockChain>,
    pub faucet: Arc<MockFaucet>,
    pub sleeper: Arc<RecordingSleeper>,
    pub pipeline: WalletPipeline,
}

pub fn harness(config: SomniaConfig, chain: MockChain, faucet: MockFaucet) -> Harness {
    harness_with(config, chain, faucet, FixedPicker::first(), false)
}

pub fn harness_with(
    config: SomniaConfig,
    chain: MockChain,
    faucet: MockFaucet,
    picker: FixedPicker,
    compiler_fails: bool,
) -> Harness {
    let chain = Arc::new(chain);
    let faucet = Arc::new(faucet);
    let sleeper = Arc::new(RecordingSleeper::new());
    let services = PipelineServices {
        client: chain.clone(),
        faucet: faucet.clone(),
        compiler: Arc::new(MockCompiler {
            fail: compiler_fails,
        }),
        sleeper: sleeper.clone(),
        picker: Arc::new(picker),
    };
    Harness {
        chain,
        faucet,
        sleeper,
        pipeline: WalletPipeline::new(Arc::new(config), services),
    }
}
