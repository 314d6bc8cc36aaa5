use somnia_project::bot::{PipelineServices, WalletPipeline};
use somnia_project::client::{ChainClient, EthersChainClient};
use somnia_project::config::SomniaConfig;
use somnia_project::contracts::{find_project_root, SolcCompiler};
use somnia_project::faucet::HttpFaucet;

use anyhow::{Context, Result};
use clap::Parser;
use core_logic::traits::{RandomPicker, Sleeper, TokioSleeper, VariantPicker};
use core_logic::{setup_logger, shutdown_on_ctrl_c, CycleScheduler, ProxyManager, WalletManager};
use dotenv::dotenv;
use ethers::prelude::*;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value = "chains/somnia/config.json")]
    config: String,
    /// Run a single cycle and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Guard MUST stay alive for file logging
    let _log_guard = setup_logger()?;
    dotenv().ok();

    let args = Args::parse();
    info!(wallet = "Bot", "Loading config from: {}", args.config);

    let config = SomniaConfig::load(&args.config)?;
    config.validate().context("Invalid configuration")?;
    let chain = config.chain();
    info!(
        wallet = "Bot",
        "Network: {} (chain id {}) via {}", chain.name, chain.chain_id, chain.rpc_endpoint
    );

    let keys = WalletManager::load_keys(&config.private_key_file)?;
    if keys.count() == 0 {
        error!(
            wallet = "Bot",
            "No valid private keys found in {}",
            config.private_key_file.display()
        );
        return Ok(());
    }
    let wallets: Vec<LocalWallet> = keys
        .keys()
        .iter()
        .enumerate()
        .filter_map(|(i, key)| match key.as_str().parse::<LocalWallet>() {
            Ok(wallet) => Some(wallet.with_chain_id(config.chain_id)),
            Err(e) => {
                warn!(wallet = "Bot", "Skipping key #{}: {}", i + 1, e);
                None
            }
        })
        .collect();
    if wallets.is_empty() {
        error!(wallet = "Bot", "No usable signing keys");
        return Ok(());
    }

    let proxies = ProxyManager::load_proxies(&config.proxy_file)?;

    let client: Arc<dyn ChainClient> =
        Arc::new(EthersChainClient::new(&config.rpc_url, config.chain_id)?);
    let root = find_project_root(&std::env::current_dir()?);
    let contracts_dir = root.join(&config.contracts_dir);
    let sleeper: Arc<dyn Sleeper> = Arc::new(TokioSleeper);
    let picker: Arc<dyn VariantPicker> = Arc::new(RandomPicker);

    let services = PipelineServices {
        client,
        faucet: Arc::new(HttpFaucet::new(config.faucet_url.clone())),
        compiler: Arc::new(SolcCompiler::new(root, contracts_dir)),
        sleeper: sleeper.clone(),
        picker: picker.clone(),
    };

    let delays = config.delays;
    let pipeline = Arc::new(WalletPipeline::new(Arc::new(config), services));
    let scheduler = CycleScheduler::new(pipeline, wallets, proxies, delays, sleeper, picker);

    let shutdown = shutdown_on_ctrl_c();

    if args.once {
        let summary = scheduler.run_cycle(&shutdown).await?;
        info!(
            wallet = "Bot",
            "Single cycle finished: {} wallets, {} failed", summary.processed, summary.failed
        );
    } else {
        scheduler.run(shutdown).await;
    }

    Ok(())
}
