use anyhow::{Context, Result};
use async_trait::async_trait;
use core_logic::config::ProxyConfig;
use core_logic::error::OpError;
use core_logic::clean_error_message;
use ethers::types::Address;
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[async_trait]
pub trait FaucetClient: Send + Sync {
    /// Requests testnet funds for `address`. Returns the claim transaction hash.
    /// A cooldown answer is reported as [`OpError::RateLimited`].
    async fn claim(
        &self,
        address: Address,
        proxy: Option<&ProxyConfig>,
    ) -> Result<String, OpError>;
}

#[derive(Debug, Deserialize)]
struct ClaimResponse {
    data: ClaimData,
}

#[derive(Debug, Deserialize)]
struct ClaimData {
    hash: String,
}

/// Faucet over HTTP, routed through the wallet's proxy when one is assigned.
#[derive(Debug, Clone)]
pub struct HttpFaucet {
    url: String,
    timeout: Duration,
}

impl HttpFaucet {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Duration::from_secs(30),
        }
    }

    fn build_client(&self, proxy: Option<&ProxyConfig>) -> Result<reqwest::Client> {
        let mut builder = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(self.timeout);

        if let Some(proxy_conf) = proxy {
            let mut proxy = reqwest::Proxy::all(&proxy_conf.url)
                .with_context(|| format!("Invalid proxy URL {}", proxy_conf.url))?;
            if let (Some(u), Some(p)) = (&proxy_conf.username, &proxy_conf.password) {
                proxy = proxy.basic_auth(u, p);
            }
            builder = builder.proxy(proxy);
        } else {
            builder = builder.no_proxy();
        }

        builder.build().context("Failed to build faucet HTTP client")
    }
}

#[async_trait]
impl FaucetClient for HttpFaucet {
    async fn claim(
        &self,
        address: Address,
        proxy: Option<&ProxyConfig>,
    ) -> Result<String, OpError> {
        let client = self
            .build_client(proxy)
            .map_err(|e| OpError::invalid("proxy", format!("{:#}", e)))?;

        let response = client
            .post(&self.url)
            .json(&serde_json::json!({ "address": format!("{:?}", address) }))
            .send()
            .await
            .map_err(|e| {
                OpError::transient("faucet request", clean_error_message(&e.to_string()))
            })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(OpError::RateLimited {
                endpoint: "faucet".into(),
            });
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpError::transient(
                "faucet request",
                format!("HTTP {}: {}", status.as_u16(), clean_error_message(body.trim())),
            ));
        }

        let body: ClaimResponse = response
            .json()
            .await
            .map_err(|e| OpError::transient("faucet response", e.to_string()))?;
        Ok(body.data.hash)
    }
}
