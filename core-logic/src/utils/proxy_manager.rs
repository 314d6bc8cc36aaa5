use crate::config::ProxyConfig;
use crate::error::NetworkError;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Loaded proxy list with positional assignment to wallets.
///
/// Every non-empty line keeps its slot. A line that does not parse leaves an
/// empty slot, so the wallet at that position connects directly and later
/// wallets keep their own proxies.
#[derive(Debug, Clone, Default)]
pub struct ProxyManager {
    slots: Vec<Option<ProxyConfig>>,
}

impl ProxyManager {
    /// Loads proxies from a newline-delimited file. A missing file means no proxies.
    ///
    /// Accepted line formats: `host:port`, `host:port:user:pass`,
    /// `user:pass@host:port`, or a full `scheme://` URL.
    pub fn load_proxies(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxies.", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let manager = Self::parse(&content);
        info!(
            "Loaded {} proxies from {} ({} unusable)",
            manager.len(),
            path.display(),
            manager.len() - manager.usable()
        );
        Ok(manager)
    }

    pub fn parse(content: &str) -> Self {
        let slots = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .enumerate()
            .map(|(i, line)| match parse_proxy_line(line) {
                Ok(proxy) => Some(proxy),
                Err(e) => {
                    warn!("Proxy #{} unusable, its wallet connects directly: {}", i + 1, e);
                    None
                }
            })
            .collect();
        Self { slots }
    }

    /// Number of slots, usable or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn usable(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Proxy for the wallet at `index`. Wallets past the end of the list
    /// share the first usable proxy.
    pub fn assign(&self, index: usize) -> Option<&ProxyConfig> {
        match self.slots.get(index) {
            Some(slot) => slot.as_ref(),
            None => self.slots.iter().flatten().next(),
        }
    }
}

pub fn parse_proxy_line(line: &str) -> Result<ProxyConfig, NetworkError> {
    let invalid = |reason: &str| NetworkError::InvalidProxy {
        proxy: line.to_string(),
        reason: reason.to_string(),
    };

    if line.contains("://") {
        return Ok(ProxyConfig {
            url: line.to_string(),
            username: None,
            password: None,
        });
    }

    if let Some((credentials, host)) = line.rsplit_once('@') {
        let (user, pass) = credentials
            .split_once(':')
            .ok_or_else(|| invalid("expected user:pass before '@'"))?;
        if host.split(':').count() != 2 {
            return Err(invalid("expected host:port after '@'"));
        }
        return Ok(ProxyConfig {
            url: format!("http://{}", host),
            username: Some(user.to_string()),
            password: Some(pass.to_string()),
        });
    }

    let parts: Vec<&str> = line.split(':').collect();
    match parts.as_slice() {
        [host, port] => Ok(ProxyConfig {
            url: format!("http://{}:{}", host, port),
            username: None,
            password: None,
        }),
        [host, port, user, pass] => Ok(ProxyConfig {
            url: format!("http://{}:{}", host, port),
            username: Some(user.to_string()),
            password: Some(pass.to_string()),
        }),
        _ => Err(invalid("expected host:port or host:port:user:pass")),
    }
}
