use crate::error::WalletError;
use anyhow::{Context, Result};
use ethers::signers::LocalWallet;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A normalized `0x`-prefixed 64-hex-char private key. Wiped on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PrivateKey(String);

impl PrivateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(***REDACTED***)")
    }
}

/// Normalizes one line of the key list.
///
/// Returns `Ok(None)` for blank lines and comments. Mnemonic phrases are
/// rejected rather than converted.
pub fn normalize_private_key(line: &str) -> Result<Option<PrivateKey>, WalletError> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }

    let words = trimmed.split_whitespace().count();
    if words >= 12 {
        return Err(WalletError::UnsupportedMnemonic { words });
    }

    let hex_part = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(WalletError::InvalidKeyFormat);
    }
    if hex_part.len() != 64 {
        return Err(WalletError::InvalidKeyLength {
            length: hex_part.len(),
        });
    }
    let bytes = hex::decode(hex_part).map_err(|_| WalletError::InvalidKeyFormat)?;
    // Zero and values at or above the curve order cannot sign.
    LocalWallet::from_bytes(&bytes).map_err(|_| WalletError::InvalidKey)?;

    Ok(Some(PrivateKey(format!("0x{}", hex_part))))
}

/// Key list loaded once at startup.
#[derive(Debug, Default)]
pub struct WalletManager {
    keys: Vec<PrivateKey>,
    skipped: usize,
}

impl WalletManager {
    /// Reads a newline-delimited key file. Malformed lines are skipped with a warning.
    pub fn load_keys(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read key file {}", path.display()))?;
        let manager = Self::parse(&content);
        info!(
            "Loaded {} valid private keys out of {} entries",
            manager.count(),
            manager.count() + manager.skipped
        );
        Ok(manager)
    }

    pub fn parse(content: &str) -> Self {
        let mut keys = Vec::new();
        let mut skipped = 0;

        for (i, line) in content.lines().enumerate() {
            match normalize_private_key(line) {
                Ok(Some(key)) => keys.push(key),
                Ok(None) => {}
                Err(e) => {
                    skipped += 1;
                    warn!("Skipping invalid private key at line {}: {}", i + 1, e);
                }
            }
        }

        Self { keys, skipped }
    }

    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn keys(&self) -> &[PrivateKey] {
        &self.keys
    }
}
