use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::Path;

pub const DEFAULT_RPC_URL: &str = "https://api.mainnet-beta.solana.com";

/// Receives the optional 1% donation attached to SOL transfers.
pub const DEFAULT_DONATION_ADDRESS: &str = "9XSkMzfD6FapMwcCYzfyZSjQ1R3bjpUB4txLm2DPco8P";

pub const PRIVATE_KEY_ENV: &str = "SOLANA_PRIVATE_KEY";
pub const RPC_URL_ENV: &str = "SOLANA_RPC_URL";

pub const SAMPLE_CONFIG: &str = r#"# Wallet used to sign transfers, stakes and messages (Base58 secret key).
# Can also be supplied through the SOLANA_PRIVATE_KEY environment variable.
private_key: "YOUR_BASE58_PRIVATE_KEY"

# Solana RPC endpoint (overridable with SOLANA_RPC_URL)
rpc_url: "https://api.mainnet-beta.solana.com"

# Destination of the optional 1% donation on SOL transfers
donation_address: "9XSkMzfD6FapMwcCYzfyZSjQ1R3bjpUB4txLm2DPco8P"
"#;

/// Per-run credential material.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    #[serde(default)]
    pub private_key: String,
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,
    #[serde(default = "default_donation_address")]
    pub donation_address: String,
}

fn default_rpc_url() -> String {
    DEFAULT_RPC_URL.to_string()
}

fn default_donation_address() -> String {
    DEFAULT_DONATION_ADDRESS.to_string()
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("rpc_url", &self.rpc_url)
            .field("donation_address", &self.donation_address)
            .finish()
    }
}

impl Credentials {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path).context("Failed to open config file")?;
        let credentials: Credentials =
            serde_yaml::from_reader(file).context("Failed to parse config file")?;
        Ok(credentials)
    }

    /// Load from `path` when given, then apply environment overrides.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        let credentials = match path {
            Some(path) => Self::load(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => Self {
                private_key: String::new(),
                rpc_url: default_rpc_url(),
                donation_address: default_donation_address(),
            },
        };
        Ok(credentials.with_overrides(
            std::env::var(PRIVATE_KEY_ENV).ok(),
            std::env::var(RPC_URL_ENV).ok(),
        ))
    }

    pub fn with_overrides(mut self, private_key: Option<String>, rpc_url: Option<String>) -> Self {
        if let Some(private_key) = private_key.filter(|v| !v.trim().is_empty()) {
            self.private_key = private_key;
        }
        if let Some(rpc_url) = rpc_url.filter(|v| !v.trim().is_empty()) {
            self.rpc_url = rpc_url;
        }
        self
    }
}
