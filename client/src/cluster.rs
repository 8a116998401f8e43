//! Cluster monikers and RPC endpoint resolution.

use std::str::FromStr;

use strum_macros::{
    Display,
    EnumString,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "kebab-case")]
pub enum Cluster {
    Devnet,
    Testnet,
    MainnetBeta,
    #[strum(to_string = "localnet", serialize = "localhost")]
    Localnet,
}

impl Cluster {
    pub fn rpc_url(&self) -> &'static str {
        match self {
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Localnet => "http://localhost:8899",
        }
    }
}

/// Resolves a cluster moniker to its public RPC URL. Anything that isn't a moniker is treated as a
/// URL and returned unchanged.
pub fn resolve_rpc_url(url_or_moniker: &str) -> String {
    let trimmed = url_or_moniker.trim();
    match Cluster::from_str(trimmed) {
        Ok(cluster) => cluster.rpc_url().to_string(),
        Err(_) => trimmed.to_string(),
    }
}
