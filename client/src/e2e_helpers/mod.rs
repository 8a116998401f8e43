//! Helpers for exercising the upgrade flow without a live cluster.

use std::{
    fs,
    path::Path,
};

use anyhow::Context;
use solana_sdk::signature::Keypair;

mod in_memory;
pub mod test_accounts;

pub use in_memory::*;

/// Writes `keypair` to `path` as a JSON array of its 64 secret key bytes.
pub fn write_keypair_file(path: impl AsRef<Path>, keypair: &Keypair) -> anyhow::Result<()> {
    let path = path.as_ref();
    let json = serde_json::to_string(&keypair.to_bytes().to_vec())?;
    fs::write(path, json).with_context(|| format!("Couldn't write {}", path.display()))
}
