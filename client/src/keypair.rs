//! Loading signing keypairs from JSON secret-key files, the format written by `solana-keygen`.

use std::{
    fs,
    path::Path,
};

use anyhow::{
    anyhow,
    bail,
    Context,
};
use solana_sdk::signer::keypair::{
    read_keypair_file,
    Keypair,
};

/// Length of an ed25519 seed, which is also accepted as a full secret key.
pub const SEED_LEN: usize = 32;
/// Length of a full keypair: the 32-byte seed followed by the 32-byte public key.
pub const KEYPAIR_LEN: usize = 64;

/// Reads a keypair file written by `solana-keygen`. Files holding only a 32-byte seed are also
/// accepted.
pub fn load_keypair(path: impl AsRef<Path>) -> anyhow::Result<Keypair> {
    let path = path.as_ref();
    match read_keypair_file(path) {
        Ok(keypair) => Ok(keypair),
        Err(keygen_err) => load_seed_file(path).map_err(|seed_err| {
            anyhow!(
                "Couldn't read keypair file {}: {keygen_err} ({seed_err:#})",
                path.display()
            )
        }),
    }
}

fn load_seed_file(path: &Path) -> anyhow::Result<Keypair> {
    let contents = fs::read_to_string(path).context("unreadable")?;
    let bytes: Vec<u8> =
        serde_json::from_str(&contents).context("not a JSON array of byte values")?;
    if bytes.len() != SEED_LEN {
        bail!("expected a {SEED_LEN}-byte seed, found {} bytes", bytes.len());
    }
    keypair_from_bytes(&bytes)
}

/// Builds a [`Keypair`] from either a 64-byte secret key or a 32-byte seed.
///
/// A 64-byte secret key must carry the public key matching its seed.
pub fn keypair_from_bytes(bytes: &[u8]) -> anyhow::Result<Keypair> {
    match bytes.len() {
        KEYPAIR_LEN => Keypair::try_from(bytes).map_err(|e| anyhow!("Invalid secret key: {e}")),
        SEED_LEN => {
            let mut seed = [0u8; SEED_LEN];
            seed.copy_from_slice(bytes);
            Ok(Keypair::new_from_array(seed))
        }
        len => Err(anyhow!(
            "Expected {KEYPAIR_LEN} or {SEED_LEN} secret key bytes, found {len}"
        )),
    }
}
