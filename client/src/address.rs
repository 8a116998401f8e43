//! Proof account address resolution.

use goldfish_interface::error::{
    GoldfishError,
    GoldfishResult,
};
use solana_sdk::pubkey::Pubkey;

/// Maximum length in bytes of a `create_with_seed` seed.
pub const MAX_SEED_LEN: usize = 32;

/// Where a flow's proof account lives.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AddressPolicy {
    /// A fixed, already known address.
    Static(Pubkey),
    /// An address derived from the base key, this seed, and the owning program id.
    Derived { seed: String },
}

impl AddressPolicy {
    pub fn derived(seed: impl Into<String>) -> Self {
        Self::Derived { seed: seed.into() }
    }

    /// Resolves the proof account address. `base` is only used by [`AddressPolicy::Derived`].
    pub fn resolve(&self, base: &Pubkey, program_id: &Pubkey) -> GoldfishResult<Pubkey> {
        match self {
            Self::Static(address) => Ok(*address),
            Self::Derived { seed } => derive_proof_address(base, seed, program_id),
        }
    }

    /// The seed the account can be created with, if the address is derived.
    pub fn seed(&self) -> Option<&str> {
        match self {
            Self::Static(_) => None,
            Self::Derived { seed } => Some(seed),
        }
    }
}

/// `sha256(base || seed || program_id)`, the system program's `create_with_seed` derivation.
pub fn derive_proof_address(base: &Pubkey, seed: &str, program_id: &Pubkey) -> GoldfishResult<Pubkey> {
    if seed.len() > MAX_SEED_LEN {
        return Err(GoldfishError::SeedTooLong);
    }
    Pubkey::create_with_seed(base, seed, program_id)
        .map_err(|_| GoldfishError::InvalidSeedDerivation)
}
