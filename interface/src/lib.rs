//! Account layout, errors, and instruction builders for the goldfish upgrade program.
//!
//! The on-chain program itself is deployed separately; this crate only describes the bytes it
//! reads and writes so that clients can talk to it.

pub mod error;
pub mod instructions;
pub mod state;

pub mod program {
    /// Seed used with `create_with_seed` to derive a payer's proof account.
    pub const PROOF_SEED: &str = "goldfish";

    /// Program targeted by the derived-address flow.
    pub const DERIVED_FLOW_PROGRAM_ID: &str = "G9rXZbpsDDDW1spghnmFALJ7k8MCjfdcjthXwDdfj2Tj";

    /// Program targeted by the static-address flow.
    pub const STATIC_FLOW_PROGRAM_ID: &str = "Aw8cXg8VFBsw568FuXvszYCvXRaMWqCR6N418DyzDVqS";

    /// Pre-created proof account used by the static-address flow.
    pub const STATIC_PROOF_ACCOUNT: &str = "GeTyVeaRVyqPZQFgsuf4Lv6jLicK67SzgaaEy22hVLuV";

    /// The only signer the deployed program accepts for upgrades.
    pub const AUTHORIZED_UPGRADER: &str = "HJJdwyMVf2m5Scr6cVjdEJF9GNVrqaPbw2i51ET7Tr1n";
}
