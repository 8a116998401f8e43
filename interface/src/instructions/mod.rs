//! Instruction builders for the goldfish program.
//!
//! The program takes no instruction data: every call is an upgrade attempt on the passed proof
//! account.

use solana_instruction::{
    AccountMeta,
    Instruction,
};
use solana_sdk::pubkey::Pubkey;

/// How the signing account is passed to the upgrade instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignerAccess {
    Writable,
    Readonly,
}

/// Builds an upgrade instruction.
///
/// Accounts:
///   0. `[signer, writable?]` The upgrader.
///   1. `[writable]` The proof account, owned by `program_id`.
pub fn upgrade(
    program_id: &Pubkey,
    signer: &Pubkey,
    signer_access: SignerAccess,
    proof_account: &Pubkey,
) -> Instruction {
    let signer_meta = match signer_access {
        SignerAccess::Writable => AccountMeta::new(*signer, true),
        SignerAccess::Readonly => AccountMeta::new_readonly(*signer, true),
    };

    Instruction {
        program_id: *program_id,
        accounts: vec![signer_meta, AccountMeta::new(*proof_account, false)],
        data: vec![],
    }
}
