//! The upgrade flow: resolve the proof account, create it if needed, call the program, and decode
//! the resulting state.

use std::fmt;

use anyhow::Context;
use goldfish_interface::{
    error::GoldfishError,
    instructions::{
        upgrade,
        SignerAccess,
    },
    state::ProofAccount,
};
use solana_sdk::{
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
};
use solana_system_interface::instruction::create_account_with_seed;
use strum_macros::Display;

use crate::{
    address::AddressPolicy,
    ledger::LedgerClient,
    logs::{
        log_info,
        log_success,
        log_warning,
    },
};

/// Progress through a single run. Runs start with their keys already loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
pub enum Stage {
    KeyLoaded,
    AddressResolved,
    Created,
    Existed,
    /// The account doesn't exist and can't be created; the upgrade is still attempted.
    Missing,
    InstructionSent,
    Confirmed,
    Decoded,
}

/// What a run targets and how it passes the signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpgradePlan {
    pub program_id: Pubkey,
    pub address: AddressPolicy,
    pub signer_access: SignerAccess,
}

impl UpgradePlan {
    /// A proof account derived from the payer and `seed`, created on first use. The payer signs as
    /// a writable account.
    pub fn derived(program_id: Pubkey, seed: impl Into<String>) -> Self {
        Self {
            program_id,
            address: AddressPolicy::derived(seed),
            signer_access: SignerAccess::Writable,
        }
    }

    /// A pre-existing proof account at a fixed address. The signer is passed read-only.
    pub fn fixed(program_id: Pubkey, proof_account: Pubkey) -> Self {
        Self {
            program_id,
            address: AddressPolicy::Static(proof_account),
            signer_access: SignerAccess::Readonly,
        }
    }
}

#[derive(Debug)]
pub struct UpgradeOutcome {
    pub proof_account: Pubkey,
    pub created: bool,
    pub signature: Signature,
    pub state: ProofAccount,
    pub stages: Vec<Stage>,
}

struct Progress(Vec<Stage>);

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stages = self.0.iter().map(Stage::to_string).collect::<Vec<_>>();
        write!(f, "{}", stages.join(" -> "))
    }
}

impl Progress {
    fn advance(&mut self, stage: Stage) {
        log_info("Stage", stage);
        self.0.push(stage);
    }
}

/// Runs one upgrade attempt.
///
/// `payer` funds account creation and pays transaction fees; `signer` is the account passed to
/// the program. They may be the same keypair. A derived account that doesn't exist yet is created
/// before the program is called.
pub async fn run_upgrade<L: LedgerClient>(
    ledger: &L,
    payer: &Keypair,
    signer: &Keypair,
    plan: &UpgradePlan,
) -> anyhow::Result<UpgradeOutcome> {
    let mut progress = Progress(vec![]);
    progress.advance(Stage::KeyLoaded);

    let payer_key = payer.pubkey();
    let proof_account = plan
        .address
        .resolve(&payer_key, &plan.program_id)
        .context("Couldn't resolve the proof account address")?;
    log_info("account", proof_account);
    progress.advance(Stage::AddressResolved);

    let existing = ledger.get_account(&proof_account).await?;
    let created = match (&existing, plan.address.seed()) {
        (Some(account), _) => {
            if account.owner != plan.program_id {
                log_warning(
                    "Proof account owner",
                    format!("{} isn't {}", account.owner, plan.program_id),
                );
            }
            progress.advance(Stage::Existed);
            false
        }
        (None, Some(seed)) => {
            create_proof_account(ledger, payer, &proof_account, seed, &plan.program_id).await?;
            progress.advance(Stage::Created);
            true
        }
        (None, None) => {
            log_warning(
                "Proof account",
                format!("{proof_account} doesn't exist and has no seed to create it with"),
            );
            progress.advance(Stage::Missing);
            false
        }
    };

    let instruction = upgrade(
        &plan.program_id,
        &signer.pubkey(),
        plan.signer_access,
        &proof_account,
    );
    progress.advance(Stage::InstructionSent);
    let signature = ledger
        .send_and_confirm(payer, &[signer], &[instruction])
        .await
        .with_context(|| format!("Upgrade transaction failed after {progress}"))?;
    progress.advance(Stage::Confirmed);

    let state = fetch_proof_account(ledger, &proof_account).await?;
    progress.advance(Stage::Decoded);

    Ok(UpgradeOutcome {
        proof_account,
        created,
        signature,
        state,
        stages: progress.0,
    })
}

/// Funds and allocates a rent exempt proof account at the address derived from `payer` and `seed`.
pub async fn create_proof_account<L: LedgerClient>(
    ledger: &L,
    payer: &Keypair,
    proof_account: &Pubkey,
    seed: &str,
    program_id: &Pubkey,
) -> anyhow::Result<Signature> {
    log_info("Creating account", proof_account);
    let lamports = ledger
        .minimum_balance_for_rent_exemption(ProofAccount::LEN)
        .await?;

    let payer_key = payer.pubkey();
    let instruction = create_account_with_seed(
        &payer_key,
        proof_account,
        &payer_key,
        seed,
        lamports,
        ProofAccount::LEN as u64,
        program_id,
    );

    let signature = ledger
        .send_and_confirm(payer, &[], &[instruction])
        .await
        .context("Couldn't create the proof account")?;
    log_success("Created", format!("{proof_account} with {lamports} lamports"));

    Ok(signature)
}

/// Fetches and decodes a proof account.
pub async fn fetch_proof_account<L: LedgerClient>(
    ledger: &L,
    proof_account: &Pubkey,
) -> anyhow::Result<ProofAccount> {
    let account = ledger
        .get_account(proof_account)
        .await?
        .ok_or(GoldfishError::AccountNotFound)?;

    ProofAccount::unpack(&account.data)
        .with_context(|| format!("Couldn't decode proof account {proof_account}"))
}
