use std::str::FromStr;

use client::{
    address::derive_proof_address,
    e2e_helpers::{
        rent_exempt_minimum,
        test_accounts,
        InMemoryLedger,
        LedgerEvent,
    },
    upgrade::{
        create_proof_account,
        fetch_proof_account,
        run_upgrade,
        Stage,
        UpgradePlan,
    },
};
use goldfish_interface::{
    program::{
        DERIVED_FLOW_PROGRAM_ID,
        PROOF_SEED,
    },
    state::ProofAccount,
};
use solana_account::Account;
use solana_sdk::{
    pubkey::Pubkey,
    signature::Keypair,
    signer::Signer,
};

fn program_id() -> Pubkey {
    Pubkey::from_str(DERIVED_FLOW_PROGRAM_ID).unwrap()
}

fn derived_address(payer: &Keypair) -> Pubkey {
    derive_proof_address(&payer.pubkey(), PROOF_SEED, &program_id()).unwrap()
}

#[tokio::test]
async fn first_run_creates_then_upgrades() {
    let ledger = InMemoryLedger::new(program_id());
    let payer = test_accounts::default_payer();
    let plan = UpgradePlan::derived(program_id(), PROOF_SEED);

    let outcome = run_upgrade(&ledger, payer, payer, &plan).await.unwrap();
    let proof = derived_address(payer);

    assert_eq!(outcome.proof_account, proof);
    assert_eq!(
        proof.to_string(),
        "9oaCxUGXs1W36LwnRR4mn5yt7pE59ATKSA55hxFYXzWR"
    );
    assert!(outcome.created);
    assert_eq!(
        outcome.stages,
        [
            Stage::KeyLoaded,
            Stage::AddressResolved,
            Stage::Created,
            Stage::InstructionSent,
            Stage::Confirmed,
            Stage::Decoded,
        ]
    );
    assert_eq!(
        ledger.events(),
        [
            LedgerEvent::AccountFetched(proof),
            LedgerEvent::AccountCreated(proof),
            LedgerEvent::ProgramInvoked(proof),
            LedgerEvent::AccountFetched(proof),
        ]
    );

    // Creation happens in slot 1, the upgrade in slot 2: an even roll, so the level goes up.
    assert_eq!(ledger.slot(), 2);
    assert_eq!(outcome.state, ProofAccount::new(1, 1));

    let account = ledger.account(&proof).unwrap();
    assert_eq!(account.owner, program_id());
    assert_eq!(account.lamports, rent_exempt_minimum(ProofAccount::LEN));
    assert_eq!(account.data.len(), ProofAccount::LEN);
}

#[tokio::test]
async fn second_run_skips_creation() {
    let ledger = InMemoryLedger::new(program_id());
    let payer = test_accounts::default_payer();
    let plan = UpgradePlan::derived(program_id(), PROOF_SEED);

    let first = run_upgrade(&ledger, payer, payer, &plan).await.unwrap();
    let second = run_upgrade(&ledger, payer, payer, &plan).await.unwrap();

    assert_eq!(first.proof_account, second.proof_account);
    assert!(!second.created);
    assert!(second.stages.contains(&Stage::Existed));
    assert!(!second.stages.contains(&Stage::Created));
    assert_ne!(first.signature, second.signature);

    let creations = ledger
        .events()
        .iter()
        .filter(|event| matches!(event, LedgerEvent::AccountCreated(_)))
        .count();
    assert_eq!(creations, 1);

    // Slot 3 is an odd roll: the counter keeps going and the level resets to 1.
    assert_eq!(second.state, ProofAccount::new(2, 1));

    let third = run_upgrade(&ledger, payer, payer, &plan).await.unwrap();
    assert_eq!(third.state, ProofAccount::new(3, 2));
}

#[tokio::test]
async fn created_account_starts_zeroed() {
    let ledger = InMemoryLedger::new(program_id());
    let payer = test_accounts::default_payer();
    let proof = derived_address(payer);

    create_proof_account(&ledger, payer, &proof, PROOF_SEED, &program_id())
        .await
        .unwrap();

    let state = fetch_proof_account(&ledger, &proof).await.unwrap();
    assert_eq!(state.counter(), 0);
    assert_eq!(state.level(), 0);
}

#[tokio::test]
async fn static_flow_uses_existing_account_and_readonly_signer() {
    let proof = Pubkey::new_unique();
    let user = test_accounts::upgrader();
    let ledger = InMemoryLedger::new(program_id()).with_authorized_upgrader(user.pubkey());
    ledger.insert_proof_account(proof, ProofAccount::new(10, 4));

    let plan = UpgradePlan::fixed(ledger.program_id(), proof);
    let outcome = run_upgrade(&ledger, user, user, &plan).await.unwrap();

    assert_eq!(outcome.proof_account, proof);
    assert!(!outcome.created);
    assert!(outcome.stages.contains(&Stage::Existed));
    assert!(!outcome.stages.contains(&Stage::Missing));
    assert_eq!(ledger.slot(), 1);
    assert_eq!(outcome.state.counter(), 11);
    // Slot 1 is an odd roll.
    assert_eq!(outcome.state.level(), 1);
}

#[tokio::test]
async fn static_flow_never_creates_a_missing_account() {
    let proof = Pubkey::new_unique();
    let user = test_accounts::upgrader();
    let ledger = InMemoryLedger::new(program_id());

    let plan = UpgradePlan::fixed(program_id(), proof);
    let err = run_upgrade(&ledger, user, user, &plan).await.unwrap_err();

    let message = format!("{err:#}");
    assert!(message.contains(
        "Upgrade transaction failed after KeyLoaded -> AddressResolved -> Missing -> InstructionSent"
    ));
    assert!(!message.contains("Existed"));
    assert!(ledger.account(&proof).is_none());
    assert!(!ledger
        .events()
        .iter()
        .any(|event| matches!(event, LedgerEvent::AccountCreated(_))));
}

#[tokio::test]
async fn unauthorized_signer_leaves_state_untouched() {
    let payer = test_accounts::default_payer();
    let ledger = InMemoryLedger::new(program_id())
        .with_authorized_upgrader(test_accounts::upgrader().pubkey());
    let proof = Pubkey::new_unique();
    ledger.insert_proof_account(proof, ProofAccount::new(5, 5));

    let plan = UpgradePlan::fixed(program_id(), proof);
    let intruder = test_accounts::intruder();
    assert!(run_upgrade(&ledger, payer, intruder, &plan).await.is_err());

    let state = fetch_proof_account(&ledger, &proof).await.unwrap();
    assert_eq!(state, ProofAccount::new(5, 5));
}

#[tokio::test]
async fn separate_fee_payer_and_signer() {
    let payer = test_accounts::default_payer();
    let user = test_accounts::upgrader();
    let ledger = InMemoryLedger::new(program_id()).with_authorized_upgrader(user.pubkey());
    let proof = Pubkey::new_unique();
    ledger.insert_proof_account(proof, ProofAccount::default());

    let plan = UpgradePlan::fixed(program_id(), proof);
    let outcome = run_upgrade(&ledger, payer, user, &plan).await.unwrap();
    assert_eq!(outcome.state.counter(), 1);
}

#[tokio::test]
async fn missing_account_is_reported() {
    let ledger = InMemoryLedger::new(program_id());
    let err = fetch_proof_account(&ledger, &Pubkey::new_unique())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Error: cannot find the greeted account");
}

#[tokio::test]
async fn malformed_account_data_is_a_decode_error() {
    let ledger = InMemoryLedger::new(program_id());
    let address = Pubkey::new_unique();
    ledger.insert_account(
        address,
        Account {
            lamports: 1,
            data: vec![0; 12],
            owner: program_id(),
            executable: false,
            rent_epoch: 0,
        },
    );

    let err = fetch_proof_account(&ledger, &address).await.unwrap_err();
    assert!(format!("{err:#}").contains("isn't exactly 8 bytes"));
}

#[tokio::test]
async fn existing_account_owned_by_another_program_fails_the_upgrade() {
    let payer = test_accounts::default_payer();
    let ledger = InMemoryLedger::new(program_id());
    let proof = derived_address(payer);
    ledger.insert_account(
        proof,
        Account {
            lamports: 1,
            data: vec![0; ProofAccount::LEN],
            owner: Pubkey::new_unique(),
            executable: false,
            rent_epoch: 0,
        },
    );

    let plan = UpgradePlan::derived(program_id(), PROOF_SEED);
    assert!(run_upgrade(&ledger, payer, payer, &plan).await.is_err());
    assert!(!ledger
        .events()
        .iter()
        .any(|event| matches!(event, LedgerEvent::AccountCreated(_))));
}
