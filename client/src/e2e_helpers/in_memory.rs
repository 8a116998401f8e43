use std::{
    cell::{
        Cell,
        RefCell,
    },
    collections::HashMap,
};

use anyhow::{
    anyhow,
    bail,
};
use goldfish_interface::state::ProofAccount;
use solana_account::Account;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    hash::Hash,
    message::Instruction,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
    },
};
use solana_system_interface::instruction::SystemInstruction;

use crate::{
    address::derive_proof_address,
    ledger::LedgerClient,
    transactions::build_signed_transaction,
};

/// Unix timestamp reported by the emulated clock. Each transaction advances the slot by one.
pub const EMULATED_UNIX_TIMESTAMP: u64 = 1_700_000_000;

const ACCOUNT_STORAGE_OVERHEAD: u64 = 128;
const RENT_EXEMPT_LAMPORTS_PER_BYTE: u64 = 3_480 * 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LedgerEvent {
    AccountFetched(Pubkey),
    AccountCreated(Pubkey),
    ProgramInvoked(Pubkey),
}

/// A single-threaded stand-in for a cluster running the system program and the goldfish program.
///
/// The emulated goldfish program mirrors the deployed program's observable behavior: the counter
/// always increments, and the level increments when `timestamp + slot` is even and resets to 1
/// otherwise.
pub struct InMemoryLedger {
    program_id: Pubkey,
    authorized_upgrader: Option<Pubkey>,
    accounts: RefCell<HashMap<Pubkey, Account>>,
    events: RefCell<Vec<LedgerEvent>>,
    slot: Cell<u64>,
}

impl InMemoryLedger {
    pub fn new(program_id: Pubkey) -> Self {
        Self {
            program_id,
            authorized_upgrader: None,
            accounts: Default::default(),
            events: Default::default(),
            slot: Cell::new(0),
        }
    }

    /// Only accept upgrades signed by `upgrader`, as the deployed program does.
    pub fn with_authorized_upgrader(mut self, upgrader: Pubkey) -> Self {
        self.authorized_upgrader = Some(upgrader);
        self
    }

    pub fn program_id(&self) -> Pubkey {
        self.program_id
    }

    pub fn slot(&self) -> u64 {
        self.slot.get()
    }

    pub fn insert_account(&self, address: Pubkey, account: Account) {
        self.accounts.borrow_mut().insert(address, account);
    }

    /// Inserts a rent exempt proof account owned by the program with the given state.
    pub fn insert_proof_account(&self, address: Pubkey, state: ProofAccount) {
        let account = Account {
            lamports: rent_exempt_minimum(ProofAccount::LEN),
            data: state.pack().to_vec(),
            owner: self.program_id,
            executable: false,
            rent_epoch: 0,
        };
        self.insert_account(address, account);
    }

    pub fn account(&self, address: &Pubkey) -> Option<Account> {
        self.accounts.borrow().get(address).cloned()
    }

    pub fn events(&self) -> Vec<LedgerEvent> {
        self.events.borrow().clone()
    }

    fn process_instruction(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        instruction: &Instruction,
    ) -> Result<LedgerEvent, InstructionError> {
        if instruction.program_id == solana_system_interface::program::ID {
            self.process_system_instruction(accounts, instruction)
        } else if instruction.program_id == self.program_id {
            self.process_upgrade(accounts, instruction)
        } else {
            Err(InstructionError::UnsupportedProgramId)
        }
    }

    fn process_system_instruction(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        instruction: &Instruction,
    ) -> Result<LedgerEvent, InstructionError> {
        let SystemInstruction::CreateAccountWithSeed {
            base,
            seed,
            lamports,
            space,
            owner,
        } = bincode::deserialize::<SystemInstruction>(&instruction.data)
            .map_err(|_| InstructionError::InvalidInstructionData)?
        else {
            return Err(InstructionError::InvalidInstructionData);
        };

        let [_funder, new_account, ..] = instruction.accounts.as_slice() else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        let expected = derive_proof_address(&base, &seed, &owner)
            .map_err(|_| InstructionError::InvalidSeeds)?;
        if new_account.pubkey != expected {
            return Err(InstructionError::InvalidSeeds);
        }
        if accounts.contains_key(&expected) {
            return Err(InstructionError::AccountAlreadyInitialized);
        }

        accounts.insert(
            expected,
            Account {
                lamports,
                data: vec![0; space as usize],
                owner,
                executable: false,
                rent_epoch: 0,
            },
        );
        Ok(LedgerEvent::AccountCreated(expected))
    }

    fn process_upgrade(
        &self,
        accounts: &mut HashMap<Pubkey, Account>,
        instruction: &Instruction,
    ) -> Result<LedgerEvent, InstructionError> {
        let [signer, proof, ..] = instruction.accounts.as_slice() else {
            return Err(InstructionError::NotEnoughAccountKeys);
        };
        if !signer.is_signer
            || self
                .authorized_upgrader
                .is_some_and(|upgrader| upgrader != signer.pubkey)
        {
            return Err(InstructionError::IllegalOwner);
        }

        let account = accounts
            .get_mut(&proof.pubkey)
            .ok_or(InstructionError::MissingAccount)?;
        if account.owner != self.program_id {
            return Err(InstructionError::IncorrectProgramId);
        }

        let state =
            ProofAccount::unpack(&account.data).map_err(|_| InstructionError::InvalidAccountData)?;
        let counter = state
            .counter()
            .checked_add(1)
            .ok_or(InstructionError::ArithmeticOverflow)?;
        let level = if (EMULATED_UNIX_TIMESTAMP + self.slot.get()) % 2 == 1 {
            1
        } else {
            state
                .level()
                .checked_add(1)
                .ok_or(InstructionError::ArithmeticOverflow)?
        };

        account
            .data
            .copy_from_slice(&ProofAccount::new(counter, level).pack());
        Ok(LedgerEvent::ProgramInvoked(proof.pubkey))
    }
}

/// A distinct blockhash per slot, so identical transactions in different slots differ.
fn blockhash(slot: u64) -> Hash {
    let mut bytes = [0u8; 32];
    bytes[..8].copy_from_slice(&slot.to_le_bytes());
    Hash::new_from_array(bytes)
}

/// The rent exempt minimum balance under the default rent parameters.
pub fn rent_exempt_minimum(data_len: usize) -> u64 {
    (ACCOUNT_STORAGE_OVERHEAD + data_len as u64) * RENT_EXEMPT_LAMPORTS_PER_BYTE
}

impl LedgerClient for InMemoryLedger {
    async fn get_account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>> {
        self.events
            .borrow_mut()
            .push(LedgerEvent::AccountFetched(*address));
        Ok(self.account(address))
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        Ok(rent_exempt_minimum(data_len))
    }

    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let slot = self.slot.get() + 1;
        let tx = build_signed_transaction(payer, signers, instructions, blockhash(slot), None)?;
        self.slot.set(slot);

        // Instructions apply atomically: work on a copy and commit only if all succeed.
        let mut accounts = self.accounts.borrow().clone();
        let mut events = vec![];
        for (index, instruction) in instructions.iter().enumerate() {
            match self.process_instruction(&mut accounts, instruction) {
                Ok(event) => events.push(event),
                Err(error) => bail!("Instruction {index} failed: {error}"),
            }
        }

        *self.accounts.borrow_mut() = accounts;
        self.events.borrow_mut().extend(events);

        tx.signatures
            .first()
            .copied()
            .ok_or_else(|| anyhow!("Transaction has no signatures"))
    }
}
