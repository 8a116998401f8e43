//! The remote operations the upgrade flow depends on.
//!
//! [`CustomRpcClient`] talks to a real cluster; [`crate::e2e_helpers::InMemoryLedger`] stands in
//! for one in tests.

use anyhow::Context;
use solana_account::Account;
use solana_sdk::{
    message::Instruction,
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
    },
};

use crate::transactions::CustomRpcClient;

#[allow(async_fn_in_trait)]
pub trait LedgerClient {
    /// Fetches an account, returning `None` if it doesn't exist.
    async fn get_account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>>;

    /// The minimum lamport balance that keeps `data_len` bytes rent exempt.
    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64>;

    /// Sends `instructions` in a single transaction paid for by `payer` and waits for
    /// confirmation.
    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature>;
}

impl LedgerClient for CustomRpcClient {
    async fn get_account(&self, address: &Pubkey) -> anyhow::Result<Option<Account>> {
        let response = self
            .client
            .get_account_with_commitment(address, self.client.commitment())
            .await
            .with_context(|| format!("Couldn't fetch account {address}"))?;
        Ok(response.value)
    }

    async fn minimum_balance_for_rent_exemption(&self, data_len: usize) -> anyhow::Result<u64> {
        self.client
            .get_minimum_balance_for_rent_exemption(data_len)
            .await
            .context("Couldn't fetch the rent exempt minimum balance")
    }

    async fn send_and_confirm(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        self.send_and_confirm_txn(payer, signers, instructions)
            .await
    }
}
