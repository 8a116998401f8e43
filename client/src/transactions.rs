use std::collections::HashSet;

use anyhow::Context;
use colored::Colorize;
use goldfish_interface::program::AUTHORIZED_UPGRADER;
use solana_client::{
    client_error::{
        ClientError,
        ClientErrorKind,
    },
    nonblocking::rpc_client::RpcClient,
    rpc_response::RpcSimulateTransactionResult,
};
use solana_commitment_config::CommitmentConfig;
use solana_compute_budget_interface::ComputeBudgetInstruction;
use solana_instruction_error::InstructionError;
use solana_sdk::{
    hash::Hash,
    message::{
        Instruction,
        Message,
    },
    pubkey::Pubkey,
    signature::{
        Keypair,
        Signature,
        Signer,
    },
    transaction::Transaction,
};

use crate::{
    cluster::Cluster,
    logs::{
        log_error,
        log_info,
        log_success,
        LogColor,
    },
};

pub struct SendTransactionConfig {
    pub compute_budget: Option<u32>,
    pub debug_logs: Option<bool>,
    /// Programs whose instruction errors are decoded as goldfish upgrade errors.
    pub program_id_filter: HashSet<Pubkey>,
}

impl Default for SendTransactionConfig {
    fn default() -> Self {
        SendTransactionConfig {
            compute_budget: Default::default(),
            debug_logs: Some(true),
            program_id_filter: Default::default(),
        }
    }
}

/// An RPC client paired with the config used for every transaction it sends.
pub struct CustomRpcClient {
    pub client: RpcClient,
    pub config: SendTransactionConfig,
}

impl CustomRpcClient {
    /// Defaults to a local validator at `confirmed` commitment.
    pub fn new(client: Option<RpcClient>, config: Option<SendTransactionConfig>) -> Self {
        let client = client.unwrap_or_else(|| {
            RpcClient::new_with_commitment(
                Cluster::Localnet.rpc_url().to_string(),
                CommitmentConfig::confirmed(),
            )
        });
        Self {
            client,
            config: config.unwrap_or_default(),
        }
    }

    pub fn with_url(
        url: String,
        commitment: CommitmentConfig,
        config: Option<SendTransactionConfig>,
    ) -> Self {
        Self::new(
            Some(RpcClient::new_with_commitment(url, commitment)),
            config,
        )
    }

    pub async fn send_and_confirm_txn(
        &self,
        payer: &Keypair,
        signers: &[&Keypair],
        instructions: &[Instruction],
    ) -> anyhow::Result<Signature> {
        let bh = self
            .client
            .get_latest_blockhash()
            .await
            .context("Couldn't fetch the latest blockhash")?;

        let tx = build_signed_transaction(
            payer,
            signers,
            instructions,
            bh,
            self.config.compute_budget,
        )?;

        match self.client.send_and_confirm_transaction(&tx).await {
            Ok(sig) => {
                if matches!(self.config.debug_logs, Some(true)) {
                    let sender_info =
                        format!("{}: {}", "sender".color(LogColor::Gray), payer.pubkey());
                    log_success("Signature", format!("{sig}\n{sender_info}"));
                }
                Ok(sig)
            }
            Err(error) => {
                log_instruction_error(&error, instructions, &self.config);
                log_info("Payer", payer.pubkey());

                Err(error).context("Failed transaction submission")
            }
        }
    }
}

/// Builds a transaction paid for by `payer` and signed by `payer` plus `signers`.
///
/// Signers that repeat the payer are skipped. Prepends compute budget instructions when
/// `compute_budget` is set. Fails if a required signature is missing.
pub fn build_signed_transaction(
    payer: &Keypair,
    signers: &[&Keypair],
    instructions: &[Instruction],
    blockhash: Hash,
    compute_budget: Option<u32>,
) -> anyhow::Result<Transaction> {
    let msg = Message::new(
        &[
            compute_budget.map_or(vec![], |budget| {
                vec![
                    ComputeBudgetInstruction::set_compute_unit_limit(budget),
                    ComputeBudgetInstruction::set_compute_unit_price(1),
                ]
            }),
            instructions.to_vec(),
        ]
        .concat(),
        Some(&payer.pubkey()),
    );

    let payer_key = payer.pubkey();
    let all_signers = std::iter::once(payer)
        .chain(
            signers
                .iter()
                .copied()
                .filter(|signer| signer.pubkey() != payer_key),
        )
        .collect::<Vec<_>>();

    let mut tx = Transaction::new_unsigned(msg);
    tx.try_sign(&all_signers, blockhash)
        .context("Couldn't sign the transaction")?;

    Ok(tx)
}

/// Explains the program errors the goldfish program is known to return.
pub fn describe_upgrade_error(error: &InstructionError) -> Option<String> {
    match error {
        InstructionError::IllegalOwner => Some(format!(
            "Signer isn't the program's authorized upgrader {AUTHORIZED_UPGRADER}"
        )),
        InstructionError::IncorrectProgramId => {
            Some("Proof account isn't owned by the program".to_string())
        }
        InstructionError::NotEnoughAccountKeys => {
            Some("Expected a signer and a proof account".to_string())
        }
        InstructionError::InvalidAccountData => {
            Some("Proof account data couldn't be decoded".to_string())
        }
        _ => None,
    }
}

/// Labels a failed instruction, decoding the error when the instruction targets a program in
/// `config.program_id_filter`. `ixn_idx` indexes the sent transaction, which includes any
/// prepended compute budget instructions.
pub fn describe_instruction_error(
    ixn_idx: u8,
    ixn_error: &InstructionError,
    instructions: &[Instruction],
    config: &SendTransactionConfig,
) -> (&'static str, String) {
    let offset = if config.compute_budget.is_some() { 2 } else { 0 };
    let instruction = (ixn_idx as usize)
        .checked_sub(offset)
        .and_then(|i| instructions.get(i));

    match (instruction, describe_upgrade_error(ixn_error)) {
        (Some(ix), Some(description)) if config.program_id_filter.contains(&ix.program_id) => {
            ("Goldfish error", format!("({ixn_error}) {description}"))
        }
        _ => ("Instruction error", format!("#{ixn_idx}: {ixn_error}")),
    }
}

pub fn log_instruction_error(
    error: &ClientError,
    instructions: &[Instruction],
    config: &SendTransactionConfig,
) {
    use solana_client::rpc_request::{
        RpcError::RpcResponseError,
        RpcResponseErrorData,
    };
    use solana_transaction_error::TransactionError;

    let kind = error.kind();
    let ClientErrorKind::RpcError(RpcResponseError {
        data:
            RpcResponseErrorData::SendTransactionPreflightFailure(RpcSimulateTransactionResult {
                err: Some(ui_err),
                logs,
                ..
            }),
        ..
    }) = kind
    else {
        log_error("Generic error", error);
        return;
    };

    for line in logs.iter().flatten() {
        log_info("Program log", line);
    }

    if let TransactionError::InstructionError(ixn_idx, ixn_error) = ui_err.clone().into() {
        let (label, msg) = describe_instruction_error(ixn_idx, &ixn_error, instructions, config);
        log_error(label, msg);
    } else {
        log_error("Transaction error", error);
    }
}
