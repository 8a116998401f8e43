use std::{
    collections::HashSet,
    path::PathBuf,
    str::FromStr,
};

use clap::{
    Args,
    Parser,
    Subcommand,
};
use client::{
    cluster::resolve_rpc_url,
    transactions::{
        CustomRpcClient,
        SendTransactionConfig,
    },
    upgrade::UpgradePlan,
};
use goldfish_interface::program::{
    DERIVED_FLOW_PROGRAM_ID,
    PROOF_SEED,
    STATIC_FLOW_PROGRAM_ID,
    STATIC_PROOF_ACCOUNT,
};
use solana_commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;

use crate::load_env;

#[derive(Parser, Debug)]
#[command(name = "goldfish", version, about = "Upgrade goldfish proof accounts")]
pub struct Cli {
    /// RPC URL or cluster moniker: devnet, testnet, mainnet-beta, localnet.
    #[arg(long, short, global = true, env = load_env::RPC_URL, default_value = "devnet")]
    pub url: String,

    /// Commitment used for reads and confirmations: processed, confirmed, finalized.
    #[arg(
        long,
        global = true,
        env = load_env::COMMITMENT,
        default_value = "confirmed",
        value_parser = parse_commitment
    )]
    pub commitment: CommitmentConfig,

    /// Compute unit limit to request for each transaction.
    #[arg(long, global = true)]
    pub compute_budget: Option<u32>,

    /// Only print results and errors.
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Upgrade the payer's seed-derived proof account, creating it first if it doesn't exist.
    Upgrade(DerivedArgs),

    /// Upgrade an existing proof account at a fixed address.
    UpgradeStatic(StaticArgs),

    /// Decode a proof account without sending any transaction.
    Show(ShowArgs),

    /// Print the proof account address derived from a keypair.
    Address(DerivedArgs),
}

#[derive(Args, Debug)]
pub struct DerivedArgs {
    /// Payer keypair file; also the base key of the derived address.
    #[arg(long, short, env = load_env::KEYPAIR, default_value = "src/id.json")]
    pub keypair: PathBuf,

    #[arg(
        long,
        env = load_env::PROGRAM_ID,
        default_value = DERIVED_FLOW_PROGRAM_ID,
        value_parser = parse_pubkey
    )]
    pub program_id: Pubkey,

    #[arg(long, default_value = PROOF_SEED)]
    pub seed: String,
}

#[derive(Args, Debug)]
pub struct StaticArgs {
    /// Keypair file of the upgrader, which signs the upgrade.
    #[arg(long, short, env = load_env::KEYPAIR, default_value = "/src/id1.json")]
    pub keypair: PathBuf,

    /// Keypair file paying transaction fees. Defaults to the upgrader.
    #[arg(long)]
    pub fee_payer: Option<PathBuf>,

    #[arg(
        long,
        env = load_env::PROGRAM_ID,
        default_value = STATIC_FLOW_PROGRAM_ID,
        value_parser = parse_pubkey
    )]
    pub program_id: Pubkey,

    #[arg(long, default_value = STATIC_PROOF_ACCOUNT, value_parser = parse_pubkey)]
    pub account: Pubkey,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Proof account address. When omitted, the address is derived from the keypair and seed.
    #[arg(long, value_parser = parse_pubkey)]
    pub account: Option<Pubkey>,

    #[command(flatten)]
    pub derived: DerivedArgs,
}

impl Cli {
    pub fn rpc_client(&self, program_id: Pubkey) -> CustomRpcClient {
        CustomRpcClient::with_url(
            resolve_rpc_url(&self.url),
            self.commitment,
            Some(SendTransactionConfig {
                compute_budget: self.compute_budget,
                debug_logs: Some(!self.quiet),
                program_id_filter: HashSet::from([program_id]),
            }),
        )
    }
}

impl Command {
    /// The program the command talks to.
    pub fn program_id(&self) -> Pubkey {
        match self {
            Self::Upgrade(args) | Self::Address(args) => args.program_id,
            Self::UpgradeStatic(args) => args.program_id,
            Self::Show(args) => args.derived.program_id,
        }
    }
}

impl DerivedArgs {
    pub fn plan(&self) -> UpgradePlan {
        UpgradePlan::derived(self.program_id, self.seed.clone())
    }
}

impl StaticArgs {
    pub fn plan(&self) -> UpgradePlan {
        UpgradePlan::fixed(self.program_id, self.account)
    }
}

fn parse_pubkey(s: &str) -> Result<Pubkey, String> {
    Pubkey::from_str(s.trim()).map_err(|e| format!("invalid public key {s:?}: {e}"))
}

fn parse_commitment(s: &str) -> Result<CommitmentConfig, String> {
    match s.trim() {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(format!(
            "unknown commitment {other:?}, expected processed, confirmed, or finalized"
        )),
    }
}
