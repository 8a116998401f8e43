//! `goldfish`: upgrades a goldfish proof account and prints its decoded state.

use clap::Parser;
use client::{
    address::AddressPolicy,
    keypair::load_keypair,
    logs::{
        log_info,
        set_quiet,
    },
    print_kv,
    upgrade::{
        fetch_proof_account,
        run_upgrade,
    },
};
use goldfish_interface::state::ProofAccount;
use solana_sdk::signer::Signer;

use crate::cli::{
    Cli,
    Command,
};

pub mod cli;
pub mod load_env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_env::load_dotenv();
    let cli = Cli::parse();
    set_quiet(cli.quiet);

    let connect = || {
        let rpc = cli.rpc_client(cli.command.program_id());
        print_kv!("RPC", rpc.client.url());
        rpc
    };

    match &cli.command {
        Command::Upgrade(args) => {
            let rpc = connect();
            let payer = load_keypair(&args.keypair)?;
            print_kv!("Payer", payer.pubkey());

            let outcome = run_upgrade(&rpc, &payer, &payer, &args.plan()).await?;
            print_state(&outcome.state);
        }
        Command::UpgradeStatic(args) => {
            let rpc = connect();
            let user = load_keypair(&args.keypair)?;
            print_kv!("Upgrader", user.pubkey());
            let fee_payer = match &args.fee_payer {
                Some(path) => load_keypair(path)?,
                None => user.insecure_clone(),
            };

            let outcome = run_upgrade(&rpc, &fee_payer, &user, &args.plan()).await?;
            print_state(&outcome.state);
        }
        Command::Show(args) => {
            let address = match args.account {
                Some(address) => address,
                None => {
                    let base = load_keypair(&args.derived.keypair)?.pubkey();
                    AddressPolicy::derived(args.derived.seed.clone())
                        .resolve(&base, &args.derived.program_id)?
                }
            };
            log_info("account", address);

            let rpc = connect();
            let state = fetch_proof_account(&rpc, &address).await?;
            print_state(&state);
        }
        Command::Address(args) => {
            let base = load_keypair(&args.keypair)?.pubkey();
            let address = AddressPolicy::derived(args.seed.clone()).resolve(&base, &args.program_id)?;
            println!("{address}");
        }
    }

    Ok(())
}

fn print_state(state: &ProofAccount) {
    println!("{}", format_state(state));
}

fn format_state(state: &ProofAccount) -> String {
    format!(
        "Greeting count: {}\nGreeting level: {}",
        state.counter(),
        state.level()
    )
}
