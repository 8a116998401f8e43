//! Environment variables read by the CLI. Values in a `.env` file in the working directory are
//! loaded first and never override variables already set.

pub const RPC_URL: &str = "GOLDFISH_RPC_URL";
pub const COMMITMENT: &str = "GOLDFISH_COMMITMENT";
pub const KEYPAIR: &str = "GOLDFISH_KEYPAIR";
pub const PROGRAM_ID: &str = "GOLDFISH_PROGRAM_ID";

pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}
