pub mod proof_account;

pub use proof_account::ProofAccount;

pub const U32_SIZE: usize = core::mem::size_of::<u32>();

pub type LeU32 = [u8; U32_SIZE];
