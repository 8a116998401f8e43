//! Client-side utilities for interacting with the goldfish program.
//!
//! Includes key loading, proof account address resolution, the RPC wrapper, and the upgrade flow.

pub mod address;
pub mod cluster;
pub mod e2e_helpers;
pub mod keypair;
pub mod ledger;
pub mod logs;
pub mod transactions;
pub mod upgrade;

pub use logs::LogColor;
