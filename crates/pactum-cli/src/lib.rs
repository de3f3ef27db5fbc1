//! # pactum-cli — Command-Line Tools for the Pactum Ledger
//!
//! Subcommand handlers live here so they can be tested without spawning
//! the binary. Each `run_*` function returns the process exit code.

pub mod keygen;
pub mod network;
pub mod simulate;
pub mod validate;
