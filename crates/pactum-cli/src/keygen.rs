//! # Keygen Subcommand
//!
//! Prints an Ed25519 seed and its public key, both hex. The seed goes into
//! a node entry of the network file; the public key identifies the node.

use anyhow::Context;
use clap::Args;
use pactum_crypto::Ed25519KeyPair;
use serde::Serialize;

/// Arguments for the keygen subcommand.
#[derive(Args, Debug)]
pub struct KeygenArgs {
    /// Derive the key from this 64-hex seed instead of generating one.
    #[arg(long)]
    pub seed: Option<String>,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct KeyReport {
    pub seed: String,
    pub public_key: String,
}

pub fn keygen(seed: Option<&str>) -> anyhow::Result<KeyReport> {
    let key = match seed {
        Some(hex) => Ed25519KeyPair::from_seed_hex(hex.trim()).context("invalid --seed")?,
        None => Ed25519KeyPair::generate(),
    };
    Ok(KeyReport {
        seed: key.seed_hex(),
        public_key: key.public_key().to_hex(),
    })
}

pub fn run_keygen(args: &KeygenArgs) -> anyhow::Result<u8> {
    let report = keygen(args.seed.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(0)
}
