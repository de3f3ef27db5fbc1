//! # Validate Subcommand
//!
//! Runs the contract rules over a transition read from a JSON file and
//! prints `OK` or the first unmet requirement. With `--signed` the file
//! holds a signed transition and every required signature is checked too.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use pactum_contract::{validate, SignedTransition, Transition};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the transition JSON.
    #[arg(long)]
    pub file: PathBuf,

    /// The file holds a signed transition; verify its signatures as well.
    #[arg(long)]
    pub signed: bool,
}

/// `Ok(None)` when the transition passes, `Ok(Some(reason))` when it does
/// not. `Err` only for unreadable input.
pub fn check_file(path: &Path, signed: bool) -> anyhow::Result<Option<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;

    let (transition, signatures) = if signed {
        let signed: SignedTransition = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a signed transition", path.display()))?;
        let verdict = signed.verify_required_signatures();
        (signed.transition, Some(verdict))
    } else {
        let tx: Transition = serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a transition", path.display()))?;
        (tx, None)
    };

    if let Err(violation) = validate(&transition) {
        return Ok(Some(violation.to_string()));
    }
    if let Some(Err(e)) = signatures {
        return Ok(Some(e.to_string()));
    }
    Ok(None)
}

pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<u8> {
    match check_file(&args.file, args.signed)? {
        None => {
            println!("OK");
            Ok(0)
        }
        Some(reason) => {
            println!("{reason}");
            Ok(1)
        }
    }
}
