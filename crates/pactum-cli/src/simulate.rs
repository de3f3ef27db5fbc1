//! # Simulate Subcommand
//!
//! Starts every node of a network file in this process, wires channel
//! sessions between them and runs sample flows between the first two
//! nodes:
//!
//! - agreement: create, activate;
//! - invoice under that agreement: create, partial payment, final payment;
//! - agreement: terminate.
//!
//! Every committed version is printed as JSON.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use pactum_flow::{LocalNetwork, NewAgreement, NewInvoice};
use pactum_state::{AgreementType, StateAndRef};
use serde::Serialize;

use crate::network::NetworkConfig;

const AGREEMENT_NUMBER: &str = "AG-0001";
const INVOICE_NUMBER: &str = "INV-0001";
const INVOICE_TOTAL: u64 = 300;
const FIRST_PAYMENT: u64 = 100;

/// Arguments for the simulate subcommand.
#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Path to the network YAML.
    #[arg(long)]
    pub network: PathBuf,
}

/// One committed operation.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationStep {
    pub operation: &'static str,
    pub initiator: String,
    /// `None` when the operation consumed its input without replacing it.
    pub committed: Option<StateAndRef>,
}

pub async fn simulate(config: &NetworkConfig) -> anyhow::Result<Vec<SimulationStep>> {
    let network = LocalNetwork::start(config.node_specs()?, config.flow_config()?)
        .context("failed to start network")?;
    let (party, counterparty) = match network.nodes() {
        [a, b, ..] => (a.clone(), b.clone()),
        _ => anyhow::bail!("a network needs at least two nodes"),
    };
    let counterparty_name = counterparty.identity().name.to_string();
    let mut steps = Vec::new();
    let mut record = |operation, initiator: &pactum_flow::Node, committed| {
        tracing::info!(operation, initiator = %initiator.identity().name, "step committed");
        steps.push(SimulationStep {
            operation,
            initiator: initiator.identity().name.to_string(),
            committed,
        });
    };

    let agreement = party
        .create_agreement(NewAgreement {
            agreement_number: AGREEMENT_NUMBER.into(),
            agreement_name: "Master services agreement".into(),
            agreement_hash: "5d41402abc4b2a76b9719d911017c592".into(),
            agreement_type: AgreementType::Msa,
            total_value: 5_000,
            counterparty: counterparty_name.clone(),
            start_date: "2026-01-01".into(),
            end_date: "2026-12-31".into(),
        })
        .await
        .context("create agreement")?;
    record("create_agreement", &party, Some(agreement));

    let active = counterparty
        .activate_agreement(AGREEMENT_NUMBER)
        .await
        .context("activate agreement")?;
    record("activate_agreement", &counterparty, Some(active));

    let invoice = party
        .create_invoice(NewInvoice {
            invoice_number: INVOICE_NUMBER.into(),
            invoice_name: "January services".into(),
            billing_reason: "manual".into(),
            total: INVOICE_TOTAL,
            counterparty: counterparty_name,
            due_date: "2026-02-15".into(),
            period_start_date: "2026-01-01".into(),
            period_end_date: "2026-01-31".into(),
            agreement_number: Some(AGREEMENT_NUMBER.into()),
        })
        .await
        .context("create invoice")?;
    record("create_invoice", &party, Some(invoice));

    let partial = counterparty
        .pay_invoice(INVOICE_NUMBER, FIRST_PAYMENT)
        .await
        .context("first payment")?;
    record("pay_invoice", &counterparty, partial);

    let settled = counterparty
        .pay_invoice(INVOICE_NUMBER, INVOICE_TOTAL - FIRST_PAYMENT)
        .await
        .context("final payment")?;
    record("pay_invoice", &counterparty, settled);

    let terminated = party
        .terminate_agreement(AGREEMENT_NUMBER)
        .await
        .context("terminate agreement")?;
    record("terminate_agreement", &party, Some(terminated));

    Ok(steps)
}

pub fn run_simulate(args: &SimulateArgs) -> anyhow::Result<u8> {
    let config = NetworkConfig::load(&args.network)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start async runtime")?;
    let steps = runtime.block_on(simulate(&config))?;
    println!("{}", serde_json::to_string_pretty(&steps)?);
    Ok(0)
}
