//! Funds Service: whether a payer can cover an invoice payment, and the
//! balance movement once the payment is committed. Settlement itself happens
//! outside the ledger; these balances are what the payer's node believes it
//! can spend.

use std::collections::HashMap;

use pactum_core::PartyName;
use pactum_state::Party;
use parking_lot::RwLock;

use crate::error::FundsError;

pub trait FundsService: Send + Sync {
    /// Spendable balance of `party`.
    fn balance(&self, party: &Party) -> u64;

    /// Fail unless `party` can cover `amount`.
    fn ensure_can_pay(&self, party: &Party, amount: u64) -> Result<(), FundsError> {
        let balance = self.balance(party);
        if balance >= amount {
            Ok(())
        } else {
            Err(FundsError::Insufficient {
                party: party.name.clone(),
                balance,
                required: amount,
            })
        }
    }

    /// Move `amount` from `payer` to `payee` after a payment commits.
    /// Fails, leaving both balances untouched, if the payer cannot cover it.
    fn record_payment(
        &self,
        payer: &Party,
        payee: &Party,
        amount: u64,
    ) -> Result<(), FundsError>;
}

/// Balances held in memory, keyed by legal name.
#[derive(Debug, Default)]
pub struct InMemoryFunds {
    balances: RwLock<HashMap<PartyName, u64>>,
}

impl InMemoryFunds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_balance(&self, party: &PartyName, amount: u64) {
        self.balances.write().insert(party.clone(), amount);
    }
}

impl FundsService for InMemoryFunds {
    fn balance(&self, party: &Party) -> u64 {
        self.balances.read().get(&party.name).copied().unwrap_or(0)
    }

    fn record_payment(&self, payer: &Party, payee: &Party, amount: u64) -> Result<(), FundsError> {
        let mut balances = self.balances.write();
        let balance = balances.get(&payer.name).copied().unwrap_or(0);
        let left = balance.checked_sub(amount).ok_or_else(|| FundsError::Insufficient {
            party: payer.name.clone(),
            balance,
            required: amount,
        })?;
        balances.insert(payer.name.clone(), left);
        let credited = balances.entry(payee.name.clone()).or_insert(0);
        *credited = credited.saturating_add(amount);
        Ok(())
    }
}
