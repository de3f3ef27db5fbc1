//! # Invoice State
//!
//! An invoice raised by `party` (invoicer) against `counterparty` (payer).
//!
//! ## Invariant
//!
//! Every committed version satisfies
//! `amount_remaining == amount_due - amount_paid`. Payments only increase
//! `amount_paid`. A payment that clears the remaining amount produces no
//! next version at all: the invoice is consumed and leaves the unconsumed
//! set, which is how "paid" is recorded on the ledger.

use pactum_core::{LinearId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::party::Party;

/// One version of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub invoice_number: String,
    pub invoice_name: String,
    pub billing_reason: String,
    pub amount_due: u64,
    pub amount_paid: u64,
    pub amount_remaining: u64,
    pub subtotal: u64,
    pub total: u64,
    /// Invoicer.
    pub party: Party,
    /// Payer.
    pub counterparty: Party,
    pub due_date: String,
    pub period_start_date: String,
    pub period_end_date: String,
    pub paid: bool,
    pub active: bool,
    pub created_at: Timestamp,
    pub last_updated: Timestamp,
    /// Agreement this invoice was raised under, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_reference: Option<LinearId>,
    pub linear_id: LinearId,
}

impl Invoice {
    pub fn participants(&self) -> [&Party; 2] {
        [&self.party, &self.counterparty]
    }

    /// `amount_remaining` agrees with `amount_due - amount_paid`.
    pub fn is_balanced(&self) -> bool {
        self.amount_due.checked_sub(self.amount_paid) == Some(self.amount_remaining)
    }

    /// Apply a payment of `amount`.
    ///
    /// Returns `None` when the payment clears the invoice, otherwise the
    /// next version with `amount_paid` raised, `amount_remaining`
    /// recomputed and `last_updated` set to `at`.
    pub fn pay(&self, amount: u64, at: Timestamp) -> Result<Option<Invoice>, StateError> {
        if amount == 0 {
            return Err(StateError::ZeroPayment);
        }
        if amount > self.amount_remaining {
            return Err(StateError::Overpayment {
                amount,
                remaining: self.amount_remaining,
            });
        }
        if amount == self.amount_remaining {
            return Ok(None);
        }

        let amount_paid = self.amount_paid.saturating_add(amount);
        Ok(Some(Invoice {
            amount_paid,
            amount_remaining: self.amount_due.saturating_sub(amount_paid),
            paid: false,
            last_updated: at,
            ..self.clone()
        }))
    }

    /// Whether `next` differs from `self` only in the fields a payment is
    /// allowed to touch.
    pub fn same_apart_from_payment(&self, next: &Invoice) -> bool {
        let normalized = Invoice {
            amount_paid: self.amount_paid,
            amount_remaining: self.amount_remaining,
            paid: self.paid,
            last_updated: self.last_updated,
            ..next.clone()
        };
        normalized == *self
    }
}

impl std::fmt::Display for Invoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invoice {} ({}): {} owes {} {} of {} (paid: {})",
            self.invoice_number,
            self.linear_id,
            self.counterparty.organisation(),
            self.party.organisation(),
            self.amount_remaining,
            self.total,
            self.paid
        )
    }
}


#[cfg(test)]
mod proptests {
    use super::tests::invoice;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn payments_keep_invoice_balanced(
            total in 1u64..1_000_000,
            cuts in prop::collection::vec(1u64..10_000, 0..12),
        ) {
            let at = Timestamp::parse("2026-02-10T10:00:00Z").unwrap();
            let mut current = invoice(total);
            for cut in cuts {
                let amount = cut.min(current.amount_remaining);
                let before = current.amount_paid;
                match current.pay(amount, at).unwrap() {
                    Some(next) => {
                        prop_assert!(next.is_balanced());
                        prop_assert!(next.amount_paid > before);
                        current = next;
                    }
                    None => break,
                }
            }
        }
    }
}
