//! Payment matrix: the netting result
//!
//! A sparse `payer → payee → amount` table. Ordered maps give the
//! deterministic iteration the emitter depends on: payers ascending,
//! payees ascending within each payer.

use crate::{currency::Currency, types::ParticipantPosition, Error, Result};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Sparse table of pairwise credit transfers discharging a window
///
/// Invariants (re-checked by [`PaymentMatrix::audit`]):
/// 1. every amount is strictly positive;
/// 2. each payer's outgoing sum equals its original debit;
/// 3. each payee's incoming sum equals its original credit;
/// 4. all entries share the window's single currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMatrix {
    currency: Currency,
    cells: BTreeMap<u64, BTreeMap<u64, Decimal>>,
}

impl PaymentMatrix {
    /// Create an empty matrix for a currency
    pub(crate) fn new(currency: Currency) -> Self {
        Self {
            currency,
            cells: BTreeMap::new(),
        }
    }

    /// Record a transfer from `payer` to `payee`
    pub(crate) fn insert(&mut self, payer: u64, payee: u64, amount: Decimal) {
        debug_assert!(amount > Decimal::ZERO);
        self.cells.entry(payer).or_default().insert(payee, amount);
    }

    /// The single currency every entry is denominated in
    pub fn currency(&self) -> Currency {
        self.currency
    }

    /// Payers in ascending order with their payee rows
    pub fn payers(&self) -> impl Iterator<Item = (u64, &BTreeMap<u64, Decimal>)> {
        self.cells.iter().map(|(payer, row)| (*payer, row))
    }

    /// Flat iteration over `(payer, payee, amount)` in deterministic order
    pub fn iter(&self) -> impl Iterator<Item = (u64, u64, Decimal)> + '_ {
        self.cells.iter().flat_map(|(payer, row)| {
            row.iter()
                .map(move |(payee, amount)| (*payer, *payee, *amount))
        })
    }

    /// Total number of transfers
    pub fn transaction_count(&self) -> usize {
        self.cells.values().map(|row| row.len()).sum()
    }

    /// Sum of all transfer amounts
    pub fn control_sum(&self) -> Decimal {
        self.iter().map(|(_, _, amount)| amount).sum()
    }

    /// Amount from `payer` to `payee`, if any
    pub fn get(&self, payer: u64, payee: u64) -> Option<Decimal> {
        self.cells.get(&payer).and_then(|row| row.get(&payee)).copied()
    }

    /// Re-check the matrix invariants against the originating positions
    ///
    /// Any violation is a defect in the netting pass, reported as
    /// [`Error::FailedToBalance`]. The engine runs this before emission;
    /// the test suite leans on it heavily.
    pub fn audit(&self, positions: &[ParticipantPosition]) -> Result<()> {
        let mut outgoing: BTreeMap<u64, Decimal> = BTreeMap::new();
        let mut incoming: BTreeMap<u64, Decimal> = BTreeMap::new();

        for (payer, payee, amount) in self.iter() {
            if amount <= Decimal::ZERO {
                return Err(Error::FailedToBalance);
            }
            *outgoing.entry(payer).or_insert(Decimal::ZERO) += amount;
            *incoming.entry(payee).or_insert(Decimal::ZERO) += amount;
        }

        for position in positions {
            let id = position.participant_id;
            let out = outgoing.remove(&id).unwrap_or(Decimal::ZERO);
            let inc = incoming.remove(&id).unwrap_or(Decimal::ZERO);

            let (expected_out, expected_in) = if position.amount > Decimal::ZERO {
                (position.amount, Decimal::ZERO)
            } else {
                (Decimal::ZERO, position.amount.abs())
            };
            if out != expected_out || inc != expected_in {
                return Err(Error::FailedToBalance);
            }
        }

        // Transfers naming a participant outside the window
        if !outgoing.is_empty() || !incoming.is_empty() {
            return Err(Error::FailedToBalance);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usd() -> Currency {
        Currency::from_code("USD").unwrap()
    }

    fn position(id: u64, amount: &str) -> ParticipantPosition {
        ParticipantPosition {
            participant_id: id,
            account_id: id * 10,
            amount: amount.parse().unwrap(),
        }
    }

    #[test]
    fn iteration_is_ordered() {
        let mut matrix = PaymentMatrix::new(usd());
        matrix.insert(4, 2, "1".parse().unwrap());
        matrix.insert(3, 2, "3".parse().unwrap());
        matrix.insert(4, 1, "4".parse().unwrap());

        let flat: Vec<(u64, u64)> = matrix.iter().map(|(p, q, _)| (p, q)).collect();
        assert_eq!(flat, vec![(3, 2), (4, 1), (4, 2)]);
        assert_eq!(matrix.transaction_count(), 3);
        assert_eq!(matrix.control_sum(), "8".parse().unwrap());
    }

    #[test]
    fn audit_accepts_balanced_matrix() {
        let mut matrix = PaymentMatrix::new(usd());
        matrix.insert(3, 1, "3".parse().unwrap());
        matrix.insert(3, 2, "7".parse().unwrap());

        let positions = vec![position(1, "-3"), position(2, "-7"), position(3, "10")];
        assert!(matrix.audit(&positions).is_ok());
    }

    #[test]
    fn audit_catches_short_payer() {
        let mut matrix = PaymentMatrix::new(usd());
        matrix.insert(3, 1, "3".parse().unwrap());
        // payer 3 owes 10 but only 3 is discharged

        let positions = vec![position(1, "-3"), position(2, "-7"), position(3, "10")];
        assert!(matches!(
            matrix.audit(&positions),
            Err(Error::FailedToBalance)
        ));
    }

    #[test]
    fn audit_catches_stranger_in_matrix() {
        let mut matrix = PaymentMatrix::new(usd());
        matrix.insert(9, 1, "3".parse().unwrap());

        let positions = vec![position(1, "-3"), position(3, "3")];
        assert!(matches!(
            matrix.audit(&positions),
            Err(Error::FailedToBalance)
        ));
    }
}
