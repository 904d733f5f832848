//! Minimum-payments netting
//!
//! Reduces a window's net positions to a minimal set of pairwise credit
//! transfers. Greedy two-pointer pass: the most exposed creditor is
//! settled against the largest remaining debtor until every position is
//! discharged.
//!
//! # Example
//!
//! ```text
//! Net positions:           Transfers:
//!   1: -3  (owed 3)          3 pays 1: 3
//!   2: -7  (owed 7)          3 pays 2: 7
//!   3: +10 (owes 10)
//! ```
//!
//! Every amount stays in [`Decimal`] end to end; comparisons are exact.

use crate::{matrix::PaymentMatrix, validator::ValidatedSettlement, Error, Result};
use rust_decimal::Decimal;
use std::collections::VecDeque;
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct OpenPosition {
    participant_id: u64,
    amount: Decimal,
}

/// Net a validated window into a payment matrix
///
/// Consumes the validator's sorted position list: creditors from the
/// front (most negative first), debtors popped from the back (largest
/// first). With equal amounts the later sort entry, the larger
/// participant id, is consumed first on the debtor side; the ordering of
/// the input is the sole source of determinism.
pub fn net(settlement: &ValidatedSettlement) -> Result<PaymentMatrix> {
    let mut matrix = PaymentMatrix::new(settlement.currency);

    let split = settlement
        .positions
        .iter()
        .position(|p| p.amount > Decimal::ZERO)
        .unwrap_or(settlement.positions.len());

    let mut creditors: VecDeque<OpenPosition> = settlement.positions[..split]
        .iter()
        .map(|p| OpenPosition {
            participant_id: p.participant_id,
            amount: p.amount,
        })
        .collect();
    let mut debtors: Vec<OpenPosition> = settlement.positions[split..]
        .iter()
        .map(|p| OpenPosition {
            participant_id: p.participant_id,
            amount: p.amount,
        })
        .collect();

    while let Some(mut creditor) = creditors.pop_front() {
        // Consume debtors that cannot cover the creditor alone, or that
        // discharge it exactly.
        while let Some(debtor) = debtors.last() {
            if creditor.amount + debtor.amount > Decimal::ZERO {
                break;
            }
            let debtor = debtors.pop().ok_or(Error::FailedToBalance)?;
            matrix.insert(debtor.participant_id, creditor.participant_id, debtor.amount);
            creditor.amount += debtor.amount;
        }

        // Draw the remainder from the current largest debtor.
        if creditor.amount < Decimal::ZERO {
            let debtor = debtors.last_mut().ok_or(Error::FailedToBalance)?;
            matrix.insert(debtor.participant_id, creditor.participant_id, -creditor.amount);
            debtor.amount += creditor.amount;
        }
    }

    if !debtors.is_empty() {
        return Err(Error::FailedToBalance);
    }

    debug!(
        window_id = settlement.window_id,
        transfers = matrix.transaction_count(),
        control_sum = %matrix.control_sum(),
        "netting complete"
    );

    Ok(matrix)
}
