//! Settlement input validation
//!
//! Canonicalises a window snapshot into one net position per
//! participant, rejecting the malformed shapes the ledger can hand us.
//! Checks run in a fixed order and the first failure wins, with one
//! exception: precision conformance inspects every position so the
//! error can name all offenders at once.

use crate::{
    currency::{self, Currency},
    types::{ParticipantPosition, SettlementWindow},
    Error, Result,
};
use rust_decimal::Decimal;
use std::collections::HashSet;
use tracing::{debug, warn};

/// A validated, canonicalised settlement window
///
/// Positions are sorted by amount ascending (creditors first), ties
/// broken by participant id ascending. That ordering is the sole source
/// of determinism for the netting pass.
#[derive(Debug, Clone)]
pub struct ValidatedSettlement {
    /// Window id
    pub window_id: u64,

    /// The single currency shared by every position
    pub currency: Currency,

    /// Registry decimal places for that currency
    pub decimal_places: u32,

    /// Sorted positions
    pub positions: Vec<ParticipantPosition>,
}

/// Validate and canonicalise a window snapshot
pub fn validate(window: &SettlementWindow) -> Result<ValidatedSettlement> {
    if window.state != "SETTLED" {
        warn!(window_id = window.id, state = %window.state, "window not in SETTLED state");
    }

    // 1. Non-empty
    if window.participants.is_empty() {
        return Err(Error::EmptySettlement);
    }

    // 2. One settlement account per participant
    for participant in &window.participants {
        if participant.accounts.len() != 1 {
            return Err(Error::MultipleAccounts(participant.id));
        }
    }

    // 3. Unique participants
    let mut seen = HashSet::new();
    for participant in &window.participants {
        if !seen.insert(participant.id) {
            return Err(Error::DuplicateParticipant(participant.id));
        }
    }

    // 4. Uniform currency
    let first_code = &window.participants[0].accounts[0]
        .net_settlement_amount
        .currency;
    for participant in &window.participants {
        if &participant.accounts[0].net_settlement_amount.currency != first_code {
            return Err(Error::MixedCurrencies);
        }
    }

    // 5. Known currency
    let currency = Currency::from_code(first_code)?;
    let decimal_places = currency::decimal_places(currency)?;

    let mut positions: Vec<ParticipantPosition> = window
        .participants
        .iter()
        .map(|p| ParticipantPosition {
            participant_id: p.id,
            account_id: p.accounts[0].id,
            amount: p.accounts[0].net_settlement_amount.amount,
        })
        .collect();

    // 6. Precision conformance, aggregating every offender
    let offenders: Vec<(u64, Decimal)> = positions
        .iter()
        .filter(|p| !currency::conforms_to_precision(p.amount, decimal_places))
        .map(|p| (p.participant_id, p.amount))
        .collect();
    if !offenders.is_empty() {
        return Err(Error::InvalidPrecision(offenders));
    }

    // 7. Zero sum
    let sum: Decimal = positions.iter().map(|p| p.amount).sum();
    if !sum.is_zero() {
        return Err(Error::NonZeroSum(sum));
    }

    positions.sort_by(|a, b| {
        a.amount
            .cmp(&b.amount)
            .then(a.participant_id.cmp(&b.participant_id))
    });

    debug!(
        window_id = window.id,
        participants = positions.len(),
        currency = %currency,
        "window validated"
    );

    Ok(ValidatedSettlement {
        window_id: window.id,
        currency,
        decimal_places,
        positions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NetSettlementAmount, WindowAccount, WindowParticipant};

    fn account(id: u64, amount: &str, currency: &str) -> WindowAccount {
        WindowAccount {
            id,
            net_settlement_amount: NetSettlementAmount {
                amount: amount.parse().unwrap(),
                currency: currency.to_string(),
            },
        }
    }

    fn window(positions: &[(u64, &str)]) -> SettlementWindow {
        SettlementWindow {
            id: 7,
            state: "SETTLED".to_string(),
            participants: positions
                .iter()
                .map(|(id, amount)| WindowParticipant {
                    id: *id,
                    accounts: vec![account(id * 10, amount, "USD")],
                })
                .collect(),
        }
    }

    #[test]
    fn rejects_empty_window() {
        let result = validate(&window(&[]));
        assert!(matches!(result, Err(Error::EmptySettlement)));
    }

    #[test]
    fn rejects_multiple_accounts() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.participants[0]
            .accounts
            .push(account(99, "0.00", "USD"));
        assert!(matches!(validate(&w), Err(Error::MultipleAccounts(1))));
    }

    #[test]
    fn rejects_duplicate_participant() {
        let w = window(&[(1, "10.00"), (1, "-10.00")]);
        assert!(matches!(validate(&w), Err(Error::DuplicateParticipant(1))));
    }

    #[test]
    fn rejects_mixed_currencies() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.participants[1].accounts[0].net_settlement_amount.currency = "EUR".to_string();
        assert!(matches!(validate(&w), Err(Error::MixedCurrencies)));
    }

    #[test]
    fn rejects_unknown_currency() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        for p in &mut w.participants {
            p.accounts[0].net_settlement_amount.currency = "ZZZ".to_string();
        }
        let result = validate(&w);
        assert!(matches!(result, Err(Error::UnsupportedCurrency(code)) if code == "ZZZ"));
    }

    #[test]
    fn aggregates_every_precision_offender() {
        let w = window(&[(1, "0.001"), (2, "0.009"), (3, "-0.010")]);
        match validate(&w) {
            Err(Error::InvalidPrecision(offenders)) => {
                assert_eq!(offenders.len(), 2);
                assert_eq!(offenders[0].0, 1);
                assert_eq!(offenders[1].0, 2);
            }
            other => panic!("expected InvalidPrecision, got {:?}", other),
        }
    }

    #[test]
    fn rejects_nonzero_sum() {
        let w = window(&[(1, "1.00"), (2, "-2.00")]);
        match validate(&w) {
            Err(Error::NonZeroSum(sum)) => assert_eq!(sum, "-1.00".parse().unwrap()),
            other => panic!("expected NonZeroSum, got {:?}", other),
        }
    }

    #[test]
    fn sorts_creditors_first_with_id_tiebreak() {
        let w = window(&[(4, "5"), (1, "-4"), (3, "3"), (2, "-4")]);
        let validated = validate(&w).unwrap();
        let order: Vec<u64> = validated
            .positions
            .iter()
            .map(|p| p.participant_id)
            .collect();
        assert_eq!(order, vec![1, 2, 3, 4]);
        assert_eq!(validated.currency.as_str(), "USD");
        assert_eq!(validated.decimal_places, 2);
    }

    #[test]
    fn tolerates_non_settled_state() {
        let mut w = window(&[(1, "10.00"), (2, "-10.00")]);
        w.state = "PENDING_SETTLEMENT".to_string();
        assert!(validate(&w).is_ok());
    }
}
