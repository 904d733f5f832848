//! Core types at the engine boundary
//!
//! The window snapshot arrives as JSON from the ledger admin API in the
//! shape below; everything downstream of the validator works on the
//! canonicalised [`ParticipantPosition`] records instead.
//!
//! ```json
//! { "id": 42, "state": "SETTLED",
//!   "participants": [
//!     { "id": 1, "accounts": [
//!         { "id": 11, "netSettlementAmount":
//!             { "amount": "10.00", "currency": "USD" } } ] } ] }
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A closed settlement window as reported by the ledger
#[derive(Debug, Clone, Deserialize)]
pub struct SettlementWindow {
    /// Window id
    pub id: u64,

    /// Workflow state at snapshot time (expected `SETTLED`)
    pub state: String,

    /// One entry per participant in the window
    pub participants: Vec<WindowParticipant>,
}

impl SettlementWindow {
    /// Parse a window snapshot from the ledger's JSON shape
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A participant's entry in the window snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct WindowParticipant {
    /// Participant id, unique within a window
    pub id: u64,

    /// Settlement accounts; exactly one is valid
    pub accounts: Vec<WindowAccount>,
}

/// A settlement account and its net position
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowAccount {
    /// Account id on the hub
    pub id: u64,

    /// Signed net position at window close
    pub net_settlement_amount: NetSettlementAmount,
}

/// Signed net settlement amount
///
/// Positive means the participant owes the hub; negative means the hub
/// owes the participant.
#[derive(Debug, Clone, Deserialize)]
pub struct NetSettlementAmount {
    /// Amount as an exact decimal (JSON carries it as a string)
    pub amount: Decimal,

    /// ISO 4217 currency code
    pub currency: String,
}

/// Canonicalised position: one settlement account per participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParticipantPosition {
    /// Participant id
    pub participant_id: u64,

    /// The participant's settlement account on the hub
    pub account_id: u64,

    /// Signed net position
    pub amount: Decimal,
}
