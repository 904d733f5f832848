//! Error types for the settlement core

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for settlement operations
pub type Result<T> = std::result::Result<T, Error>;

/// Settlement errors
///
/// Every failure is a tagged kind carrying the minimum evidence needed
/// to reproduce it. Errors are never retried internally; the core is
/// side-effect-free, so aborting leaves no state to roll back.
#[derive(Error, Debug)]
pub enum Error {
    /// Window snapshot contained no positions
    #[error("settlement window has no participant positions")]
    EmptySettlement,

    /// A participant reported more than one settlement account
    #[error("participant {0} holds more than one settlement account")]
    MultipleAccounts(u64),

    /// Two positions share a participant id
    #[error("participant {0} appears more than once in the window")]
    DuplicateParticipant(u64),

    /// Positions do not share a single currency
    #[error("settlement window mixes currencies")]
    MixedCurrencies,

    /// Currency is absent from the registry
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    /// One or more amounts exceed the currency's decimal places
    ///
    /// Aggregates every offending `(participant_id, amount)` pair.
    #[error("positions exceed currency precision: {0:?}")]
    InvalidPrecision(Vec<(u64, Decimal)>),

    /// Positions do not sum to exactly zero
    #[error("window positions sum to {0}, expected 0")]
    NonZeroSum(Decimal),

    /// Netting left an undischarged debtor (defect signal)
    ///
    /// Unreachable for any window that passed validation.
    #[error("netting failed to balance the window")]
    FailedToBalance,

    /// A payer or payee is missing from the participant directory
    #[error("participant {0} not present in the directory")]
    UnknownParticipant(u64),

    /// The payment-file template is not a usable pain.001.001.03 skeleton
    #[error("bad payment template: {0}")]
    BadTemplate(String),

    /// Malformed field on an FX-provider or directory record
    #[error("invalid input in field '{field}': {reason}")]
    InvalidInput {
        /// Name of the offending field
        field: &'static str,
        /// What was wrong with it
        reason: String,
    },

    /// XML parse or serialization error
    #[error("XML error: {0}")]
    Xml(String),

    /// JSON parse error at the engine boundary
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
