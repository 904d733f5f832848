//! Settlement Hub core
//!
//! Implements minimum-payments netting and ISO 20022 payment-file
//! generation for an interbank settlement hub.
//!
//! # Architecture
//!
//! The core runs at settlement-window close, after the surrounding
//! services have fetched the window snapshot from the ledger:
//!
//! 1. **Validation**: canonicalise the window snapshot into one net
//!    position per participant ([`validator`])
//! 2. **Netting**: reduce the positions to a minimal set of pairwise
//!    credit transfers ([`netting`])
//! 3. **Audit**: re-check conservation on the resulting matrix
//!    ([`matrix`])
//! 4. **Emission**: render a pain.001.001.03 credit-transfer
//!    instruction file for the partner bank ([`iso20022`])
//!
//! The [`fxp`] module is an orthogonal ingress path: it shapes FX-rate
//! records into the partner bank's inner rate block and owns the
//! string-shaped decimal-rate contracts that come with it.
//!
//! # Numeric model
//!
//! Every monetary value is a [`rust_decimal::Decimal`]; nothing in the
//! core converts an amount through binary floating point. Positions are
//! signed: positive means the participant owes the hub, negative means
//! the hub owes the participant, and a window only validates when the
//! positions sum to exactly zero.
//!
//! # Example
//!
//! ```no_run
//! use settlement_hub::{Config, DfspDirectory, SettlementEngine, SettlementWindow};
//!
//! fn main() -> settlement_hub::Result<()> {
//!     let window = SettlementWindow::from_json(r#"{"id":42,"state":"SETTLED","participants":[]}"#)?;
//!     let directory = DfspDirectory::from_json("{}")?;
//!
//!     let mut engine = SettlementEngine::new(Config::default())?;
//!     let run = engine.generate_payment_file(&window, &directory)?;
//!     println!("window {} settled with {} transfers", run.window_id, run.transfer_count);
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod currency;
pub mod directory;
pub mod engine;
pub mod error;
pub mod fxp;
pub mod iso20022;
pub mod matrix;
pub mod netting;
pub mod types;
pub mod validator;

// Re-exports
pub use config::Config;
pub use currency::Currency;
pub use directory::{DfspDirectory, DfspRecord};
pub use engine::{SettlementEngine, SettlementRun};
pub use error::{Error, Result};
pub use iso20022::PaymentFileBuilder;
pub use matrix::PaymentMatrix;
pub use netting::net;
pub use types::{ParticipantPosition, SettlementWindow};
pub use validator::{validate, ValidatedSettlement};
