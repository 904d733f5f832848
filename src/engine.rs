//! Settlement orchestration
//!
//! Ties the pipeline together: validate the window snapshot, net the
//! positions, audit the matrix, emit the payment file. Each run owns
//! its inputs and produces a fresh report; nothing is shared between
//! runs beyond the immutable template and currency registry, so the
//! engine may be driven from concurrent tasks.

use crate::{
    config::Config,
    currency::Currency,
    directory::DfspDirectory,
    iso20022::PaymentFileBuilder,
    matrix::PaymentMatrix,
    netting,
    types::SettlementWindow,
    validator, Result,
};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Settlement engine
pub struct SettlementEngine {
    builder: PaymentFileBuilder,
    config: Config,
}

impl std::fmt::Debug for SettlementEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettlementEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Outcome of one settlement run
#[derive(Debug, Clone, Serialize)]
pub struct SettlementRun {
    /// Run id
    pub run_id: Uuid,

    /// Window the run discharged
    pub window_id: u64,

    /// Common settlement currency
    pub currency: Currency,

    /// Participants in the window
    pub participant_count: usize,

    /// Credit transfers in the payment file
    pub transfer_count: usize,

    /// Sum of all transfer amounts
    pub control_sum: Decimal,

    /// The serialised pain.001 instruction file
    pub xml: String,
}

impl SettlementEngine {
    /// Create an engine from configuration
    pub fn new(config: Config) -> Result<Self> {
        let builder = PaymentFileBuilder::from_config(&config)?;
        Ok(Self { builder, config })
    }

    /// Net a closed window and generate its payment file
    pub fn generate_payment_file(
        &mut self,
        window: &SettlementWindow,
        directory: &DfspDirectory,
    ) -> Result<SettlementRun> {
        info!(window_id = window.id, service = %self.config.service_name, "starting settlement run");

        let validated = validator::validate(window)?;
        info!(
            window_id = window.id,
            participants = validated.positions.len(),
            currency = %validated.currency,
            "positions validated"
        );

        let matrix = netting::net(&validated)?;
        matrix.audit(&validated.positions)?;
        info!(
            window_id = window.id,
            transfers = matrix.transaction_count(),
            control_sum = %matrix.control_sum(),
            "netting complete"
        );

        let xml = self.builder.build(&matrix, directory, window.id)?;

        Ok(SettlementRun {
            run_id: Uuid::new_v4(),
            window_id: window.id,
            currency: matrix.currency(),
            participant_count: validated.positions.len(),
            transfer_count: matrix.transaction_count(),
            control_sum: matrix.control_sum(),
            xml,
        })
    }

    /// The matrix for a window, without emitting a file
    ///
    /// Exposed for callers that only need the netting result (reporting,
    /// dry runs against the workflow API).
    pub fn net_window(&self, window: &SettlementWindow) -> Result<PaymentMatrix> {
        let validated = validator::validate(window)?;
        let matrix = netting::net(&validated)?;
        matrix.audit(&validated.positions)?;
        Ok(matrix)
    }
}
