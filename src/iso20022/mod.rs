//! ISO 20022 pain.001.001.03 document model and payment-file emitter
//!
//! # Standards
//!
//! - ISO 20022: Universal financial industry message scheme
//! - pain.001.001.03: CustomerCreditTransferInitiation, version 3
//!
//! The partner bank consumes pain.001 instruction files; the emitter
//! expands a skeleton document (one prototype payment group, one
//! prototype transaction) into one `PmtInf` per payer in the matrix.

pub mod emitter;
pub mod pain001;

pub use emitter::PaymentFileBuilder;
pub use pain001::{Document, PAIN001_NAMESPACE};
