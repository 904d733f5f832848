//! Payment-file generation from a netted matrix
//!
//! The builder holds a parsed skeleton document carrying one prototype
//! payment group and one prototype transaction. Every call deep-clones
//! the skeleton, so successive files are independent and the template is
//! never mutated.

use super::pain001::{
    self, ContactDetails, CurrencyAndAmount, Document, GenericAccountIdentification,
    OrganisationIdentification, PartyIdentification, PostalAddress, RemittanceInformation,
    PAIN001_NAMESPACE,
};
use crate::{
    config::Config, directory::DfspDirectory, matrix::PaymentMatrix, Error, Result,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use rand::{CryptoRng, RngCore};
use rust_decimal::Decimal;
use tracing::info;

const EMBEDDED_TEMPLATE: &str = include_str!("template.xml");

/// MsgId is bounded to 35 characters by the schema; 27 random bytes
/// base64-encode to 36, truncated to fit. The ~64^35 space makes
/// collisions negligible at the hub's traffic volumes.
const MSG_ID_LEN: usize = 35;
const MSG_ID_ENTROPY: usize = 27;

/// EndToEndId is 10 hex characters from 5 random bytes. The partner
/// bank rejects the all-zero id, so the zero vector is re-rolled.
const END_TO_END_ENTROPY: usize = 5;

/// pain.001 payment-file builder
///
/// Generic over the random source so tests can inject a seeded
/// generator; production uses the operating system CSPRNG.
#[derive(Debug)]
pub struct PaymentFileBuilder<R = OsRng> {
    template: Document,
    hub_bic: String,
    creditor_contact: String,
    rng: R,
}

impl PaymentFileBuilder<OsRng> {
    /// Create a builder from configuration
    ///
    /// Reads the skeleton from `config.template_path` when set,
    /// otherwise uses the embedded one.
    pub fn from_config(config: &Config) -> Result<Self> {
        let xml = match &config.template_path {
            Some(path) => std::fs::read_to_string(path)?,
            None => EMBEDDED_TEMPLATE.to_string(),
        };
        Self::with_rng(&xml, config, OsRng)
    }
}

impl<R: RngCore + CryptoRng> PaymentFileBuilder<R> {
    /// Create a builder from a skeleton document and an injected RNG
    pub fn with_rng(template_xml: &str, config: &Config, rng: R) -> Result<Self> {
        let template = pain001::parse(template_xml)?;
        check_template(&template)?;
        Ok(Self {
            template,
            hub_bic: config.hub_bic.clone(),
            creditor_contact: config.creditor_contact.clone(),
            rng,
        })
    }

    /// Generate a payment file stamped with the current instant
    pub fn build(
        &mut self,
        matrix: &PaymentMatrix,
        directory: &DfspDirectory,
        window_id: u64,
    ) -> Result<String> {
        self.build_at(matrix, directory, window_id, Utc::now())
    }

    /// Generate a payment file with an explicit creation instant
    ///
    /// With a fixed instant and a seeded RNG the output is
    /// byte-reproducible, which the test suite relies on.
    pub fn build_at(
        &mut self,
        matrix: &PaymentMatrix,
        directory: &DfspDirectory,
        window_id: u64,
        created_at: DateTime<Utc>,
    ) -> Result<String> {
        // Every payer and payee must resolve before anything is built.
        for (payer, payees) in matrix.payers() {
            if directory.get(payer).is_none() {
                return Err(Error::UnknownParticipant(payer));
            }
            for payee in payees.keys() {
                if directory.get(*payee).is_none() {
                    return Err(Error::UnknownParticipant(*payee));
                }
            }
        }

        let mut document = self.template.clone();

        let header = &mut document.initiation.group_header;
        header.message_id = self.message_id();
        header.creation_date_time = created_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
        header.number_of_transactions = matrix.transaction_count().to_string();
        header.control_sum = Some(matrix.control_sum().to_string());

        let mut prototype_group = document.initiation.payment_groups[0].clone();
        let mut prototype_tx = prototype_group.transactions[0].clone();
        prototype_tx.remittance = Some(RemittanceInformation {
            unstructured: Some(vec![format!("Settlement Window {}", window_id)]),
        });
        prototype_group.transactions.clear();

        let execution_date = created_at.format("%Y-%m-%d").to_string();
        let currency = matrix.currency().as_str().to_string();

        let mut groups = Vec::with_capacity(matrix.payers().count());
        for (ordinal, (payer, payees)) in matrix.payers().enumerate() {
            let debtor = directory.get(payer).ok_or(Error::UnknownParticipant(payer))?;

            let mut group = prototype_group.clone();
            group.payment_information_id = ordinal.to_string();
            group.number_of_transactions = Some(payees.len().to_string());
            group.control_sum = Some(payees.values().copied().sum::<Decimal>().to_string());
            group.requested_execution_date = execution_date.clone();
            group.debtor.name = Some(debtor.name.clone());
            group.debtor.postal_address = Some(PostalAddress {
                country: Some(debtor.country.clone()),
            });
            group.debtor.identification = Some(PartyIdentification {
                organisation: Some(OrganisationIdentification {
                    bic_or_bei: Some(self.hub_bic.clone()),
                }),
            });
            group.debtor_account.id.iban = None;
            group.debtor_account.id.other = Some(GenericAccountIdentification {
                id: strip_leading_zeros(&debtor.account_id).to_string(),
            });
            group.debtor_account.currency = Some(currency.clone());

            for (payee, amount) in payees {
                let creditor = directory
                    .get(*payee)
                    .ok_or(Error::UnknownParticipant(*payee))?;

                let mut tx = prototype_tx.clone();
                tx.payment_id.end_to_end_id = self.end_to_end_id();
                tx.amount.instructed = CurrencyAndAmount {
                    currency: currency.clone(),
                    value: amount.to_string(),
                };
                tx.creditor.name = Some(creditor.name.clone());
                tx.creditor.postal_address = Some(PostalAddress {
                    country: Some(creditor.country.clone()),
                });
                tx.creditor.contact_details = Some(ContactDetails {
                    name: Some(
                        creditor
                            .contact_name
                            .clone()
                            .unwrap_or_else(|| self.creditor_contact.clone()),
                    ),
                });
                tx.creditor_account.id.iban = None;
                tx.creditor_account.id.other = Some(GenericAccountIdentification {
                    id: strip_leading_zeros(&creditor.account_id).to_string(),
                });
                group.transactions.push(tx);
            }

            groups.push(group);
        }
        document.initiation.payment_groups = groups;

        info!(
            window_id,
            transfers = matrix.transaction_count(),
            "payment file generated"
        );

        pain001::to_xml(&document)
    }

    fn message_id(&mut self) -> String {
        let mut bytes = [0u8; MSG_ID_ENTROPY];
        self.rng.fill_bytes(&mut bytes);
        let mut token = BASE64.encode(bytes);
        token.truncate(MSG_ID_LEN);
        token
    }

    fn end_to_end_id(&mut self) -> String {
        let mut bytes = [0u8; END_TO_END_ENTROPY];
        loop {
            self.rng.fill_bytes(&mut bytes);
            if bytes.iter().any(|b| *b != 0) {
                break;
            }
        }
        hex::encode(bytes)
    }
}

fn check_template(template: &Document) -> Result<()> {
    if template.xmlns != PAIN001_NAMESPACE {
        return Err(Error::BadTemplate(format!(
            "unexpected namespace '{}'",
            template.xmlns
        )));
    }
    let groups = &template.initiation.payment_groups;
    if groups.is_empty() {
        return Err(Error::BadTemplate("no prototype PmtInf".to_string()));
    }
    if groups[0].transactions.is_empty() {
        return Err(Error::BadTemplate("no prototype CdtTrfTxInf".to_string()));
    }
    Ok(())
}

/// The partner bank expects unsigned account numbers without leading
/// zeros; an all-zero account collapses to "0".
fn strip_leading_zeros(digits: &str) -> &str {
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}
