//! Typed pain.001.001.03 document tree
//!
//! Covers the subset of CustomerCreditTransferInitiation the hub's
//! partner bank requires. Amounts and dates are kept as strings so a
//! parsed skeleton re-serialises without reformatting; the emitter owns
//! the canonical rendering of every value it stamps.

use crate::{Error, Result};
use quick_xml::se::Serializer;
use serde::{Deserialize, Serialize};

/// Namespace a usable skeleton must declare on its root element
pub const PAIN001_NAMESPACE: &str = "urn:iso:std:iso:20022:tech:xsd:pain.001.001.03";

/// pain.001 Document root
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename = "Document")]
pub struct Document {
    #[serde(rename = "@xmlns")]
    /// Root namespace declaration
    pub xmlns: String,

    #[serde(rename = "CstmrCdtTrfInitn")]
    /// Message body
    pub initiation: CustomerCreditTransferInitiation,
}

/// CustomerCreditTransferInitiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerCreditTransferInitiation {
    #[serde(rename = "GrpHdr")]
    /// Group header
    pub group_header: GroupHeader,

    #[serde(rename = "PmtInf", default)]
    /// Payment groups, one per debtor
    pub payment_groups: Vec<PaymentGroup>,
}

/// Group header
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupHeader {
    #[serde(rename = "MsgId")]
    /// Point-to-point unique message id, at most 35 characters
    pub message_id: String,

    #[serde(rename = "CreDtTm")]
    /// Creation instant, ISO 8601 with milliseconds
    pub creation_date_time: String,

    #[serde(rename = "NbOfTxs")]
    /// Total transaction count across all groups
    pub number_of_transactions: String,

    #[serde(rename = "CtrlSum", skip_serializing_if = "Option::is_none")]
    /// Sum of all instructed amounts
    pub control_sum: Option<String>,

    #[serde(rename = "InitgPty")]
    /// Initiating party
    pub initiating_party: Party,
}

/// Payment group: one debtor, many credit transfers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentGroup {
    #[serde(rename = "PmtInfId")]
    /// Group id, unique within the message
    pub payment_information_id: String,

    #[serde(rename = "PmtMtd")]
    /// Payment method (`TRF`)
    pub payment_method: String,

    #[serde(rename = "BtchBookg", skip_serializing_if = "Option::is_none")]
    /// Batch booking preference
    pub batch_booking: Option<bool>,

    #[serde(rename = "NbOfTxs", skip_serializing_if = "Option::is_none")]
    /// Transaction count within this group
    pub number_of_transactions: Option<String>,

    #[serde(rename = "CtrlSum", skip_serializing_if = "Option::is_none")]
    /// Sum of instructed amounts within this group
    pub control_sum: Option<String>,

    #[serde(rename = "ReqdExctnDt")]
    /// Requested execution date, `YYYY-MM-DD`
    pub requested_execution_date: String,

    #[serde(rename = "Dbtr")]
    /// Debtor
    pub debtor: Party,

    #[serde(rename = "DbtrAcct")]
    /// Debtor account
    pub debtor_account: CashAccount,

    #[serde(rename = "DbtrAgt")]
    /// Debtor agent
    pub debtor_agent: Agent,

    #[serde(rename = "ChrgBr", skip_serializing_if = "Option::is_none")]
    /// Charge bearer code
    pub charge_bearer: Option<String>,

    #[serde(rename = "CdtTrfTxInf", default)]
    /// Credit transfers
    pub transactions: Vec<CreditTransfer>,
}

/// Party (debtor, creditor or initiating party)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Party {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    /// Name
    pub name: Option<String>,

    #[serde(rename = "PstlAdr", skip_serializing_if = "Option::is_none")]
    /// Postal address
    pub postal_address: Option<PostalAddress>,

    #[serde(rename = "Id", skip_serializing_if = "Option::is_none")]
    /// Identification
    pub identification: Option<PartyIdentification>,

    #[serde(rename = "CtctDtls", skip_serializing_if = "Option::is_none")]
    /// Contact details
    pub contact_details: Option<ContactDetails>,
}

/// Postal address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostalAddress {
    #[serde(rename = "Ctry", skip_serializing_if = "Option::is_none")]
    /// ISO 3166-1 alpha-2 country
    pub country: Option<String>,
}

/// Party identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyIdentification {
    #[serde(rename = "OrgId", skip_serializing_if = "Option::is_none")]
    /// Organisation identification
    pub organisation: Option<OrganisationIdentification>,
}

/// Organisation identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrganisationIdentification {
    #[serde(rename = "BICOrBEI", skip_serializing_if = "Option::is_none")]
    /// Business identifier code
    pub bic_or_bei: Option<String>,
}

/// Contact details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContactDetails {
    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    /// Contact name
    pub name: Option<String>,
}

/// Cash account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashAccount {
    #[serde(rename = "Id")]
    /// Account identification
    pub id: AccountIdentification,

    #[serde(rename = "Ccy", skip_serializing_if = "Option::is_none")]
    /// Account currency
    pub currency: Option<String>,
}

/// Account identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountIdentification {
    #[serde(rename = "IBAN", skip_serializing_if = "Option::is_none")]
    /// IBAN form
    pub iban: Option<String>,

    #[serde(rename = "Othr", skip_serializing_if = "Option::is_none")]
    /// Proprietary form (unsigned account number)
    pub other: Option<GenericAccountIdentification>,
}

/// Proprietary account identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericAccountIdentification {
    #[serde(rename = "Id")]
    /// Account number
    pub id: String,
}

/// Agent (financial institution)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Agent {
    #[serde(rename = "FinInstnId")]
    /// Financial institution identification
    pub financial_institution: FinancialInstitutionIdentification,
}

/// Financial institution identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialInstitutionIdentification {
    #[serde(rename = "BIC", skip_serializing_if = "Option::is_none")]
    /// BIC
    pub bic: Option<String>,

    #[serde(rename = "Nm", skip_serializing_if = "Option::is_none")]
    /// Name
    pub name: Option<String>,
}

/// Credit transfer entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditTransfer {
    #[serde(rename = "PmtId")]
    /// Payment identification
    pub payment_id: PaymentIdentification,

    #[serde(rename = "Amt")]
    /// Amount
    pub amount: Amount,

    #[serde(rename = "ChrgBr", skip_serializing_if = "Option::is_none")]
    /// Charge bearer code
    pub charge_bearer: Option<String>,

    #[serde(rename = "CdtrAgt", skip_serializing_if = "Option::is_none")]
    /// Creditor agent
    pub creditor_agent: Option<Agent>,

    #[serde(rename = "Cdtr")]
    /// Creditor
    pub creditor: Party,

    #[serde(rename = "CdtrAcct")]
    /// Creditor account
    pub creditor_account: CashAccount,

    #[serde(rename = "RmtInf", skip_serializing_if = "Option::is_none")]
    /// Remittance information
    pub remittance: Option<RemittanceInformation>,
}

/// Payment identification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIdentification {
    #[serde(rename = "InstrId", skip_serializing_if = "Option::is_none")]
    /// Instruction id
    pub instruction_id: Option<String>,

    #[serde(rename = "EndToEndId")]
    /// End-to-end id; the partner bank forbids the all-zero value
    pub end_to_end_id: String,
}

/// Amount wrapper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    #[serde(rename = "InstdAmt")]
    /// Instructed amount with its currency attribute
    pub instructed: CurrencyAndAmount,
}

/// Currency-attributed amount
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyAndAmount {
    #[serde(rename = "@Ccy")]
    /// ISO 4217 code
    pub currency: String,

    #[serde(rename = "$text")]
    /// Canonical decimal rendering
    pub value: String,
}

/// Remittance information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemittanceInformation {
    #[serde(rename = "Ustrd", skip_serializing_if = "Option::is_none")]
    /// Unstructured remittance lines
    pub unstructured: Option<Vec<String>>,
}

/// Parse a pain.001 document
pub fn parse(xml: &str) -> Result<Document> {
    quick_xml::de::from_str(xml).map_err(|e| Error::Xml(e.to_string()))
}

/// Serialise a document: XML declaration plus 2-space-indented body
pub fn to_xml(document: &Document) -> Result<String> {
    let mut body = String::new();
    let mut serializer = Serializer::new(&mut body);
    serializer.indent(' ', 2);
    document
        .serialize(serializer)
        .map_err(|e| Error::Xml(e.to_string()))?;
    Ok(format!("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}", body))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = include_str!("template.xml");

    #[test]
    fn embedded_template_parses() {
        let doc = parse(TEMPLATE).unwrap();
        assert_eq!(doc.xmlns, PAIN001_NAMESPACE);
        assert_eq!(doc.initiation.payment_groups.len(), 1);
        assert_eq!(doc.initiation.payment_groups[0].transactions.len(), 1);
        assert_eq!(doc.initiation.payment_groups[0].payment_method, "TRF");
    }

    #[test]
    fn template_round_trips_through_serialisation() {
        let doc = parse(TEMPLATE).unwrap();
        let xml = to_xml(&doc).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        let again = parse(&xml).unwrap();
        assert_eq!(doc, again);
    }

    #[test]
    fn amount_keeps_currency_attribute() {
        let doc = parse(TEMPLATE).unwrap();
        let instd = &doc.initiation.payment_groups[0].transactions[0]
            .amount
            .instructed;
        assert_eq!(instd.currency, "USD");

        let xml = to_xml(&doc).unwrap();
        assert!(xml.contains("<InstdAmt Ccy=\"USD\">"));
    }
}
