//! Participant directory consumed by the payment-file emitter
//!
//! Maps participant ids to the legal name, country and partner-bank
//! account number the pain.001 file must carry. Keys arrive as strings
//! in the JSON shape (`{"1": {"name": ..., ...}}`).

use crate::{Error, Result};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Directory entry for a single DFSP
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DfspRecord {
    /// Legal name
    pub name: String,

    /// ISO 3166-1 alpha-2 country code
    pub country: String,

    /// Partner-bank account number; digit string, leading zeros allowed
    pub account_id: String,

    /// Creditor contact name override, when the DFSP registered one
    #[serde(default)]
    pub contact_name: Option<String>,
}

/// Directory of every DFSP the emitter may name
#[derive(Debug, Clone, Default)]
pub struct DfspDirectory {
    entries: BTreeMap<u64, DfspRecord>,
}

impl DfspDirectory {
    /// Parse the directory JSON shape
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, DfspRecord> = serde_json::from_str(json)?;
        let mut entries = BTreeMap::new();
        for (key, record) in raw {
            let id: u64 = key.parse().map_err(|_| Error::InvalidInput {
                field: "participant_id",
                reason: format!("directory key '{}' is not an integer", key),
            })?;
            entries.insert(id, record);
        }
        Ok(Self { entries })
    }

    /// Look up a participant
    pub fn get(&self, participant_id: u64) -> Option<&DfspRecord> {
        self.entries.get(&participant_id)
    }

    /// Add an entry
    pub fn insert(&mut self, participant_id: u64, record: DfspRecord) {
        self.entries.insert(participant_id, record);
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the directory is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
