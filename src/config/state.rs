use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::load_state;
use crate::error::Result;
use crate::numbering::{DocumentKind, DocumentLister, DocumentNumber, DocumentRef};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub history: Vec<StoredDocument>,
}

/// A persisted document. Numbers are kept as plain strings so legacy values
/// like "Auto" survive a round trip through the store.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StoredDocument {
    pub id: String,
    pub kind: DocumentKind,
    pub number: String,
    /// Party id from parties.toml, or the company name for imported records.
    pub party: String,
    #[serde(default)]
    pub ship_to: Option<String>,
    pub date: NaiveDate,
    /// Original item inputs (e.g., ["consulting:8", "development:40"])
    #[serde(default)]
    pub items: Vec<String>,
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    pub total: Decimal,
    #[serde(default)]
    pub file: Option<String>,
}

fn default_tax_enabled() -> bool {
    true
}

impl StoredDocument {
    pub fn to_ref(&self) -> DocumentRef {
        DocumentRef {
            id: self.id.clone(),
            number: self.number.clone(),
            created_at: self.date,
        }
    }

    /// Kind implied by a structured number's prefix, else the stored kind.
    pub fn effective_kind(&self) -> DocumentKind {
        DocumentNumber::parse(&self.number).map_or(self.kind, |n| n.kind())
    }

    /// Financial-year tag of the number, if it is a structured one.
    pub fn financial_year(&self) -> Option<String> {
        DocumentNumber::parse(&self.number)
            .and_then(|n| n.financial_year().map(|fy| fy.to_string()))
    }
}

impl State {
    /// Documents of `kind`, judged by number prefix so a mislabelled entry
    /// still takes part in allocation and uniqueness checks.
    pub fn refs(&self, kind: DocumentKind) -> Vec<DocumentRef> {
        self.history
            .iter()
            .filter(|doc| doc.effective_kind() == kind)
            .map(StoredDocument::to_ref)
            .collect()
    }
}

/// The history file seen as a document store. Every listing re-reads
/// state.toml, so nothing is cached between calls.
pub struct HistoryStore {
    dir: PathBuf,
}

impl HistoryStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
        }
    }
}

impl DocumentLister for HistoryStore {
    fn list_documents(&self, kind: DocumentKind) -> Result<Vec<DocumentRef>> {
        Ok(load_state(&self.dir)?.refs(kind))
    }
}
