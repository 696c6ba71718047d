use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::{load_state, resolve_address, save_state, StoredDocument};
use crate::error::{DocumentError, Result};
use crate::numbering::{validate_uniqueness, DocumentKind, DocumentNumber};

const NUMBER_KEYS: &[&str] = &[
    "number",
    "documentNumber",
    "invoiceNumber",
    "quotationNumber",
    "proformaNumber",
    "poNumber",
];
const KIND_KEYS: &[&str] = &["kind", "type", "documentType"];
const DATE_KEYS: &[&str] = &["date", "createdAt", "created_at", "invoiceDate"];
const TOTAL_KEYS: &[&str] = &["grandTotal", "grand_total", "total", "amount"];
const PARTY_KEYS: &[&str] = &["billTo", "to", "client", "customer", "vendor"];
const ID_KEYS: &[&str] = &["id", "_id"];

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    /// Imported records whose number is a structured one.
    pub structured: usize,
    /// Records skipped because their id or number already exists.
    pub skipped: usize,
}

/// Import documents exported from an older system.
///
/// The file holds a JSON array of loosely-shaped records. Addresses go through
/// [`resolve_address`]; numbers are kept verbatim, so values like "Auto" stay
/// in history but never take part in numbering.
pub fn import_legacy(cfg_dir: &Path, file: &Path) -> Result<ImportSummary> {
    let records: Vec<Value> = serde_json::from_str(&fs::read_to_string(file)?)?;
    let mut state = load_state(cfg_dir)?;
    let mut summary = ImportSummary::default();

    for (index, record) in records.iter().enumerate() {
        let doc = convert_record(index, record)?;

        let known_id = state.history.iter().any(|d| d.id == doc.id);
        let structured = DocumentNumber::parse(&doc.number).is_some();
        let duplicate =
            structured && validate_uniqueness(&doc.number, &state.refs(doc.kind), None).is_err();
        if known_id || duplicate {
            tracing::warn!(number = %doc.number, id = %doc.id, "skipping already imported record");
            summary.skipped += 1;
            continue;
        }

        summary.imported += 1;
        if structured {
            summary.structured += 1;
        }
        state.history.push(doc);
    }

    save_state(cfg_dir, &state)?;
    Ok(summary)
}

fn convert_record(index: usize, record: &Value) -> Result<StoredDocument> {
    let invalid = |reason: &str| DocumentError::InvalidLegacyRecord {
        index,
        reason: reason.to_string(),
    };
    if !record.is_object() {
        return Err(invalid("expected an object"));
    }

    let number = text(record, NUMBER_KEYS).unwrap_or_else(|| "Auto".to_string());
    let parsed = DocumentNumber::parse(&number);

    let stated = text(record, KIND_KEYS)
        .map(|raw| parse_kind(&raw).ok_or_else(|| invalid(&format!("unknown type '{raw}'"))))
        .transpose()?;
    // A structured number's prefix decides the kind; allocation and
    // uniqueness are scoped by it.
    let kind = match (parsed.as_ref().map(DocumentNumber::kind), stated) {
        (Some(from_number), Some(stated)) if from_number != stated => {
            tracing::warn!(
                %number,
                stated = ?stated,
                kind = ?from_number,
                "record type disagrees with its number, using the number's prefix"
            );
            from_number
        }
        (Some(from_number), _) => from_number,
        (None, Some(stated)) => stated,
        (None, None) => return Err(invalid("no type and no structured number")),
    };

    let date = text(record, DATE_KEYS)
        .and_then(|raw| parse_date(&raw))
        .ok_or_else(|| invalid("missing or unreadable date"))?;

    let total = TOTAL_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find_map(decimal)
        .unwrap_or(Decimal::ZERO);

    let party_record = PARTY_KEYS
        .iter()
        .filter_map(|key| record.get(*key))
        .find(|v| v.is_object())
        .unwrap_or(record);
    let address = resolve_address(party_record);
    let party = if address.company_name.is_empty() {
        "unknown".to_string()
    } else {
        address.company_name
    };

    Ok(StoredDocument {
        id: text(record, ID_KEYS).unwrap_or_else(|| uuid::Uuid::new_v4().to_string()),
        kind,
        number,
        party,
        ship_to: None,
        date,
        items: Vec::new(),
        tax_enabled: true,
        total,
        file: None,
    })
}

fn text(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .find(|s| !s.is_empty())
}

fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

fn parse_kind(raw: &str) -> Option<DocumentKind> {
    let normalized: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();
    match normalized.as_str() {
        "quotation" | "quote" | "qt" => Some(DocumentKind::Quotation),
        "proformainvoice" | "proforma" | "pi" => Some(DocumentKind::ProformaInvoice),
        "invoice" | "taxinvoice" | "inv" => Some(DocumentKind::Invoice),
        "purchaseorder" | "po" => Some(DocumentKind::PurchaseOrder),
        _ => None,
    }
}

/// `YYYY-MM-DD`, optionally followed by a time part (e.g. an ISO timestamp).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let day = raw.get(..10)?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
