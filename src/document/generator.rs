use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{
    load_config, load_items, load_parties, load_state, resolve_output_dir, save_state, Address,
    Config, HistoryStore, Item, State, StoredDocument,
};
use crate::error::{DocumentError, Result};
use crate::numbering::{allocate, validate_uniqueness, DocumentKind, DocumentNumber, Sequence};
use crate::tax::{
    amount_in_words, apply_classification, classify, compute_totals, DocumentTotals, LineItem,
    TaxClassification,
};

/// Everything collected for one document before it is assembled. Passed
/// explicitly; nothing is read from shared state.
#[derive(Debug, Clone)]
pub struct DocumentContext {
    pub kind: DocumentKind,
    pub date: NaiveDate,
    pub origin: Address,
    pub destination: Address,
    pub ship_to: Option<Address>,
    pub items: Vec<LineItem>,
    pub tax_enabled: bool,
}

/// Assembled document, serialised as the hand-off for rendering.
#[derive(Debug, Serialize)]
pub struct Document {
    pub id: String,
    pub title: &'static str,
    pub kind: DocumentKind,
    pub number: String,
    pub date: NaiveDate,
    pub valid_until: Option<NaiveDate>,
    pub from: Address,
    pub to: Address,
    pub ship_to: Option<Address>,
    pub items: Vec<LineItem>,
    pub classification: TaxClassification,
    pub totals: DocumentTotals,
    pub amount_in_words: String,
    pub currency_symbol: String,
}

impl Document {
    /// Classify the transaction, stamp the rates on every line and compute
    /// the totals.
    pub fn assemble(id: String, number: String, ctx: DocumentContext, config: &Config) -> Self {
        let classification = classify(&ctx.origin, &ctx.destination, ctx.tax_enabled);
        let mut items = ctx.items;
        apply_classification(&mut items, &classification);
        let totals = compute_totals(&items, &classification);

        let valid_until = match ctx.kind {
            DocumentKind::Quotation => ctx
                .date
                .checked_add_days(Days::new(u64::from(config.documents.validity_days))),
            _ => None,
        };

        Self {
            id,
            title: ctx.kind.title(),
            kind: ctx.kind,
            number,
            date: ctx.date,
            valid_until,
            from: ctx.origin,
            to: ctx.destination,
            ship_to: ctx.ship_to,
            amount_in_words: amount_in_words(totals.grand_total),
            items,
            classification,
            totals,
            currency_symbol: config.documents.currency_symbol.clone(),
        }
    }
}

/// Inputs of `gst-docs generate`.
#[derive(Debug)]
pub struct GenerateRequest<'a> {
    pub kind: DocumentKind,
    pub party: &'a str,
    pub ship_to: Option<&'a str>,
    pub items: &'a [String],
    /// User-edited sequence digits; replaces only the sequence part.
    pub sequence: Option<&'a str>,
    /// Overrides `documents.tax_enabled` from config.
    pub tax_enabled: Option<bool>,
    pub date: NaiveDate,
    pub output: Option<PathBuf>,
}

#[derive(Debug)]
pub struct Generated {
    pub document: Document,
    pub path: PathBuf,
    /// Non-fatal numbering problem, e.g. the history could not be read.
    pub warning: Option<DocumentError>,
}

/// Parse item input like "consulting:8" into (item_id, quantity)
pub fn parse_item_input(input: &str) -> Result<(&str, Decimal)> {
    let (item_id, qty_str) = input
        .split_once(':')
        .filter(|(_, qty)| !qty.contains(':'))
        .ok_or_else(|| DocumentError::InvalidItemFormat(input.to_string()))?;

    let quantity: Decimal = qty_str.parse().map_err(|_| DocumentError::InvalidQuantity {
        item: item_id.to_string(),
        qty: qty_str.to_string(),
        reason: "must be a number".to_string(),
    })?;

    if quantity <= Decimal::ZERO {
        return Err(DocumentError::InvalidQuantity {
            item: item_id.to_string(),
            qty: qty_str.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok((item_id, quantity))
}

/// Turn "item:qty" inputs into untaxed line items from the catalog.
pub fn build_line_items(
    inputs: &[String],
    catalog: &HashMap<String, Item>,
) -> Result<Vec<LineItem>> {
    if inputs.is_empty() {
        return Err(DocumentError::NoItems);
    }

    inputs
        .iter()
        .map(|input| {
            let (item_id, quantity) = parse_item_input(input)?;
            let item = catalog
                .get(item_id)
                .ok_or_else(|| DocumentError::ItemNotFound(item_id.to_string()))?;

            let mut line = LineItem::new(item.description.clone(), quantity, item.rate);
            line.hsn_sac = item.hsn_sac.clone();
            line.unit = item.unit.clone();
            Ok(line)
        })
        .collect()
}

fn lookup_party(parties: &HashMap<String, Address>, id: &str) -> Result<Address> {
    parties
        .get(id)
        .cloned()
        .ok_or_else(|| DocumentError::PartyNotFound(id.to_string()))
}

fn write_document(document: &Document, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, serde_json::to_string_pretty(document)?)?;
    Ok(())
}

fn default_path(config: &Config, cfg_dir: &Path, number: &str) -> PathBuf {
    resolve_output_dir(&config.output.output_dir, cfg_dir).join(format!("{number}.json"))
}

/// Generate a new document: allocate its number, classify and total it,
/// re-check the number against the store, then persist and write it out.
pub fn generate_document(cfg_dir: &Path, request: GenerateRequest<'_>) -> Result<Generated> {
    if request.items.is_empty() {
        return Err(DocumentError::NoItems);
    }

    let config = load_config(cfg_dir)?;
    let parties = load_parties(cfg_dir)?;
    let catalog = load_items(cfg_dir)?;

    let destination = lookup_party(&parties, request.party)?;
    let ship_to_id = request
        .ship_to
        .filter(|_| request.kind == DocumentKind::PurchaseOrder);
    if let (Some(id), None) = (request.ship_to, ship_to_id) {
        tracing::warn!(
            ship_to = id,
            kind = ?request.kind,
            "ship-to only applies to purchase orders, ignoring"
        );
    }
    let ship_to = ship_to_id
        .map(|id| lookup_party(&parties, id))
        .transpose()?;
    let items = build_line_items(request.items, &catalog)?;

    let allocation = allocate(request.kind, request.date, &HistoryStore::new(cfg_dir))?;
    let number = match request.sequence {
        Some(digits) => allocation.number.with_sequence(digits.parse::<Sequence>()?),
        None => allocation.number,
    }
    .to_string();

    let tax_enabled = request.tax_enabled.unwrap_or(config.documents.tax_enabled);
    let ctx = DocumentContext {
        kind: request.kind,
        date: request.date,
        origin: config.company.clone(),
        destination,
        ship_to,
        items,
        tax_enabled,
    };
    let document = Document::assemble(uuid::Uuid::new_v4().to_string(), number, ctx, &config);

    // Fresh read right before the write; the allocation snapshot may be stale.
    let mut state = load_state(cfg_dir)?;
    validate_uniqueness(&document.number, &state.refs(request.kind), None)?;

    let path = request
        .output
        .unwrap_or_else(|| default_path(&config, cfg_dir, &document.number));
    write_document(&document, &path)?;

    state.history.push(StoredDocument {
        id: document.id.clone(),
        kind: document.kind,
        number: document.number.clone(),
        party: request.party.to_string(),
        ship_to: ship_to_id.map(str::to_string),
        date: document.date,
        items: request.items.to_vec(),
        tax_enabled,
        total: document.totals.grand_total,
        file: Some(path.display().to_string()),
    });
    save_state(cfg_dir, &state)?;

    tracing::info!(number = %document.number, party = request.party, "generated document");

    Ok(Generated {
        document,
        path,
        warning: allocation.warning,
    })
}

/// Rebuild a stored document from its saved inputs and the current catalog.
fn rebuild(cfg_dir: &Path, config: &Config, entry: &StoredDocument) -> Result<Document> {
    if entry.items.is_empty() {
        return Err(DocumentError::NoStoredItems(entry.number.clone()));
    }
    let parties = load_parties(cfg_dir)?;
    let catalog = load_items(cfg_dir)?;

    let ship_to = entry
        .ship_to
        .as_deref()
        .map(|id| lookup_party(&parties, id))
        .transpose()?;

    let ctx = DocumentContext {
        kind: entry.kind,
        date: entry.date,
        origin: config.company.clone(),
        destination: lookup_party(&parties, &entry.party)?,
        ship_to,
        items: build_line_items(&entry.items, &catalog)?,
        tax_enabled: entry.tax_enabled,
    };
    Ok(Document::assemble(entry.id.clone(), entry.number.clone(), ctx, config))
}

fn find_entry(state: &State, number: &str) -> Result<usize> {
    state
        .history
        .iter()
        .position(|e| e.number == number)
        .ok_or_else(|| DocumentError::DocumentNotFound(number.to_string()))
}

/// Regenerate an existing document's output from stored data
pub fn regenerate_document(cfg_dir: &Path, number: &str) -> Result<(Document, PathBuf)> {
    let config = load_config(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let idx = find_entry(&state, number)?;

    let document = rebuild(cfg_dir, &config, &state.history[idx])?;
    let path = match &state.history[idx].file {
        Some(file) => PathBuf::from(file),
        None => default_path(&config, cfg_dir, number),
    };
    write_document(&document, &path)?;

    let entry = &mut state.history[idx];
    entry.total = document.totals.grand_total;
    entry.file = Some(path.display().to_string());
    save_state(cfg_dir, &state)?;

    Ok((document, path))
}

/// Change only the sequence part of a stored document's number.
///
/// The new number must be in range and unused by any other document of the
/// same kind. Returns the new number.
pub fn renumber_document(cfg_dir: &Path, number: &str, sequence: &str) -> Result<String> {
    let sequence: Sequence = sequence.parse()?;
    let config = load_config(cfg_dir)?;
    let mut state = load_state(cfg_dir)?;
    let idx = find_entry(&state, number)?;

    let current = DocumentNumber::parse(number)
        .ok_or_else(|| DocumentError::UnstructuredNumber(number.to_string()))?;
    let renumbered = current.with_sequence(sequence).to_string();

    let entry = &state.history[idx];
    validate_uniqueness(&renumbered, &state.refs(current.kind()), Some(&entry.id))?;

    let old_file = entry.file.clone();
    let mut updated = entry.clone();
    updated.number = renumbered.clone();

    if !updated.items.is_empty() {
        let document = rebuild(cfg_dir, &config, &updated)?;
        let path = default_path(&config, cfg_dir, &renumbered);
        write_document(&document, &path)?;
        if let Some(old) = old_file
            .map(PathBuf::from)
            .filter(|old| *old != path && old.exists())
        {
            fs::remove_file(old)?;
        }
        updated.total = document.totals.grand_total;
        updated.file = Some(path.display().to_string());
    }

    state.history[idx] = updated;
    save_state(cfg_dir, &state)?;

    tracing::info!(from = number, to = %renumbered, "renumbered document");
    Ok(renumbered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn catalog() -> HashMap<String, Item> {
        let mut catalog = HashMap::new();
        catalog.insert(
            "consulting".to_string(),
            Item {
                description: "Technical Consulting".to_string(),
                hsn_sac: Some("998311".to_string()),
                rate: dec!(1500),
                unit: "hour".to_string(),
            },
        );
        catalog
    }

    #[test]
    fn parses_item_inputs() {
        assert_eq!(
            parse_item_input("consulting:8").unwrap(),
            ("consulting", dec!(8))
        );
        assert_eq!(parse_item_input("consulting:1.5").unwrap().1, dec!(1.5));
        assert!(matches!(
            parse_item_input("consulting"),
            Err(DocumentError::InvalidItemFormat(_))
        ));
        assert!(matches!(
            parse_item_input("a:b:c"),
            Err(DocumentError::InvalidItemFormat(_))
        ));
        assert!(matches!(
            parse_item_input("consulting:abc"),
            Err(DocumentError::InvalidQuantity { .. })
        ));
        assert!(matches!(
            parse_item_input("consulting:-2"),
            Err(DocumentError::InvalidQuantity { .. })
        ));
    }

    #[test]
    fn builds_lines_from_catalog() {
        let lines = build_line_items(&["consulting:2".to_string()], &catalog()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].base_amount(), dec!(3000));
        assert_eq!(lines[0].hsn_sac.as_deref(), Some("998311"));

        assert!(matches!(
            build_line_items(&["unknown:1".to_string()], &catalog()),
            Err(DocumentError::ItemNotFound(id)) if id == "unknown"
        ));
        assert!(matches!(
            build_line_items(&[], &catalog()),
            Err(DocumentError::NoItems)
        ));
    }

    #[test]
    fn assembles_an_intra_state_quotation() {
        let config: Config = toml::from_str(crate::config::CONFIG_TEMPLATE).unwrap();
        let destination = Address {
            company_name: "Acme".into(),
            state_code: "KA".into(),
            ..Address::default()
        };
        let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let ctx = DocumentContext {
            kind: DocumentKind::Quotation,
            date,
            origin: config.company.clone(),
            destination,
            ship_to: None,
            items: vec![LineItem::new("Widget", dec!(2), dec!(100))],
            tax_enabled: true,
        };

        let doc = Document::assemble("id-1".into(), "QT25260001".into(), ctx, &config);
        assert_eq!(doc.classification, TaxClassification::intra_state());
        assert_eq!(doc.items[0].cgst_rate, dec!(9));
        assert_eq!(doc.totals.grand_total, dec!(236.00));
        assert_eq!(
            doc.amount_in_words,
            "Indian Rupees Two Hundred Thirty Six and Zero Paise Only"
        );
        assert_eq!(doc.valid_until, NaiveDate::from_ymd_opt(2026, 1, 30));
    }
}
