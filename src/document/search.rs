use crate::config::{State, StoredDocument};
use crate::numbering::DocumentKind;

/// Filters for `gst-docs list`. Empty filter matches everything.
#[derive(Debug, Default)]
pub struct HistoryFilter {
    pub kind: Option<DocumentKind>,
    pub financial_year: Option<String>,
    /// Case-insensitive match on number or party.
    pub text: Option<String>,
}

impl HistoryFilter {
    pub fn matches(&self, doc: &StoredDocument) -> bool {
        if self.kind.is_some_and(|kind| kind != doc.effective_kind()) {
            return false;
        }
        if let Some(fy) = &self.financial_year {
            if doc.financial_year().as_deref() != Some(fy.as_str()) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            let needle = text.to_lowercase();
            let hit = doc.number.to_lowercase().contains(&needle)
                || doc.party.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }
        true
    }
}

/// Newest-first history with the 1-based index shown by `list`. The index is
/// stable under filtering so it can be passed to other commands.
pub fn search_history<'a>(
    state: &'a State,
    filter: &HistoryFilter,
) -> Vec<(usize, &'a StoredDocument)> {
    state
        .history
        .iter()
        .rev()
        .enumerate()
        .map(|(idx, doc)| (idx + 1, doc))
        .filter(|(_, doc)| filter.matches(doc))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn stored(kind: DocumentKind, number: &str, party: &str) -> StoredDocument {
        StoredDocument {
            id: number.to_string(),
            kind,
            number: number.to_string(),
            party: party.to_string(),
            ship_to: None,
            date: NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
            items: vec![],
            tax_enabled: true,
            total: Decimal::ZERO,
            file: None,
        }
    }

    fn state() -> State {
        State {
            history: vec![
                stored(DocumentKind::Quotation, "QT24250007", "acme-bengaluru"),
                stored(DocumentKind::Invoice, "INV25260001", "globex-chennai"),
                stored(DocumentKind::Invoice, "Auto", "Old Customer"),
                stored(DocumentKind::Quotation, "QT25260001", "globex-chennai"),
            ],
        }
    }

    #[test]
    fn newest_first_with_stable_indexes() {
        let state = state();
        let all = search_history(&state, &HistoryFilter::default());
        let numbers: Vec<_> = all.iter().map(|(i, d)| (*i, d.number.as_str())).collect();
        assert_eq!(
            numbers,
            vec![
                (1, "QT25260001"),
                (2, "Auto"),
                (3, "INV25260001"),
                (4, "QT24250007")
            ]
        );
    }

    #[test]
    fn filters_by_kind_and_year() {
        let state = state();
        let filter = HistoryFilter {
            kind: Some(DocumentKind::Quotation),
            financial_year: Some("2425".to_string()),
            text: None,
        };
        let hits = search_history(&state, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 4);
    }

    #[test]
    fn legacy_numbers_have_no_year() {
        let state = state();
        let filter = HistoryFilter {
            financial_year: Some("2526".to_string()),
            ..HistoryFilter::default()
        };
        let hits = search_history(&state, &filter);
        assert!(hits.iter().all(|(_, d)| d.number != "Auto"));
        assert_eq!(hits.len(), 2);
    }

    #[test]
    fn text_search_is_case_insensitive() {
        let state = state();
        let filter = HistoryFilter {
            text: Some("GLOBEX".to_string()),
            ..HistoryFilter::default()
        };
        assert_eq!(search_history(&state, &filter).len(), 2);
    }
}
