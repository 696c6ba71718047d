use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::financial_year::FinancialYear;
use super::number::{DocumentKind, DocumentNumber, Sequence, MAX_SEQUENCE};
use crate::error::{DocumentError, Result};

/// What the document store reports for each existing document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub id: String,
    pub number: String,
    pub created_at: NaiveDate,
}

/// Answers "list all documents of kind X". Implementations must return an
/// empty list, not an error, when nothing has been issued yet.
pub trait DocumentLister {
    fn list_documents(&self, kind: DocumentKind) -> Result<Vec<DocumentRef>>;
}

/// Outcome of [`allocate`].
#[derive(Debug)]
pub struct Allocation {
    pub number: DocumentNumber,
    /// Set when the listing failed and the number fell back to sequence 1.
    pub warning: Option<DocumentError>,
}

/// Next number for `kind` in `financial_year`: one past the highest sequence
/// already issued in that year, or 1.
///
/// Documents whose number does not parse, belongs to another kind, or to a
/// different financial year are ignored. Gaps are never filled.
pub fn next_document_number(
    kind: DocumentKind,
    financial_year: &FinancialYear,
    existing: &[DocumentRef],
) -> Result<DocumentNumber> {
    let max = existing
        .iter()
        .filter_map(|doc| DocumentNumber::parse(&doc.number))
        .filter(|n| n.kind() == kind)
        .filter(|n| !kind.uses_financial_year() || n.financial_year() == Some(financial_year))
        .map(|n| n.sequence())
        .max()
        .unwrap_or(0);

    if max >= MAX_SEQUENCE {
        let financial_year = if kind.uses_financial_year() {
            financial_year.to_string()
        } else {
            String::new()
        };
        return Err(DocumentError::SequenceExhausted {
            prefix: kind.prefix().to_string(),
            financial_year,
        });
    }

    let sequence = Sequence::new(u32::from(max) + 1)?;
    Ok(DocumentNumber::new(kind, financial_year, sequence))
}

/// Allocate the next number for `kind` as of `today`.
///
/// A failing lister never blocks document creation: the number falls back to
/// sequence 1 and the failure is returned as a warning. Exhaustion of the
/// 4-digit range is still an error.
pub fn allocate(
    kind: DocumentKind,
    today: NaiveDate,
    lister: &dyn DocumentLister,
) -> Result<Allocation> {
    let fy = FinancialYear::for_date(today);

    match lister.list_documents(kind) {
        Ok(existing) => {
            let number = next_document_number(kind, &fy, &existing)?;
            tracing::debug!(
                kind = ?kind,
                financial_year = %fy,
                existing = existing.len(),
                %number,
                "allocated document number"
            );
            Ok(Allocation {
                number,
                warning: None,
            })
        }
        Err(e) => {
            tracing::warn!(
                kind = ?kind,
                error = %e,
                "document lookup failed, starting at sequence 1"
            );
            Ok(Allocation {
                number: DocumentNumber::new(kind, &fy, Sequence::FIRST),
                warning: Some(DocumentError::Lookup(e.to_string())),
            })
        }
    }
}

/// Fails with [`DocumentError::DuplicateNumber`] if any document other than
/// `exclude_id` already carries exactly `candidate`.
///
/// Must be called against a fresh listing right before every write.
pub fn validate_uniqueness(
    candidate: &str,
    existing: &[DocumentRef],
    exclude_id: Option<&str>,
) -> Result<()> {
    let conflict = existing
        .iter()
        .filter(|doc| exclude_id != Some(doc.id.as_str()))
        .any(|doc| doc.number == candidate);

    if conflict {
        return Err(DocumentError::DuplicateNumber(candidate.to_string()));
    }
    Ok(())
}
