use clap::ValueEnum;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::financial_year::FinancialYear;
use crate::error::{DocumentError, Result};

/// Highest sequence a 4-digit number can carry.
pub const MAX_SEQUENCE: u16 = 9999;

static FY_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(QT|PI|INV)([0-9]{4})([0-9]{4})$")
        .expect("document number pattern")
});

static PO_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^VIS_PO_([0-9]{4})$")
        .expect("purchase order pattern")
});

/// The four document types the tool issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DocumentKind {
    #[value(alias = "qt")]
    Quotation,
    #[value(aliases = ["pi", "proforma"])]
    ProformaInvoice,
    #[value(alias = "inv")]
    Invoice,
    #[value(alias = "po")]
    PurchaseOrder,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::Quotation,
        DocumentKind::ProformaInvoice,
        DocumentKind::Invoice,
        DocumentKind::PurchaseOrder,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "QT",
            DocumentKind::ProformaInvoice => "PI",
            DocumentKind::Invoice => "INV",
            DocumentKind::PurchaseOrder => "VIS_PO_",
        }
    }

    /// Purchase orders are numbered without a financial-year component.
    pub fn uses_financial_year(self) -> bool {
        !matches!(self, DocumentKind::PurchaseOrder)
    }

    pub fn title(self) -> &'static str {
        match self {
            DocumentKind::Quotation => "Quotation",
            DocumentKind::ProformaInvoice => "Proforma Invoice",
            DocumentKind::Invoice => "Tax Invoice",
            DocumentKind::PurchaseOrder => "Purchase Order",
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.prefix() == prefix)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// A sequence number validated to lie in `1..=9999`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Sequence(u16);

impl Sequence {
    pub const FIRST: Sequence = Sequence(1);

    pub fn new(value: u32) -> Result<Self> {
        if (1..=u32::from(MAX_SEQUENCE)).contains(&value) {
            Ok(Self(value as u16))
        } else {
            Err(DocumentError::InvalidSequence(value.to_string()))
        }
    }

    pub fn get(self) -> u16 {
        self.0
    }
}

impl FromStr for Sequence {
    type Err = DocumentError;

    /// Accepts a numeral string such as `"42"` or `"0042"`.
    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim();
        let invalid = || DocumentError::InvalidSequence(s.to_string());
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let value: u32 = digits.parse().map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}", self.0)
    }
}

/// A structured document number: `<PREFIX><FY><SEQ>`, or `VIS_PO_<SEQ>` for
/// purchase orders.
///
/// `parse` followed by `to_string` is the identity on every well-formed
/// number, and `new` followed by `parse` gives back the same parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentNumber {
    kind: DocumentKind,
    financial_year: Option<FinancialYear>,
    sequence: u16,
}

impl DocumentNumber {
    /// Build a number. The financial year is dropped for purchase orders.
    pub fn new(kind: DocumentKind, financial_year: &FinancialYear, sequence: Sequence) -> Self {
        Self {
            kind,
            financial_year: kind.uses_financial_year().then(|| financial_year.clone()),
            sequence: sequence.get(),
        }
    }

    /// Parse a stored number. Legacy values such as `"Auto"` or free text
    /// give `None`, meaning "no structured number".
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(caps) = FY_NUMBER.captures(s) {
            let kind = DocumentKind::from_prefix(&caps[1])?;
            let financial_year = caps[2].parse().ok()?;
            let sequence = caps[3].parse().ok()?;
            return Some(Self {
                kind,
                financial_year: Some(financial_year),
                sequence,
            });
        }
        let caps = PO_NUMBER.captures(s)?;
        Some(Self {
            kind: DocumentKind::PurchaseOrder,
            financial_year: None,
            sequence: caps[1].parse().ok()?,
        })
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    pub fn financial_year(&self) -> Option<&FinancialYear> {
        self.financial_year.as_ref()
    }

    /// Raw sequence. A stored `0000` parses to 0.
    pub fn sequence(&self) -> u16 {
        self.sequence
    }

    /// Same prefix and financial year, different sequence. This is the only
    /// part of a number a user may edit.
    pub fn with_sequence(&self, sequence: Sequence) -> Self {
        Self {
            sequence: sequence.get(),
            ..self.clone()
        }
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.prefix())?;
        if let Some(fy) = &self.financial_year {
            f.write_str(fy.as_str())?;
        }
        write!(f, "{:04}", self.sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fy(tag: &str) -> FinancialYear {
        tag.parse().unwrap()
    }

    #[test]
    fn builds_zero_padded_numbers() {
        let n = DocumentNumber::new(
            DocumentKind::Quotation,
            &fy("2526"),
            Sequence::new(7).unwrap(),
        );
        assert_eq!(n.to_string(), "QT25260007");

        let seq: Sequence = "42".parse().unwrap();
        let n = DocumentNumber::new(DocumentKind::Invoice, &fy("2526"), seq);
        assert_eq!(n.to_string(), "INV25260042");
    }

    #[test]
    fn purchase_orders_skip_financial_year() {
        let n = DocumentNumber::new(
            DocumentKind::PurchaseOrder,
            &fy("2526"),
            Sequence::new(12).unwrap(),
        );
        assert_eq!(n.to_string(), "VIS_PO_0012");
        assert_eq!(n.financial_year(), None);

        let parsed = DocumentNumber::parse("VIS_PO_0012").unwrap();
        assert_eq!(parsed, n);
    }

    #[test]
    fn round_trip_over_prefixes_and_sequence_edges() {
        let kinds = [
            DocumentKind::Quotation,
            DocumentKind::ProformaInvoice,
            DocumentKind::Invoice,
        ];
        for kind in kinds {
            for tag in ["2425", "2526", "9900"] {
                for seq in [1, 9, 10, 999, 1000, 9999] {
                    let built = DocumentNumber::new(kind, &fy(tag), Sequence::new(seq).unwrap());
                    let parsed = DocumentNumber::parse(&built.to_string()).unwrap();
                    assert_eq!(parsed.kind(), kind);
                    assert_eq!(parsed.financial_year().map(|f| f.as_str()), Some(tag));
                    assert_eq!(u32::from(parsed.sequence()), seq);
                    assert_eq!(parsed.to_string(), built.to_string());
                }
            }
        }
    }

    #[test]
    fn malformed_numbers_are_not_structured() {
        for s in [
            "Auto",
            "",
            "QT2526001",
            "QT252600011",
            "qt25260001",
            "XX25260001",
            "INV-2526-0001",
            " QT25260001",
            "QT2526٠٠٠١",
            "VIS_PO_25260001",
        ] {
            assert!(DocumentNumber::parse(s).is_none(), "{s} should not parse");
        }
    }

    #[test]
    fn sequence_range_is_enforced() {
        assert!(Sequence::new(0).is_err());
        assert!(Sequence::new(10000).is_err());
        assert_eq!(Sequence::new(9999).unwrap().get(), 9999);

        assert_eq!("0001".parse::<Sequence>().unwrap().get(), 1);
        for bad in ["0", "0000", "10000", "", "abc", "-1", "12a"] {
            assert!(
                matches!(bad.parse::<Sequence>(), Err(DocumentError::InvalidSequence(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn with_sequence_keeps_prefix_and_year() {
        let n = DocumentNumber::parse("PI25260003").unwrap();
        let edited = n.with_sequence("0042".parse().unwrap());
        assert_eq!(edited.to_string(), "PI25260042");
    }
}
