use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use super::classify::TaxClassification;

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Round to two decimal places, halves away from zero.
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// A single line on a document. Tax rates are percentages stamped by
/// [`apply_classification`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineItem {
    pub description: String,
    pub hsn_sac: Option<String>,
    pub unit: String,
    pub quantity: Decimal,
    pub rate: Decimal,
    pub cgst_rate: Decimal,
    pub sgst_rate: Decimal,
    pub igst_rate: Decimal,
}

impl LineItem {
    pub fn new(description: impl Into<String>, quantity: Decimal, rate: Decimal) -> Self {
        Self {
            description: description.into(),
            hsn_sac: None,
            unit: String::new(),
            quantity,
            rate,
            cgst_rate: Decimal::ZERO,
            sgst_rate: Decimal::ZERO,
            igst_rate: Decimal::ZERO,
        }
    }

    /// `quantity × rate`, unrounded.
    pub fn base_amount(&self) -> Decimal {
        self.quantity * self.rate
    }

    /// CGST + SGST on intra-state lines, IGST on inter-state lines.
    pub fn tax_rate(&self) -> Decimal {
        self.cgst_rate + self.sgst_rate + self.igst_rate
    }

    pub fn totals(&self) -> LineTotals {
        let base_amount = self.base_amount();
        let tax_amount = round2(base_amount * self.tax_rate() / HUNDRED);
        LineTotals {
            base_amount,
            tax_amount,
            total_amount: round2(base_amount + tax_amount),
        }
    }
}

/// Stamp the classification's rates on every line.
pub fn apply_classification(items: &mut [LineItem], classification: &TaxClassification) {
    let (cgst, sgst, igst) = match *classification {
        TaxClassification::NoTax => (Decimal::ZERO, Decimal::ZERO, Decimal::ZERO),
        TaxClassification::IntraState {
            cgst_rate,
            sgst_rate,
        } => (cgst_rate, sgst_rate, Decimal::ZERO),
        TaxClassification::InterState { igst_rate } => (Decimal::ZERO, Decimal::ZERO, igst_rate),
    };
    for item in items.iter_mut() {
        item.cgst_rate = cgst;
        item.sgst_rate = sgst;
        item.igst_rate = igst;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineTotals {
    pub base_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
}

/// Tax amounts split the way they are printed on the document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxBreakdown {
    NoTax,
    IntraState {
        cgst_amount: Decimal,
        sgst_amount: Decimal,
    },
    InterState {
        igst_amount: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentTotals {
    pub lines: Vec<LineTotals>,
    pub subtotal: Decimal,
    pub total_tax: Decimal,
    pub breakdown: TaxBreakdown,
    pub grand_total: Decimal,
}

/// Aggregate totals.
///
/// Each line's tax is rounded on its own and the rounded taxes are summed, so
/// `grand_total = subtotal + Σ line tax`. This may differ from `Σ line total`
/// by a paisa or two on long documents.
pub fn compute_totals(items: &[LineItem], classification: &TaxClassification) -> DocumentTotals {
    let lines: Vec<LineTotals> = items.iter().map(LineItem::totals).collect();
    let subtotal: Decimal = lines.iter().map(|l| l.base_amount).sum();
    let total_tax: Decimal = lines.iter().map(|l| l.tax_amount).sum();

    DocumentTotals {
        breakdown: breakdown(total_tax, classification),
        grand_total: subtotal + total_tax,
        lines,
        subtotal,
        total_tax,
    }
}

fn breakdown(total_tax: Decimal, classification: &TaxClassification) -> TaxBreakdown {
    match *classification {
        TaxClassification::NoTax => TaxBreakdown::NoTax,
        TaxClassification::IntraState {
            cgst_rate,
            sgst_rate,
        } => {
            let combined = cgst_rate + sgst_rate;
            let cgst_amount = if combined.is_zero() {
                Decimal::ZERO
            } else {
                round2(total_tax * cgst_rate / combined)
            };
            TaxBreakdown::IntraState {
                cgst_amount,
                sgst_amount: total_tax - cgst_amount,
            }
        }
        TaxClassification::InterState { .. } => TaxBreakdown::InterState {
            igst_amount: total_tax,
        },
    }
}
