mod classify;
mod gstin;
mod totals;
mod words;

pub use classify::{classify, TaxClassification, CGST_RATE, IGST_RATE, SGST_RATE};
pub use gstin::{is_valid_gstin, is_valid_pan, state_code};
pub use totals::{
    apply_classification, compute_totals, round2, DocumentTotals, LineItem, LineTotals,
    TaxBreakdown,
};
pub use words::amount_in_words;
