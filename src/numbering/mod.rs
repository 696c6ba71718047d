mod financial_year;
mod number;
mod sequence;

pub use financial_year::FinancialYear;
pub use number::{DocumentKind, DocumentNumber, Sequence, MAX_SEQUENCE};
pub use sequence::{
    allocate, next_document_number, validate_uniqueness, Allocation, DocumentLister, DocumentRef,
};
