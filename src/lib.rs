pub mod config;
pub mod document;
pub mod error;
pub mod numbering;
pub mod tax;

pub use config::{Address, Config, Item, State, StoredDocument};
pub use document::{generate_document, Document, DocumentContext, GenerateRequest};
pub use error::{DocumentError, Result};
pub use numbering::{DocumentKind, DocumentNumber, FinancialYear, Sequence};
pub use tax::{classify, compute_totals, LineItem, TaxClassification};
