use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Config directory not found at {0}. Run 'gst-docs init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {source}")]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: toml::ser::Error,
    },

    #[error("Party '{0}' not found in parties.toml")]
    PartyNotFound(String),

    #[error("Item '{0}' not found in items.toml")]
    ItemNotFound(String),

    #[error("Invalid quantity '{qty}' for item '{item}': {reason}")]
    InvalidQuantity {
        item: String,
        qty: String,
        reason: String,
    },

    #[error("Invalid item format '{0}'. Expected 'item:quantity' (e.g., 'consulting:8')")]
    InvalidItemFormat(String),

    #[error("No items specified. Use --item <name>:<quantity> to add line items.")]
    NoItems,

    #[error("Invalid sequence '{0}': must be a number between 1 and 9999")]
    InvalidSequence(String),

    #[error("Document number {0} already exists")]
    DuplicateNumber(String),

    #[error("No sequence numbers left for {prefix}{financial_year} (9999 already issued)")]
    SequenceExhausted {
        prefix: String,
        financial_year: String,
    },

    #[error("Document '{0}' has no structured number and cannot be renumbered")]
    UnstructuredNumber(String),

    #[error("Could not list existing documents: {0}")]
    Lookup(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid amount '{0}'")]
    InvalidAmount(String),

    #[error("Document '{0}' not found in history")]
    DocumentNotFound(String),

    #[error("Invalid document index '{0}'. Use 'gst-docs list' to see available documents.")]
    InvalidDocumentIndex(String),

    #[error("Document '{0}' has no stored items (imported from a legacy record)")]
    NoStoredItems(String),

    #[error("Invalid legacy record at position {index}: {reason}")]
    InvalidLegacyRecord { index: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),
}

pub type Result<T> = std::result::Result<T, DocumentError>;
