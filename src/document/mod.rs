mod generator;
mod import;
mod search;

pub use generator::{
    build_line_items, generate_document, parse_item_input, regenerate_document,
    renumber_document, Document, DocumentContext, GenerateRequest, Generated,
};
pub use import::{import_legacy, ImportSummary};
pub use search::{search_history, HistoryFilter};
