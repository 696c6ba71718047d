use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::{Path, PathBuf};
use tabled::{settings::Style, Table, Tabled};
use tracing_subscriber::EnvFilter;

use gst_docs::config::{
    config_dir, load_config, load_items, load_parties, load_state, HistoryStore, CONFIG_TEMPLATE,
    ITEMS_TEMPLATE, PARTIES_TEMPLATE,
};
use gst_docs::document::{
    generate_document, import_legacy, regenerate_document, renumber_document, search_history,
    GenerateRequest, HistoryFilter,
};
use gst_docs::error::{DocumentError, Result};
use gst_docs::numbering::{allocate, DocumentKind, FinancialYear};
use gst_docs::tax::{amount_in_words, round2, TaxBreakdown};
use gst_docs::Document;

#[derive(Parser)]
#[command(name = "gst-docs")]
#[command(version, about = "GST quotations, invoices and purchase orders", long_about = None)]
struct Cli {
    /// Path to config directory (default: XDG config dir or ~/.gst-docs)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with template files
    Init,

    /// Generate a new document
    Generate {
        /// Document type
        #[arg(short, long, value_enum)]
        kind: DocumentKind,

        /// Party identifier from parties.toml (bill to / vendor)
        #[arg(short, long)]
        party: String,

        /// Line items in format "item:quantity" (can be repeated)
        #[arg(short, long, value_name = "ITEM:QTY")]
        item: Vec<String>,

        /// Ship-to party for purchase orders
        #[arg(long)]
        ship_to: Option<String>,

        /// Use this sequence instead of the next free one (1-9999)
        #[arg(long)]
        sequence: Option<String>,

        /// Issue without GST regardless of config
        #[arg(long)]
        no_tax: bool,

        /// Document date (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,

        /// Custom output file path (default: output_dir/<NUMBER>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the next number for a document type
    Next {
        #[arg(value_enum)]
        kind: DocumentKind,

        /// Date to number as of (YYYY-MM-DD, default: today)
        #[arg(long)]
        date: Option<String>,
    },

    /// List configured parties
    Parties,

    /// List available line items
    Items,

    /// Show configuration summary and next numbers
    Status,

    /// Search generated and imported documents
    List {
        /// Only this document type
        #[arg(short, long, value_enum)]
        kind: Option<DocumentKind>,

        /// Only this financial year (e.g., 2526)
        #[arg(long)]
        fy: Option<String>,

        /// Match number or party (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Number of documents to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Change the sequence part of an existing document number
    Renumber {
        /// Document number or index from 'list' (e.g., 1 or INV25260001)
        document: String,

        /// New sequence (1-9999)
        sequence: String,
    },

    /// Rewrite a document's output from stored data
    Regenerate {
        /// Document number or index from 'list' (e.g., 1 or INV25260001)
        document: String,
    },

    /// Import documents exported from an older system (JSON array)
    Import {
        file: PathBuf,
    },

    /// Spell an amount in words (Indian numbering)
    Words {
        amount: String,
    },
}

fn main() {
    init_logging();
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GST_DOCS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Generate {
            kind,
            party,
            item,
            ship_to,
            sequence,
            no_tax,
            date,
            output,
        } => cmd_generate(
            &cfg_dir,
            GenerateRequest {
                kind,
                party: &party,
                ship_to: ship_to.as_deref(),
                items: &item,
                sequence: sequence.as_deref(),
                tax_enabled: no_tax.then_some(false),
                date: parse_date(date.as_deref())?,
                output,
            },
        ),
        Commands::Next { kind, date } => cmd_next(&cfg_dir, kind, parse_date(date.as_deref())?),
        Commands::Parties => cmd_parties(&cfg_dir),
        Commands::Items => cmd_items(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::List {
            kind,
            fy,
            search,
            limit,
        } => cmd_list(
            &cfg_dir,
            HistoryFilter {
                kind,
                financial_year: fy,
                text: search,
            },
            limit,
        ),
        Commands::Renumber { document, sequence } => cmd_renumber(&cfg_dir, &document, &sequence),
        Commands::Regenerate { document } => cmd_regenerate(&cfg_dir, &document),
        Commands::Import { file } => cmd_import(&cfg_dir, &file),
        Commands::Words { amount } => cmd_words(&amount),
    }
}

fn parse_date(value: Option<&str>) -> Result<NaiveDate> {
    match value {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|_| DocumentError::InvalidDate(s.to_string())),
        None => Ok(Local::now().date_naive()),
    }
}

fn ensure_config(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(DocumentError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    Ok(())
}

/// Initialize config directory with template files
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(DocumentError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir.join("output"))?;

    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;
    fs::write(cfg_dir.join("parties.toml"), PARTIES_TEMPLATE)?;
    fs::write(cfg_dir.join("items.toml"), ITEMS_TEMPLATE)?;

    println!("Initialized gst-docs config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Edit your company details:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!(
        "  2. Add customers and vendors:  $EDITOR {}/parties.toml",
        cfg_dir.display()
    );
    println!(
        "  3. Configure line items:       $EDITOR {}/items.toml",
        cfg_dir.display()
    );
    println!();
    println!("Then generate your first document:");
    println!("  gst-docs generate --kind invoice --party <party-id> --item <item>:<quantity>");

    Ok(())
}

// Table row structs for tabled
#[derive(Tabled)]
struct PartyRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "GSTIN")]
    gstin: String,
}

#[derive(Tabled)]
struct ItemRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "DESCRIPTION")]
    description: String,
    #[tabled(rename = "HSN/SAC")]
    hsn_sac: String,
    #[tabled(rename = "RATE")]
    rate: String,
    #[tabled(rename = "UNIT")]
    unit: String,
}

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "NUMBER")]
    number: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TOTAL")]
    total: String,
    #[tabled(rename = "PARTY")]
    party: String,
}

/// Format a money amount with two decimals and Indian digit grouping
/// (e.g., ₹12,34,567.89)
fn format_amount(value: Decimal, currency_symbol: &str) -> String {
    let rounded = round2(value);
    let text = format!("{:.2}", rounded.abs());
    let (whole, frac) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    let sign = if rounded < Decimal::ZERO { "-" } else { "" };
    format!("{sign}{currency_symbol}{}.{frac}", group_indian(whole))
}

fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (h, t) = rest.split_at(rest.len() - 2);
        groups.push(t);
        rest = h;
    }
    groups.push(rest);
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// List configured parties
fn cmd_parties(cfg_dir: &Path) -> Result<()> {
    ensure_config(cfg_dir)?;

    let parties = load_parties(cfg_dir)?;

    if parties.is_empty() {
        println!("No parties configured.");
        println!("Add parties to: {}/parties.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = parties.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<PartyRow> = sorted
        .iter()
        .map(|(id, party)| PartyRow {
            id: id.to_string(),
            name: party.company_name.clone(),
            state: party.state_code.clone(),
            gstin: party.gstin.clone().unwrap_or_default(),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// List available line items
fn cmd_items(cfg_dir: &Path) -> Result<()> {
    ensure_config(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let items = load_items(cfg_dir)?;

    if items.is_empty() {
        println!("No items configured.");
        println!("Add items to: {}/items.toml", cfg_dir.display());
        return Ok(());
    }

    let mut sorted: Vec<_> = items.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);

    let rows: Vec<ItemRow> = sorted
        .iter()
        .map(|(id, item)| ItemRow {
            id: id.to_string(),
            description: item.description.clone(),
            hsn_sac: item.hsn_sac.clone().unwrap_or_default(),
            rate: format_amount(item.rate, &config.documents.currency_symbol),
            unit: format!("/{}", item.unit),
        })
        .collect();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");

    Ok(())
}

/// Show configuration summary and next numbers
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    ensure_config(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let parties = load_parties(cfg_dir)?;
    let items = load_items(cfg_dir)?;
    let state = load_state(cfg_dir)?;

    let today = Local::now().date_naive();
    let store = HistoryStore::new(cfg_dir);

    println!("Document Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.summary());
    if let Some(gstin) = &config.company.gstin {
        println!("GSTIN:            {gstin}");
    }
    println!("Financial year:   {}", FinancialYear::for_date(today));
    println!(
        "GST:              {}",
        if config.documents.tax_enabled {
            "enabled"
        } else {
            "disabled"
        }
    );
    println!("Parties:          {}", parties.len());
    println!("Items:            {}", items.len());
    println!("Documents:        {}", state.history.len());
    println!();
    println!("Next numbers:");
    for kind in DocumentKind::ALL {
        let allocation = allocate(kind, today, &store)?;
        println!("  {:<18} {}", kind.title(), allocation.number);
    }

    Ok(())
}

/// Show the next number for a document type
fn cmd_next(cfg_dir: &Path, kind: DocumentKind, date: NaiveDate) -> Result<()> {
    ensure_config(cfg_dir)?;

    let allocation = allocate(kind, date, &HistoryStore::new(cfg_dir))?;
    if let Some(warning) = &allocation.warning {
        eprintln!("Warning: {warning}; numbering falls back to 0001");
    }
    println!("Next {}: {}", kind.title(), allocation.number);

    Ok(())
}

fn print_document(document: &Document) {
    let symbol = document.currency_symbol.as_str();
    println!("  Party:    {}", document.to.summary());
    println!("  Tax:      {}", document.classification.label());
    println!(
        "  Subtotal: {}",
        format_amount(document.totals.subtotal, symbol)
    );
    match document.totals.breakdown {
        TaxBreakdown::NoTax => {}
        TaxBreakdown::IntraState {
            cgst_amount,
            sgst_amount,
        } => {
            println!("  CGST:     {}", format_amount(cgst_amount, symbol));
            println!("  SGST:     {}", format_amount(sgst_amount, symbol));
        }
        TaxBreakdown::InterState { igst_amount } => {
            println!("  IGST:     {}", format_amount(igst_amount, symbol));
        }
    }
    println!(
        "  Total:    {}",
        format_amount(document.totals.grand_total, symbol)
    );
    println!("  In words: {}", document.amount_in_words);
}

/// Stderr line for a failed history lookup. A user-given sequence was used
/// as is, so there is no fallback to mention.
fn lookup_warning(warning: &DocumentError, explicit_sequence: bool) -> String {
    if explicit_sequence {
        format!("Warning: {warning}")
    } else {
        format!("Warning: {warning}; numbering fell back to 0001")
    }
}

/// Generate a new document
fn cmd_generate(cfg_dir: &Path, request: GenerateRequest<'_>) -> Result<()> {
    ensure_config(cfg_dir)?;

    let explicit_sequence = request.sequence.is_some();
    let generated = generate_document(cfg_dir, request)?;
    if let Some(warning) = &generated.warning {
        eprintln!("{}", lookup_warning(warning, explicit_sequence));
    }

    let document = &generated.document;
    println!("Generated {} ({})", document.number, document.title);
    print_document(document);
    println!("  Saved:    {}", generated.path.display());

    Ok(())
}

/// Resolve a document reference to the actual document number.
/// Accepts either an index (1-based) from 'list' or the full document number.
fn resolve_document_number(cfg_dir: &Path, reference: &str) -> Result<String> {
    let state = load_state(cfg_dir)?;

    if let Ok(idx) = reference.parse::<usize>() {
        if idx == 0 {
            return Err(DocumentError::InvalidDocumentIndex(reference.to_string()));
        }
        // Documents are displayed in reverse order (newest first), 1-indexed
        return state
            .history
            .iter()
            .rev()
            .nth(idx - 1)
            .map(|doc| doc.number.clone())
            .ok_or_else(|| DocumentError::InvalidDocumentIndex(reference.to_string()));
    }

    if state.history.iter().any(|e| e.number == reference) {
        Ok(reference.to_string())
    } else {
        Err(DocumentError::DocumentNotFound(reference.to_string()))
    }
}

/// Search generated and imported documents
fn cmd_list(cfg_dir: &Path, filter: HistoryFilter, limit: Option<usize>) -> Result<()> {
    ensure_config(cfg_dir)?;

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let symbol = &config.documents.currency_symbol;

    let mut hits = search_history(&state, &filter);
    if let Some(n) = limit {
        hits.truncate(n);
    }

    if hits.is_empty() {
        println!("No documents found.");
        return Ok(());
    }

    let rows: Vec<DocumentRow> = hits
        .iter()
        .map(|(idx, doc)| DocumentRow {
            index: *idx,
            number: doc.number.clone(),
            kind: doc.kind.title().to_string(),
            date: doc.date.to_string(),
            total: format_amount(doc.total, symbol),
            party: doc.party.clone(),
        })
        .collect();

    let shown_total: Decimal = hits.iter().map(|(_, doc)| doc.total).sum();

    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
    println!();
    println!(
        "Shown: {} of {} documents, total {}",
        hits.len(),
        state.history.len(),
        format_amount(shown_total, symbol)
    );

    Ok(())
}

/// Change the sequence part of an existing document number
fn cmd_renumber(cfg_dir: &Path, reference: &str, sequence: &str) -> Result<()> {
    ensure_config(cfg_dir)?;

    let number = resolve_document_number(cfg_dir, reference)?;
    let renumbered = renumber_document(cfg_dir, &number, sequence)?;

    println!("Renumbered {number} -> {renumbered}");
    Ok(())
}

/// Rewrite a document's output from stored data
fn cmd_regenerate(cfg_dir: &Path, reference: &str) -> Result<()> {
    ensure_config(cfg_dir)?;

    let number = resolve_document_number(cfg_dir, reference)?;
    let (document, path) = regenerate_document(cfg_dir, &number)?;

    println!("Regenerated {}", document.number);
    print_document(&document);
    println!("  Saved:    {}", path.display());

    Ok(())
}

/// Import documents exported from an older system
fn cmd_import(cfg_dir: &Path, file: &Path) -> Result<()> {
    ensure_config(cfg_dir)?;

    let summary = import_legacy(cfg_dir, file)?;
    println!(
        "Imported {} documents ({} with structured numbers, {} skipped)",
        summary.imported, summary.structured, summary.skipped
    );
    Ok(())
}

/// Spell an amount in words
fn cmd_words(amount: &str) -> Result<()> {
    let value: Decimal = amount
        .trim()
        .parse()
        .map_err(|_| DocumentError::InvalidAmount(amount.to_string()))?;
    if value < Decimal::ZERO {
        return Err(DocumentError::InvalidAmount(amount.to_string()));
    }
    println!("{}", amount_in_words(value));
    Ok(())
}
