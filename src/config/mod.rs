mod address;
mod item;
mod settings;
mod state;

pub use address::{resolve_address, Address};
pub use item::Item;
pub use settings::{Config, DocumentSettings, OutputSettings};
pub use state::{HistoryStore, State, StoredDocument};

use crate::error::{DocumentError, Result};
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the config directory path (XDG config dir, or ~/.gst-docs/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "gst-docs") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        DocumentError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".gst-docs"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Output directory from config; relative paths are taken from the config dir.
pub fn resolve_output_dir(output_dir: &str, cfg_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        cfg_dir.join(path)
    }
}

fn load_toml<T: DeserializeOwned>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        return Err(DocumentError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| DocumentError::ConfigParse { path, source: e })
}

fn warn_tax_ids(label: &str, address: &Address) {
    for problem in address.tax_id_problems() {
        tracing::warn!(party = label, "{problem}");
    }
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let config: Config = load_toml(config_dir.join("config.toml"))?;
    warn_tax_ids("company", &config.company);
    Ok(config)
}

/// Load parties.toml as a HashMap
pub fn load_parties(config_dir: &Path) -> Result<HashMap<String, Address>> {
    let parties: HashMap<String, Address> = load_toml(config_dir.join("parties.toml"))?;
    for (id, party) in &parties {
        warn_tax_ids(id, party);
    }
    Ok(parties)
}

/// Load items.toml as a HashMap
pub fn load_items(config_dir: &Path) -> Result<HashMap<String, Item>> {
    load_toml(config_dir.join("items.toml"))
}

/// Load state.toml (empty history if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    load_toml(path)
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| DocumentError::ConfigWrite {
        path: path.clone(),
        source: e,
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[company]
company_name = "Your Company Pvt. Ltd."
street = "12 Residency Road"
city = "Bengaluru"
state_code = "KA"
zip = "560025"
country_code = "IN"
# person_name = "Accounts Team"   # optional
# apartment = "Suite 400"         # optional
# pan = "ABCDE1234F"              # optional
# gstin = "29ABCDE1234F1Z5"       # optional, first two digits are the state code

[documents]
tax_enabled = true     # CGST 9% + SGST 9% within the state, IGST 18% across states
currency_symbol = "₹"
validity_days = 15     # quotations

[output]
output_dir = "output"  # relative paths are inside the config directory
"#;

/// Template content for parties.toml
pub const PARTIES_TEMPLATE: &str = r#"# Customers and vendors. The table name (e.g., [acme-bengaluru]) is used
# as the party identifier in the generate command.
#
# Example:
#   gst-docs generate --kind invoice --party acme-bengaluru --item consulting:8

[acme-bengaluru]
company_name = "Acme Traders"
person_name = "R. Iyer"          # optional
street = "44 Brigade Road"
city = "Bengaluru"
state_code = "KA"
zip = "560001"
gstin = "29AAACA1234B1Z5"        # optional

[globex-chennai]
company_name = "Globex Industries"
street = "7 Mount Road"
city = "Chennai"
state_code = "TN"
zip = "600002"
gstin = "33AABCG5678K1Z2"

[pune-warehouse]
company_name = "Your Company Warehouse"
street = "Plot 9, MIDC"
city = "Pune"
state_code = "MH"
zip = "411019"
"#;

/// Template content for items.toml
pub const ITEMS_TEMPLATE: &str = r#"# Catalog of line items. The table name (e.g., [consulting]) is used
# as the item identifier in the generate command.
#
# Example:
#   gst-docs generate --kind quotation --party globex-chennai --item consulting:8 --item support:3

[consulting]
description = "Technical Consulting"
hsn_sac = "998311"
rate = 1500.00
unit = "hour"

[support]
description = "Annual Support Plan"
hsn_sac = "998316"
rate = 2500.00
unit = "month"

[laptop]
description = "Business Laptop 14in"
hsn_sac = "8471"
rate = 55000.00
unit = "unit"
"#;
