use serde::{Deserialize, Serialize};

use super::address::Address;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    /// The issuing company; origin address of every document.
    pub company: Address,
    #[serde(default)]
    pub documents: DocumentSettings,
    pub output: OutputSettings,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct DocumentSettings {
    /// Apply GST to new documents unless `--no-tax` is given.
    #[serde(default = "default_tax_enabled")]
    pub tax_enabled: bool,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// How long a quotation stays valid.
    #[serde(default = "default_validity_days")]
    pub validity_days: u32,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        Self {
            tax_enabled: default_tax_enabled(),
            currency_symbol: default_currency_symbol(),
            validity_days: default_validity_days(),
        }
    }
}

fn default_tax_enabled() -> bool {
    true
}

fn default_currency_symbol() -> String {
    "₹".to_string()
}

fn default_validity_days() -> u32 {
    15
}

#[derive(Debug, Deserialize, Serialize)]
pub struct OutputSettings {
    pub output_dir: String,
}
