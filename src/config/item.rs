use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Item {
    pub description: String,
    /// HSN code for goods or SAC code for services.
    #[serde(default)]
    pub hsn_sac: Option<String>,
    pub rate: Decimal,
    pub unit: String,
}
