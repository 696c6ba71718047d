use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tax::{is_valid_gstin, is_valid_pan};

/// A postal and tax address. Used for the issuing company ("from"), the
/// counterparty ("to" / "bill to") and the purchase-order "ship to".
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Address {
    pub company_name: String,
    #[serde(default)]
    pub person_name: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub apartment: Option<String>,
    #[serde(default)]
    pub city: String,
    /// Two-letter state code, e.g. "KA". May be empty on legacy records.
    #[serde(default)]
    pub state_code: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default = "default_country")]
    pub country_code: String,
    #[serde(default)]
    pub pan: Option<String>,
    #[serde(default)]
    pub gstin: Option<String>,
}

fn default_country() -> String {
    "IN".to_string()
}

impl Address {
    /// Describe malformed PAN/GSTIN values. Empty when both are absent or valid.
    pub fn tax_id_problems(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if let Some(gstin) = self.gstin.as_deref().filter(|g| !g.is_empty()) {
            if !is_valid_gstin(gstin) {
                problems.push(format!("GSTIN '{gstin}' is not a valid 15-character GSTIN"));
            }
        }
        if let Some(pan) = self.pan.as_deref().filter(|p| !p.is_empty()) {
            if !is_valid_pan(pan) {
                problems.push(format!("PAN '{pan}' is not a valid 10-character PAN"));
            }
        }
        problems
    }

    /// One-line summary for tables and console output.
    pub fn summary(&self) -> String {
        let mut parts = vec![self.company_name.as_str()];
        if !self.city.is_empty() {
            parts.push(&self.city);
        }
        if !self.state_code.is_empty() {
            parts.push(&self.state_code);
        }
        parts.join(", ")
    }
}

const COMPANY_KEYS: &[&str] = &[
    "companyName",
    "company_name",
    "company",
    "businessName",
    "name",
];
const PERSON_KEYS: &[&str] = &[
    "clientName",
    "personName",
    "person_name",
    "contactName",
    "contact",
];
const STREET_KEYS: &[&str] = &["street", "streetAddress", "address1", "line1", "address"];
const APARTMENT_KEYS: &[&str] = &["apartment", "suite", "address2", "line2"];
const CITY_KEYS: &[&str] = &["city", "town"];
const STATE_KEYS: &[&str] = &["stateCode", "state_code", "state"];
const ZIP_KEYS: &[&str] = &["zipCode", "zip", "pincode", "pinCode", "postalCode"];
const COUNTRY_KEYS: &[&str] = &["countryCode", "country_code", "country"];
const GSTIN_KEYS: &[&str] = &["gstin", "gstNumber", "gst"];
const PAN_KEYS: &[&str] = &["pan", "panNumber"];

/// Normalise a loosely-shaped stored address record into an [`Address`].
///
/// Each field takes the first non-empty string among its known aliases, first
/// on the record itself and then on a nested `address` object.
pub fn resolve_address(raw: &Value) -> Address {
    let nested = raw.get("address").filter(|v| v.is_object());
    let pick = |keys: &[&str]| -> Option<String> {
        first_text(raw, keys).or_else(|| nested.and_then(|n| first_text(n, keys)))
    };

    Address {
        company_name: pick(COMPANY_KEYS).unwrap_or_default(),
        person_name: pick(PERSON_KEYS),
        street: pick(STREET_KEYS).unwrap_or_default(),
        apartment: pick(APARTMENT_KEYS),
        city: pick(CITY_KEYS).unwrap_or_default(),
        state_code: pick(STATE_KEYS).unwrap_or_default(),
        zip: pick(ZIP_KEYS).unwrap_or_default(),
        country_code: pick(COUNTRY_KEYS).unwrap_or_else(default_country),
        pan: pick(PAN_KEYS).map(|p| p.to_uppercase()),
        gstin: pick(GSTIN_KEYS).map(|g| g.to_uppercase()),
    }
}

fn first_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(*key))
        .filter_map(|v| match v {
            Value::String(s) => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .find(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn picks_first_non_empty_alias() {
        let raw = json!({
            "companyName": "",
            "company": "Acme Traders",
            "clientName": "R. Iyer",
            "stateCode": "KA",
            "pincode": 560001,
            "gstin": "29abcde1234f1z5"
        });
        let addr = resolve_address(&raw);
        assert_eq!(addr.company_name, "Acme Traders");
        assert_eq!(addr.person_name.as_deref(), Some("R. Iyer"));
        assert_eq!(addr.state_code, "KA");
        assert_eq!(addr.zip, "560001");
        assert_eq!(addr.country_code, "IN");
        assert_eq!(addr.gstin.as_deref(), Some("29ABCDE1234F1Z5"));
    }

    #[test]
    fn falls_back_to_nested_address_object() {
        let raw = json!({
            "name": "Globex",
            "address": { "street": "12 MG Road", "city": "Chennai", "state": "TN" }
        });
        let addr = resolve_address(&raw);
        assert_eq!(addr.company_name, "Globex");
        assert_eq!(addr.street, "12 MG Road");
        assert_eq!(addr.city, "Chennai");
        assert_eq!(addr.state_code, "TN");
    }

    #[test]
    fn reports_malformed_tax_ids() {
        let addr = Address {
            company_name: "X".into(),
            gstin: Some("29ABCDE1234F1Z".into()),
            pan: Some("ABCDE1234F".into()),
            ..Address::default()
        };
        let problems = addr.tax_id_problems();
        assert_eq!(problems.len(), 1);
        assert!(problems[0].contains("GSTIN"));
    }
}
