use once_cell::sync::Lazy;
use regex::Regex;

static GSTIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z]{1}[A-Z0-9]{1}Z[A-Z0-9]{1}$")
        .expect("GSTIN pattern")
});

static PAN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]{1}$")
        .expect("PAN pattern")
});

pub fn is_valid_gstin(gstin: &str) -> bool {
    GSTIN.is_match(gstin)
}

pub fn is_valid_pan(pan: &str) -> bool {
    PAN.is_match(pan)
}

/// First two characters of a GSTIN, which encode the registrant's state.
/// Only requires two characters; the rest of the GSTIN is not checked.
pub fn state_code(gstin: &str) -> Option<&str> {
    gstin.get(..2).filter(|code| code.chars().count() == 2)
}
