use rust_decimal::Decimal;
use serde::Serialize;

use super::gstin::state_code;
use crate::config::Address;

pub const CGST_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);
pub const SGST_RATE: Decimal = Decimal::from_parts(9, 0, 0, false, 0);
pub const IGST_RATE: Decimal = Decimal::from_parts(18, 0, 0, false, 0);

/// Which GST applies to a transaction. Rates are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TaxClassification {
    NoTax,
    IntraState { cgst_rate: Decimal, sgst_rate: Decimal },
    InterState { igst_rate: Decimal },
}

impl TaxClassification {
    pub fn intra_state() -> Self {
        TaxClassification::IntraState {
            cgst_rate: CGST_RATE,
            sgst_rate: SGST_RATE,
        }
    }

    pub fn inter_state() -> Self {
        TaxClassification::InterState {
            igst_rate: IGST_RATE,
        }
    }

    /// Total percentage applied to a line's base amount.
    pub fn combined_rate(&self) -> Decimal {
        match *self {
            TaxClassification::NoTax => Decimal::ZERO,
            TaxClassification::IntraState {
                cgst_rate,
                sgst_rate,
            } => cgst_rate + sgst_rate,
            TaxClassification::InterState { igst_rate } => igst_rate,
        }
    }

    pub fn label(&self) -> String {
        match *self {
            TaxClassification::NoTax => "No tax".to_string(),
            TaxClassification::IntraState {
                cgst_rate,
                sgst_rate,
            } => format!("Intra-state (CGST {cgst_rate}% + SGST {sgst_rate}%)"),
            TaxClassification::InterState { igst_rate } => {
                format!("Inter-state (IGST {igst_rate}%)")
            }
        }
    }
}

/// Decide intra- vs inter-state GST for a transaction.
///
/// Explicit state codes win over GSTIN prefixes. Without enough information
/// to compare, the transaction is treated as inter-state.
pub fn classify(origin: &Address, destination: &Address, tax_enabled: bool) -> TaxClassification {
    if !tax_enabled {
        return TaxClassification::NoTax;
    }

    let states = if !origin.state_code.is_empty() && !destination.state_code.is_empty() {
        Some((origin.state_code.as_str(), destination.state_code.as_str()))
    } else {
        let from = origin.gstin.as_deref().and_then(state_code);
        let to = destination.gstin.as_deref().and_then(state_code);
        from.zip(to)
    };

    let classification = match states {
        Some((from, to)) if from == to => TaxClassification::intra_state(),
        _ => TaxClassification::inter_state(),
    };
    tracing::debug!(?states, ?classification, "classified transaction");
    classification
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn state(code: &str) -> Address {
        Address {
            company_name: "Party".into(),
            state_code: code.into(),
            ..Address::default()
        }
    }

    fn gstin(value: &str) -> Address {
        Address {
            company_name: "Party".into(),
            gstin: Some(value.into()),
            ..Address::default()
        }
    }

    #[test]
    fn same_state_is_intra_state() {
        assert_eq!(
            classify(&state("KA"), &state("KA"), true),
            TaxClassification::IntraState {
                cgst_rate: dec!(9),
                sgst_rate: dec!(9)
            }
        );
    }

    #[test]
    fn different_states_are_inter_state() {
        assert_eq!(
            classify(&state("KA"), &state("TN"), true),
            TaxClassification::InterState { igst_rate: dec!(18) }
        );
    }

    #[test]
    fn state_codes_are_case_sensitive() {
        assert_eq!(
            classify(&state("KA"), &state("ka"), true),
            TaxClassification::inter_state()
        );
    }

    #[test]
    fn gstin_prefix_is_the_fallback() {
        assert_eq!(
            classify(&gstin("29ABCDE1234F1Z5"), &gstin("29XYZAB5678C1Z2"), true),
            TaxClassification::intra_state()
        );
        assert_eq!(
            classify(&gstin("29ABCDE1234F1Z5"), &gstin("33XYZAB5678C1Z2"), true),
            TaxClassification::inter_state()
        );
    }

    #[test]
    fn state_codes_take_precedence_over_gstin() {
        let mut origin = gstin("29ABCDE1234F1Z5");
        origin.state_code = "KA".into();
        let mut destination = gstin("29XYZAB5678C1Z2");
        destination.state_code = "TN".into();
        assert_eq!(
            classify(&origin, &destination, true),
            TaxClassification::inter_state()
        );
    }

    #[test]
    fn one_missing_state_code_uses_gstin() {
        let mut origin = gstin("29ABCDE1234F1Z5");
        origin.state_code = "KA".into();
        let destination = gstin("29XYZAB5678C1Z2");
        assert_eq!(
            classify(&origin, &destination, true),
            TaxClassification::intra_state()
        );
    }

    #[test]
    fn unknown_defaults_to_inter_state() {
        assert_eq!(
            classify(&state(""), &state(""), true),
            TaxClassification::inter_state()
        );
        assert_eq!(
            classify(&gstin("2"), &gstin("29ABCDE1234F1Z5"), true),
            TaxClassification::inter_state()
        );
    }

    #[test]
    fn disabled_tax_wins() {
        assert_eq!(
            classify(&state("KA"), &state("KA"), false),
            TaxClassification::NoTax
        );
        assert_eq!(
            classify(&state(""), &gstin("29"), false),
            TaxClassification::NoTax
        );
    }

    #[test]
    fn combined_rates() {
        assert_eq!(TaxClassification::intra_state().combined_rate(), dec!(18));
        assert_eq!(TaxClassification::inter_state().combined_rate(), dec!(18));
        assert_eq!(TaxClassification::NoTax.combined_rate(), Decimal::ZERO);
    }
}
