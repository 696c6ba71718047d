use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use super::totals::round2;

const ONES: [&str; 20] = [
    "", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten", "Eleven",
    "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen", "Nineteen",
];

const TENS: [&str; 10] = [
    "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
];

const CRORE: u128 = 10_000_000;
const LAKH: u128 = 100_000;
const THOUSAND: u128 = 1_000;

/// Spell an amount out for the "amount chargeable (in words)" line, using
/// Indian grouping: "Indian Rupees One Lakh Twenty Thousand and Fifty Paise Only".
/// The sign is ignored; the amount is rounded to paise first.
pub fn amount_in_words(amount: Decimal) -> String {
    let amount = round2(amount.abs());
    let rupees = amount.trunc();
    let paise = (amount - rupees) * Decimal::ONE_HUNDRED;

    // Every non-negative Decimal fits in u128.
    format!(
        "Indian Rupees {} and {} Paise Only",
        spell_whole(rupees.to_u128().unwrap_or_default()),
        spell_whole(paise.to_u128().unwrap_or_default())
    )
}

/// Whole number in words with crore/lakh/thousand groups. Zero is "Zero".
fn spell_whole(n: u128) -> String {
    if n == 0 {
        return "Zero".to_string();
    }
    spell(n)
}

fn spell(n: u128) -> String {
    let mut parts: Vec<String> = Vec::new();

    let crores = n / CRORE;
    if crores > 0 {
        parts.push(format!("{} Crore", spell(crores)));
    }
    let rest = n % CRORE;

    for (unit, name) in [(LAKH, "Lakh"), (THOUSAND, "Thousand")] {
        let count = (rest % (unit * 100)) / unit;
        if count > 0 {
            parts.push(format!("{} {name}", below_hundred(count)));
        }
    }

    let hundreds = (rest % THOUSAND) / 100;
    if hundreds > 0 {
        parts.push(format!("{} Hundred", ONES[hundreds as usize]));
    }

    let tail = rest % 100;
    if tail > 0 {
        parts.push(below_hundred(tail));
    }

    parts.join(" ")
}

fn below_hundred(n: u128) -> String {
    let n = n as usize;
    if n < 20 {
        return ONES[n].to_string();
    }
    let (tens, ones) = (n / 10, n % 10);
    if ones == 0 {
        TENS[tens].to_string()
    } else {
        format!("{} {}", TENS[tens], ONES[ones])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_amount() {
        assert_eq!(
            amount_in_words(Decimal::ZERO),
            "Indian Rupees Zero and Zero Paise Only"
        );
    }

    #[test]
    fn one_lakh() {
        assert_eq!(
            amount_in_words(dec!(100000)),
            "Indian Rupees One Lakh and Zero Paise Only"
        );
    }

    #[test]
    fn rupees_and_paise() {
        assert_eq!(
            amount_in_words(dec!(236.50)),
            "Indian Rupees Two Hundred Thirty Six and Fifty Paise Only"
        );
        assert_eq!(
            amount_in_words(dec!(0.07)),
            "Indian Rupees Zero and Seven Paise Only"
        );
    }

    #[test]
    fn paise_are_rounded_first() {
        assert_eq!(
            amount_in_words(dec!(99.995)),
            "Indian Rupees One Hundred and Zero Paise Only"
        );
    }

    #[test]
    fn indian_grouping() {
        assert_eq!(
            spell_whole(12_34_56_789),
            "Twelve Crore Thirty Four Lakh Fifty Six Thousand Seven Hundred Eighty Nine"
        );
        assert_eq!(spell_whole(1_00_000), "One Lakh");
        assert_eq!(spell_whole(1_00_00_000), "One Crore");
        assert_eq!(spell_whole(20_05_010), "Twenty Lakh Five Thousand Ten");
        assert_eq!(spell_whole(115), "One Hundred Fifteen");
    }

    #[test]
    fn amounts_beyond_u64_are_spelled() {
        assert_eq!(
            amount_in_words(dec!(20000000000000000000)),
            "Indian Rupees Two Lakh Crore Crore and Zero Paise Only"
        );
        assert!(!amount_in_words(Decimal::MAX).starts_with("Indian Rupees Zero"));
    }

    #[test]
    fn large_crore_counts_recurse() {
        assert_eq!(spell_whole(150_00_00_000), "One Hundred Fifty Crore");
        assert_eq!(spell_whole(1_00_000_00_00_000), "One Lakh Crore");
    }
}
