use chrono::{Datelike, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Indian financial year (April 1 to March 31) encoded as a 4-digit tag.
///
/// The tag is the last two digits of the start year followed by the last two
/// digits of the end year, so April 2025 to March 2026 is `"2526"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FinancialYear(String);

impl FinancialYear {
    /// Financial year containing `date`.
    pub fn for_date(date: NaiveDate) -> Self {
        let year = date.year();
        let start = if date.month() >= 4 { year } else { year - 1 };
        Self(format!("{:02}{:02}", last_two(start), last_two(start + 1)))
    }

    /// Financial year of today's local date.
    pub fn current() -> Self {
        Self::for_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn last_two(year: i32) -> i32 {
    year.rem_euclid(100)
}

impl fmt::Display for FinancialYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for FinancialYear {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(s.to_string()))
        } else {
            Err(format!("financial year must be 4 digits, got '{s}'"))
        }
    }
}

impl TryFrom<String> for FinancialYear {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FinancialYear> for String {
    fn from(value: FinancialYear) -> Self {
        value.0
    }
}
