use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An amount of money in minor units (bani, cents).
///
/// Arithmetic stays in integers; decimals only appear when parsing user
/// input or rendering for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MoneyParseError {
    #[error("empty amount")]
    Empty,

    #[error("invalid amount: {input}")]
    Invalid { input: String },

    #[error("amount has more than two decimals: {input}")]
    TooPrecise { input: String },

    #[error("negative amount: {input}")]
    Negative { input: String },

    #[error("amount too large: {input}")]
    Overflow { input: String },
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor_units: i64) -> Self {
        Self(minor_units)
    }

    pub const fn from_major(major_units: i64) -> Self {
        Self(major_units * 100)
    }

    pub const fn minor_units(self) -> i64 {
        self.0
    }

    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(i64::from(quantity)))
    }

    pub fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Percentage of this amount, rounded half up.
    pub fn percent(self, rate_percent: u32) -> Self {
        let scaled = self.0.saturating_mul(i64::from(rate_percent));
        Self((scaled + 50).div_euclid(100))
    }
}

impl FromStr for Money {
    type Err = MoneyParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(MoneyParseError::Empty);
        }
        if trimmed.starts_with('-') {
            return Err(MoneyParseError::Negative {
                input: trimmed.to_string(),
            });
        }

        let invalid = || MoneyParseError::Invalid {
            input: trimmed.to_string(),
        };
        let overflow = || MoneyParseError::Overflow {
            input: trimmed.to_string(),
        };

        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (trimmed, ""),
        };

        if whole.is_empty() || !whole.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if trimmed.contains('.') && fraction.is_empty() {
            return Err(invalid());
        }
        if !fraction.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        if fraction.len() > 2 {
            return Err(MoneyParseError::TooPrecise {
                input: trimmed.to_string(),
            });
        }

        let whole_units: i64 = whole.parse().map_err(|_| overflow())?;
        let fraction_units: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| invalid())? * 10,
            _ => fraction.parse().map_err(|_| invalid())?,
        };

        whole_units
            .checked_mul(100)
            .and_then(|minor| minor.checked_add(fraction_units))
            .map(Money)
            .ok_or_else(overflow)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let absolute = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, absolute / 100, absolute % 100)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, other: Money) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Ron,
    Eur,
    Usd,
    Gbp,
}

impl Currency {
    pub fn all() -> &'static [Currency] {
        &[Currency::Ron, Currency::Eur, Currency::Usd, Currency::Gbp]
    }

    pub fn code(&self) -> &'static str {
        match self {
            Currency::Ron => "RON",
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
        }
    }

    /// Lowercase ISO code, as payment processors expect it.
    pub fn processor_code(&self) -> String {
        self.code().to_lowercase()
    }

    pub fn from_code(value: &str) -> Option<Self> {
        Currency::all()
            .iter()
            .copied()
            .find(|currency| currency.code().eq_ignore_ascii_case(value.trim()))
    }

    pub fn format(&self, amount: Money) -> String {
        format!("{} {}", amount, self.code())
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whole_and_fractional_amounts() {
        assert_eq!("45".parse::<Money>(), Ok(Money::from_minor(4500)));
        assert_eq!("12.5".parse::<Money>(), Ok(Money::from_minor(1250)));
        assert_eq!("12.50".parse::<Money>(), Ok(Money::from_minor(1250)));
        assert_eq!("0.05".parse::<Money>(), Ok(Money::from_minor(5)));
        assert_eq!(" 7 ".parse::<Money>(), Ok(Money::from_major(7)));
    }

    #[test]
    fn rejects_malformed_amounts() {
        assert_eq!("".parse::<Money>(), Err(MoneyParseError::Empty));
        assert!(matches!(
            "-3".parse::<Money>(),
            Err(MoneyParseError::Negative { .. })
        ));
        assert!(matches!(
            "1.234".parse::<Money>(),
            Err(MoneyParseError::TooPrecise { .. })
        ));
        assert!(matches!(
            "abc".parse::<Money>(),
            Err(MoneyParseError::Invalid { .. })
        ));
        assert!(matches!(
            "3.".parse::<Money>(),
            Err(MoneyParseError::Invalid { .. })
        ));
        assert!(matches!(
            ".5".parse::<Money>(),
            Err(MoneyParseError::Invalid { .. })
        ));
    }

    #[test]
    fn displays_with_two_decimals() {
        assert_eq!(Money::from_minor(4500).to_string(), "45.00");
        assert_eq!(Money::from_minor(1205).to_string(), "12.05");
        assert_eq!(Money::from_minor(-250).to_string(), "-2.50");
        assert_eq!(Currency::Ron.format(Money::from_major(90)), "90.00 RON");
    }

    #[test]
    fn summing_many_small_amounts_does_not_drift() {
        let total: Money = std::iter::repeat(Money::from_minor(10)).take(1000).sum();
        assert_eq!(total, Money::from_major(100));
    }

    #[test]
    fn percent_rounds_half_up() {
        assert_eq!(Money::from_minor(1000).percent(19), Money::from_minor(190));
        assert_eq!(Money::from_minor(1050).percent(19), Money::from_minor(200));
        assert_eq!(Money::from_minor(3).percent(50), Money::from_minor(2));
    }

    #[test]
    fn currency_codes_are_case_insensitive() {
        assert_eq!(Currency::from_code("eur"), Some(Currency::Eur));
        assert_eq!(Currency::from_code("RON"), Some(Currency::Ron));
        assert_eq!(Currency::from_code("JPY"), None);
        assert_eq!(Currency::Gbp.processor_code(), "gbp");
    }
}
