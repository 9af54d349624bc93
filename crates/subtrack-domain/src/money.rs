//! Fixed-precision monetary amounts stored as integer minor units.

use std::fmt;

use rust_decimal::{prelude::ToPrimitive, Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// ISO 4217 currency representation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into().trim().to_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of decimal digits carried by one minor unit of this currency.
    pub fn minor_exponent(&self) -> u32 {
        match self.0.as_str() {
            "JPY" | "KRW" | "VND" | "CLP" => 0,
            _ => 2,
        }
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        Self::new("USD")
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A currency the presentation layer can offer in its pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedCurrency {
    pub symbol: &'static str,
    pub code: &'static str,
    pub name: &'static str,
}

pub const SUPPORTED_CURRENCIES: &[SupportedCurrency] = &[
    SupportedCurrency {
        symbol: "$",
        code: "USD",
        name: "US Dollar",
    },
    SupportedCurrency {
        symbol: "€",
        code: "EUR",
        name: "Euro",
    },
    SupportedCurrency {
        symbol: "£",
        code: "GBP",
        name: "British Pound",
    },
    SupportedCurrency {
        symbol: "¥",
        code: "JPY",
        name: "Japanese Yen",
    },
];

/// Looks up the display symbol of a supported currency code.
pub fn currency_symbol(code: &CurrencyCode) -> Option<&'static str> {
    SUPPORTED_CURRENCIES
        .iter()
        .find(|entry| entry.code == code.as_str())
        .map(|entry| entry.symbol)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    #[error("amount cannot be negative: {0}")]
    Negative(String),
    #[error("invalid amount `{0}`")]
    Invalid(String),
    #[error("amount out of range: {0}")]
    Overflow(String),
    #[error("currency mismatch: {0} vs {1}")]
    CurrencyMismatch(CurrencyCode, CurrencyCode),
}

/// Non-negative amount of money held as integer minor units (cents for USD).
///
/// All arithmetic is integer arithmetic, so sums and yearly projections never
/// drift. Decimal rendering happens only at the edges via [`Money::to_decimal`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    minor_units: u64,
    currency: CurrencyCode,
}

impl Money {
    pub fn new(minor_units: u64, currency: CurrencyCode) -> Self {
        Self {
            minor_units,
            currency,
        }
    }

    pub fn zero(currency: CurrencyCode) -> Self {
        Self::new(0, currency)
    }

    /// Builds an amount from signed minor units, rejecting negative values.
    pub fn from_minor(minor_units: i64, currency: CurrencyCode) -> Result<Self, MoneyError> {
        let unsigned = u64::try_from(minor_units)
            .map_err(|_| MoneyError::Negative(minor_units.to_string()))?;
        Ok(Self::new(unsigned, currency))
    }

    /// Builds an amount from whole currency units (e.g. a budget of 120 dollars).
    pub fn from_major(units: u64, currency: CurrencyCode) -> Result<Self, MoneyError> {
        let factor = 10u64.pow(currency.minor_exponent());
        let minor = units
            .checked_mul(factor)
            .ok_or_else(|| MoneyError::Overflow(units.to_string()))?;
        Ok(Self::new(minor, currency))
    }

    /// Converts a decimal value, rounding half away from zero to the currency's minor unit.
    pub fn from_decimal(value: Decimal, currency: CurrencyCode) -> Result<Self, MoneyError> {
        if value < Decimal::ZERO {
            return Err(MoneyError::Negative(value.to_string()));
        }
        let exponent = currency.minor_exponent();
        let rounded = value.round_dp_with_strategy(exponent, RoundingStrategy::MidpointAwayFromZero);
        let scaled = rounded
            .checked_mul(Decimal::from(10u64.pow(exponent)))
            .ok_or_else(|| MoneyError::Overflow(value.to_string()))?;
        let minor = scaled
            .trunc()
            .to_u64()
            .ok_or_else(|| MoneyError::Overflow(value.to_string()))?;
        Ok(Self::new(minor, currency))
    }

    /// Parses user or file input such as `"15.49"`, `"$15.49"` or `"1,299.00"`.
    ///
    /// A leading currency symbol is ignored. Commas are only accepted as
    /// thousands separators between groups of three digits; anything else,
    /// trailing text included, is [`MoneyError::Invalid`].
    pub fn parse(input: &str, currency: CurrencyCode) -> Result<Self, MoneyError> {
        let body = input
            .trim()
            .trim_start_matches(|c: char| !(c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | ',')))
            .trim_start();
        let plain = plain_amount(body).ok_or_else(|| MoneyError::Invalid(input.to_string()))?;
        let value: Decimal = plain
            .parse()
            .map_err(|_| MoneyError::Invalid(input.to_string()))?;
        Self::from_decimal(value, currency)
    }

    pub fn minor_units(&self) -> u64 {
        self.minor_units
    }

    pub fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    pub fn is_zero(&self) -> bool {
        self.minor_units == 0
    }

    pub fn is_positive(&self) -> bool {
        self.minor_units > 0
    }

    /// Exact decimal value, carrying the currency's natural scale.
    pub fn to_decimal(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.minor_units as i128, self.currency.minor_exponent())
    }

    pub fn checked_add(&self, other: &Money) -> Result<Money, MoneyError> {
        if self.currency != other.currency {
            return Err(MoneyError::CurrencyMismatch(
                self.currency.clone(),
                other.currency.clone(),
            ));
        }
        let minor = self
            .minor_units
            .checked_add(other.minor_units)
            .ok_or_else(|| MoneyError::Overflow(format!("{} + {}", self, other)))?;
        Ok(Money::new(minor, self.currency.clone()))
    }

    /// Multiplies by a whole factor, e.g. 12 for a yearly projection.
    pub fn scale(&self, factor: u64) -> Result<Money, MoneyError> {
        let minor = self
            .minor_units
            .checked_mul(factor)
            .ok_or_else(|| MoneyError::Overflow(format!("{} x {}", self, factor)))?;
        Ok(Money::new(minor, self.currency.clone()))
    }

    /// Sums amounts in `currency`. An empty iterator yields zero.
    pub fn sum<'a, I>(amounts: I, currency: CurrencyCode) -> Result<Money, MoneyError>
    where
        I: IntoIterator<Item = &'a Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(currency), |total, amount| total.checked_add(amount))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.to_decimal(), self.currency)
    }
}

/// Strips thousands separators from `[+-]digits[.digits]`, returning `None`
/// for any other shape.
fn plain_amount(body: &str) -> Option<String> {
    let (sign, unsigned) = if let Some(rest) = body.strip_prefix('-') {
        ("-", rest)
    } else {
        ("", body.strip_prefix('+').unwrap_or(body))
    };
    let (whole, fraction) = match unsigned.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (unsigned, None),
    };
    if let Some(fraction) = fraction {
        if fraction.is_empty() || !fraction.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
    }

    let digits = if whole.contains(',') {
        let mut groups = whole.split(',');
        let lead = groups.next()?;
        let lead_ok = (1..=3).contains(&lead.len()) && lead.chars().all(|c| c.is_ascii_digit());
        let rest_ok = groups.all(|group| group.len() == 3 && group.chars().all(|c| c.is_ascii_digit()));
        if !lead_ok || !rest_ok {
            return None;
        }
        whole.replace(',', "")
    } else {
        if !whole.chars().all(|c| c.is_ascii_digit()) || (whole.is_empty() && fraction.is_none()) {
            return None;
        }
        whole.to_string()
    };
    let digits = if digits.is_empty() { "0".to_string() } else { digits };

    Some(match fraction {
        Some(fraction) => format!("{sign}{digits}.{fraction}"),
        None => format!("{sign}{digits}"),
    })
}
