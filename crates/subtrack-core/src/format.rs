//! Currency rendering for presentation.

use rust_decimal::RoundingStrategy;
use subtrack_domain::{CurrencyPosition, Money};

/// Highest number of decimal places the formatter will render.
pub const MAX_DECIMAL_PLACES: u32 = 8;

/// Formats currency amounts for presentation.
pub trait CurrencyFormatter {
    fn format_money(&self, money: &Money) -> String;
}

/// Display preferences for amounts: symbol, its position and precision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyFormat {
    pub symbol: String,
    pub position: CurrencyPosition,
    pub decimal_places: u32,
}

impl Default for CurrencyFormat {
    fn default() -> Self {
        Self {
            symbol: "$".into(),
            position: CurrencyPosition::Before,
            decimal_places: 2,
        }
    }
}

impl CurrencyFormatter for CurrencyFormat {
    fn format_money(&self, money: &Money) -> String {
        format_money(money, &self.symbol, self.position, self.decimal_places)
    }
}

/// Renders `money` with exactly `decimal_places` digits, rounding half away from zero.
pub fn format_money(
    money: &Money,
    symbol: &str,
    position: CurrencyPosition,
    decimal_places: u32,
) -> String {
    let places = decimal_places.min(MAX_DECIMAL_PLACES);
    let mut value = money
        .to_decimal()
        .round_dp_with_strategy(places, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(places);

    let symbol = symbol.trim();
    if symbol.is_empty() {
        return value.to_string();
    }
    match position {
        CurrencyPosition::Before => format!("{symbol}{value}"),
        CurrencyPosition::After => format!("{value} {symbol}"),
    }
}
