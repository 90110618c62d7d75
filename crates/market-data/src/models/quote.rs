use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Latest market snapshot for a single symbol.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatestQuote {
    /// Symbol as sent to the provider (e.g., "AAPL")
    pub symbol: String,

    /// Regular market price, if the provider reported one
    pub current_price: Option<Decimal>,

    /// Close of the previous regular session
    pub previous_close: Option<Decimal>,

    /// Display name (short name, then long name, then the symbol)
    pub short_name: String,

    /// Quote currency
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl LatestQuote {
    /// Create a quote carrying only a price; the name defaults to the symbol.
    pub fn new(symbol: impl Into<String>, current_price: Option<Decimal>) -> Self {
        let symbol = symbol.into();
        Self {
            short_name: symbol.clone(),
            symbol,
            current_price,
            previous_close: None,
            currency: None,
        }
    }

    pub fn with_previous_close(mut self, previous_close: Decimal) -> Self {
        self.previous_close = Some(previous_close);
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = short_name.into();
        self
    }

    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }
}

/// One closing price in a historical series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoricalClose {
    /// Start of the bar the close belongs to
    pub timestamp: DateTime<Utc>,

    /// Closing price
    pub close: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_latest_quote_new_defaults_name_to_symbol() {
        let quote = LatestQuote::new("SPY", Some(dec!(512.10)));
        assert_eq!(quote.short_name, "SPY");
        assert_eq!(quote.current_price, Some(dec!(512.10)));
        assert!(quote.previous_close.is_none());
    }

    #[test]
    fn test_latest_quote_builders() {
        let quote = LatestQuote::new("AAPL", Some(dec!(190)))
            .with_previous_close(dec!(188.5))
            .with_short_name("Apple Inc.")
            .with_currency("USD");
        assert_eq!(quote.previous_close, Some(dec!(188.5)));
        assert_eq!(quote.short_name, "Apple Inc.");
        assert_eq!(quote.currency.as_deref(), Some("USD"));
    }
}
