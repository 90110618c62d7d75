//! Market data provider trait definitions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::errors::MarketDataError;
use crate::models::{HistoricalClose, LatestQuote, SearchResult};

/// Trait for market data providers.
///
/// Implement this trait to add support for a new market data source, or to
/// stub one out in tests.
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use alphasigma_market_data::{LatestQuote, MarketDataError, MarketDataProvider};
///
/// struct FixedProvider;
///
/// #[async_trait]
/// impl MarketDataProvider for FixedProvider {
///     fn id(&self) -> &'static str {
///         "FIXED"
///     }
///
///     async fn get_latest_quote(&self, symbol: &str) -> Result<LatestQuote, MarketDataError> {
///         Ok(LatestQuote::new(symbol, Some(rust_decimal::Decimal::ONE)))
///     }
///
///     // ... implement get_monthly_closes
/// }
/// ```
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Unique identifier for this provider.
    ///
    /// Should be a constant string like "YAHOO". Used for logging.
    fn id(&self) -> &'static str;

    /// Fetch the latest quote for a symbol.
    async fn get_latest_quote(&self, symbol: &str) -> Result<LatestQuote, MarketDataError>;

    /// Fetch monthly closing prices for a symbol.
    ///
    /// The closes should be ordered by timestamp ascending.
    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoricalClose>, MarketDataError>;

    /// Search for symbols matching the query.
    ///
    /// Default implementation returns `NotSupported`.
    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        let _ = query;
        Err(MarketDataError::NotSupported {
            operation: "search".to_string(),
            provider: self.id().to_string(),
        })
    }
}
