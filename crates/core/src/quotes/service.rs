use std::sync::Arc;
use std::time::Duration;

use alphasigma_market_data::{HistoricalClose, LatestQuote, MarketDataProvider, SearchResult};
use async_trait::async_trait;
use chrono::{Months, Utc};
use log::{debug, warn};

use super::cache::QuoteCache;
use super::model::{month_label, MonthlyClose};
use crate::errors::Result;

/// Quote lookups used by the holdings service.
#[async_trait]
pub trait QuoteServiceTrait: Send + Sync {
    /// Latest quote for a ticker, or `None` when the provider cannot supply one.
    async fn get_quote(&self, ticker: &str) -> Option<LatestQuote>;

    /// Monthly closes covering the last `months` months, oldest first.
    /// Provider failures yield an empty list.
    async fn get_monthly_closes(&self, ticker: &str, months: u32) -> Vec<HistoricalClose>;

    async fn get_monthly_history(&self, ticker: &str, months: u32) -> Vec<MonthlyClose> {
        self.get_monthly_closes(ticker, months)
            .await
            .into_iter()
            .map(|c| MonthlyClose {
                month: month_label(&c.timestamp),
                close: c.close,
            })
            .collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>>;
}

/// Wraps a [`MarketDataProvider`] with a [`QuoteCache`].
///
/// Only successful lookups are cached, so a failing ticker is retried on
/// the next request.
pub struct QuoteService {
    provider: Arc<dyn MarketDataProvider>,
    cache: QuoteCache,
}

impl QuoteService {
    pub fn new(provider: Arc<dyn MarketDataProvider>, cache_ttl: Duration) -> Self {
        Self {
            provider,
            cache: QuoteCache::new(cache_ttl),
        }
    }

    pub fn cache(&self) -> &QuoteCache {
        &self.cache
    }
}

#[async_trait]
impl QuoteServiceTrait for QuoteService {
    async fn get_quote(&self, ticker: &str) -> Option<LatestQuote> {
        let symbol = QuoteCache::key(ticker);
        if symbol.is_empty() {
            return None;
        }

        if let Some(quote) = self.cache.get(&symbol) {
            debug!("Quote cache hit for {}", symbol);
            return Some(quote);
        }

        match self.provider.get_latest_quote(&symbol).await {
            Ok(quote) => {
                self.cache.insert(&symbol, quote.clone());
                Some(quote)
            }
            Err(e) => {
                warn!(
                    "Failed to fetch quote for {} from {}: {}",
                    symbol,
                    self.provider.id(),
                    e
                );
                None
            }
        }
    }

    async fn get_monthly_closes(&self, ticker: &str, months: u32) -> Vec<HistoricalClose> {
        let symbol = QuoteCache::key(ticker);
        let end = Utc::now();
        let start = end
            .checked_sub_months(Months::new(months))
            .unwrap_or(end);

        match self.provider.get_monthly_closes(&symbol, start, end).await {
            Ok(mut closes) => {
                closes.sort_by_key(|c| c.timestamp);
                closes
            }
            Err(e) => {
                warn!("Failed to fetch monthly history for {}: {}", symbol, e);
                Vec::new()
            }
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>> {
        Ok(self.provider.search(query).await?)
    }
}
