//! Yahoo Finance market data provider.
//!
//! Latest quotes come from the quoteSummary `price` module (which needs the
//! cookie/crumb handshake) with the chart API as a fallback. Monthly history
//! and search go through the `yahoo_finance_api` connector.

mod models;

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use lazy_static::lazy_static;
use reqwest::header;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use tracing::{debug, warn};
use urlencoding::encode;
use yahoo_finance_api as yahoo;

use crate::errors::MarketDataError;
use crate::models::{HistoricalClose, LatestQuote, SearchResult};
use crate::provider::MarketDataProvider;

use models::{YahooPriceData, YahooQuoteSummaryResponse};

const PROVIDER_ID: &str = "YAHOO";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// Crumb/Cookie Authentication
// ============================================================================

/// Cached Yahoo authentication data
#[derive(Debug, Clone)]
struct CrumbData {
    cookie: String,
    crumb: String,
}

lazy_static! {
    /// Global cache for Yahoo authentication crumb
    static ref YAHOO_CRUMB: RwLock<Option<CrumbData>> = RwLock::default();
}

fn read_crumb() -> RwLockReadGuard<'static, Option<CrumbData>> {
    YAHOO_CRUMB.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_crumb() -> RwLockWriteGuard<'static, Option<CrumbData>> {
    YAHOO_CRUMB
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ============================================================================
// Yahoo Provider
// ============================================================================

/// Yahoo Finance market data provider for US equities and ETFs.
pub struct YahooProvider {
    connector: yahoo::YahooConnector,
    client: reqwest::Client,
}

impl YahooProvider {
    /// Create a new Yahoo Finance provider.
    pub fn new() -> Result<Self, MarketDataError> {
        let connector = yahoo::YahooConnector::new().map_err(|e| {
            MarketDataError::provider(
                PROVIDER_ID,
                format!("Failed to initialize Yahoo connector: {}", e),
            )
        })?;
        Ok(Self {
            connector,
            client: reqwest::Client::new(),
        })
    }

    // ========================================================================
    // Crumb/Cookie Authentication
    // ========================================================================

    /// Ensure we have a valid Yahoo authentication crumb.
    async fn ensure_crumb(&self) -> Result<CrumbData, MarketDataError> {
        if let Some(crumb) = read_crumb().as_ref() {
            return Ok(crumb.clone());
        }
        self.fetch_crumb().await
    }

    /// Fetch a new Yahoo authentication crumb.
    async fn fetch_crumb(&self) -> Result<CrumbData, MarketDataError> {
        // Step 1: Get cookie from fc.yahoo.com
        let response = self
            .client
            .get("https://fc.yahoo.com")
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get cookie: {}", e)))?;

        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(v, _)| v.to_string()))
            .ok_or_else(|| MarketDataError::provider(PROVIDER_ID, "Failed to parse Yahoo cookie"))?;

        // Step 2: Get crumb using cookie
        let crumb = self
            .client
            .get("https://query1.finance.yahoo.com/v1/test/getcrumb")
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to get crumb: {}", e)))?
            .text()
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, format!("Failed to read crumb: {}", e)))?;

        let crumb_data = CrumbData { cookie, crumb };
        *write_crumb() = Some(crumb_data.clone());
        Ok(crumb_data)
    }

    /// Clear the cached crumb (used when authentication fails)
    fn clear_crumb(&self) {
        *write_crumb() = None;
    }

    // ========================================================================
    // Quote Fetching
    // ========================================================================

    /// Fetch latest quote from the quoteSummary price module.
    async fn fetch_price_summary(&self, symbol: &str) -> Result<LatestQuote, MarketDataError> {
        let crumb = self.ensure_crumb().await?;

        let url = format!(
            "https://query1.finance.yahoo.com/v10/finance/quoteSummary/{}?modules=price&crumb={}",
            encode(symbol),
            encode(&crumb.crumb)
        );

        let response = self
            .client
            .get(&url)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &crumb.cookie)
            .send()
            .await
            .map_err(|e| {
                MarketDataError::provider(PROVIDER_ID, format!("Price request failed: {}", e))
            })?;

        match response.status() {
            reqwest::StatusCode::UNAUTHORIZED => {
                self.clear_crumb();
                return Err(MarketDataError::provider(
                    PROVIDER_ID,
                    "Yahoo authentication expired",
                ));
            }
            reqwest::StatusCode::NOT_FOUND => {
                return Err(MarketDataError::SymbolNotFound(symbol.to_string()));
            }
            _ => {}
        }

        let data: YahooQuoteSummaryResponse = response.json().await.map_err(|e| {
            MarketDataError::provider(PROVIDER_ID, format!("Failed to parse price response: {}", e))
        })?;

        let price = data
            .into_price()
            .ok_or_else(|| MarketDataError::SymbolNotFound(symbol.to_string()))?;

        Ok(price_to_quote(symbol, price))
    }

    /// Fetch latest quote from the chart API (no previous close available).
    async fn fetch_chart_quote(&self, symbol: &str) -> Result<LatestQuote, MarketDataError> {
        let response = self
            .connector
            .get_latest_quotes(symbol, "1d")
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        let yahoo_quote = response.last_quote().map_err(|e| {
            warn!("No quotes returned for {}: {}", symbol, e);
            MarketDataError::SymbolNotFound(symbol.to_string())
        })?;

        let close = Decimal::from_f64(yahoo_quote.close).ok_or_else(|| {
            MarketDataError::ValidationFailed {
                message: format!("Failed to convert close price {} to Decimal", yahoo_quote.close),
            }
        })?;

        Ok(LatestQuote::new(symbol, Some(close)))
    }
}

// ============================================================================
// MarketDataProvider Implementation
// ============================================================================

#[async_trait]
impl MarketDataProvider for YahooProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    async fn get_latest_quote(&self, symbol: &str) -> Result<LatestQuote, MarketDataError> {
        debug!("Fetching latest quote for {} from Yahoo", symbol);

        match self.fetch_price_summary(symbol).await {
            Ok(quote) => return Ok(quote),
            Err(MarketDataError::SymbolNotFound(s)) => {
                return Err(MarketDataError::SymbolNotFound(s));
            }
            Err(e) => {
                debug!(
                    "Price summary fetch failed for {}: {}, trying chart API",
                    symbol, e
                );
            }
        }

        self.fetch_chart_quote(symbol).await
    }

    async fn get_monthly_closes(
        &self,
        symbol: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HistoricalClose>, MarketDataError> {
        debug!(
            "Fetching monthly closes for {} from {} to {} from Yahoo",
            symbol,
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        );

        let response = self
            .connector
            .get_quote_history_interval(
                symbol,
                chrono_to_offset_datetime(start),
                chrono_to_offset_datetime(end),
                "1mo",
            )
            .await
            .map_err(|e| map_connector_error(symbol, e))?;

        match response.quotes() {
            Ok(yahoo_quotes) => {
                let closes: Vec<HistoricalClose> = yahoo_quotes
                    .into_iter()
                    .filter_map(|q| {
                        let timestamp = Utc.timestamp_opt(q.timestamp as i64, 0).single();
                        let close = Decimal::from_f64(q.close);
                        match (timestamp, close) {
                            (Some(timestamp), Some(close)) => Some(HistoricalClose { timestamp, close }),
                            _ => {
                                warn!("Skipping malformed monthly bar for {}", symbol);
                                None
                            }
                        }
                    })
                    .collect();

                if closes.is_empty() {
                    return Err(MarketDataError::NoDataForRange);
                }
                Ok(closes)
            }
            Err(yahoo::YahooError::NoQuotes) => Err(MarketDataError::NoDataForRange),
            Err(e) => Err(MarketDataError::provider(PROVIDER_ID, e.to_string())),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, MarketDataError> {
        debug!("Searching Yahoo for '{}'", query);

        let result = self
            .connector
            .search_ticker(&encode(query))
            .await
            .map_err(|e| MarketDataError::provider(PROVIDER_ID, e.to_string()))?;

        Ok(result
            .quotes
            .iter()
            .map(|item| {
                let name = if item.long_name.is_empty() {
                    &item.short_name
                } else {
                    &item.long_name
                };
                SearchResult::new(&item.symbol, name, &item.exchange, &item.quote_type)
                    .with_score(item.score)
            })
            .collect())
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn map_connector_error(symbol: &str, e: yahoo::YahooError) -> MarketDataError {
    if matches!(e, yahoo::YahooError::NoQuotes | yahoo::YahooError::NoResult) {
        MarketDataError::SymbolNotFound(symbol.to_string())
    } else {
        MarketDataError::provider(PROVIDER_ID, e.to_string())
    }
}

/// Convert chrono DateTime<Utc> to time::OffsetDateTime for the Yahoo API.
fn chrono_to_offset_datetime(dt: DateTime<Utc>) -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(dt.timestamp()).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

fn raw_decimal(detail: Option<&models::YahooPriceDetail>) -> Option<Decimal> {
    detail.and_then(|d| d.raw).and_then(Decimal::from_f64)
}

fn price_to_quote(symbol: &str, price: YahooPriceData) -> LatestQuote {
    let name = display_name(
        price.short_name.as_deref(),
        price.long_name.as_deref(),
        symbol,
    );
    let mut quote = LatestQuote::new(symbol, raw_decimal(price.regular_market_price.as_ref()))
        .with_short_name(name);
    quote.previous_close = raw_decimal(price.regular_market_previous_close.as_ref());
    quote.currency = price.currency;
    quote
}

/// Short name, then long name, then the symbol; HTML entities unescaped.
fn display_name(short_name: Option<&str>, long_name: Option<&str>, symbol: &str) -> String {
    [short_name, long_name]
        .into_iter()
        .flatten()
        .map(|n| n.trim().replace("&amp;", "&"))
        .find(|n| !n.is_empty())
        .unwrap_or_else(|| symbol.to_string())
}
