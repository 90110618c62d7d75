use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use futures::future::join_all;
use log::{debug, info, warn};
use rust_decimal::Decimal;

use super::holdings_model::{
    ClosedHoldingView, Holding, HoldingDraft, HoldingType, NewHolding, OpenHoldingView,
    PortfolioPoint, TickerMatch,
};
use super::holdings_returns::{average_pct, daily_pct, realized_pct, signed_move, total_pct};
use super::holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
use crate::constants::{MAX_HISTORY_MONTHS, MAX_HISTORY_TICKERS, MAX_TICKER_LEN};
use crate::errors::{Error, Result, ValidationError};
use crate::quotes::{month_label, LatestQuote, MonthlyClose, QuoteServiceTrait};

pub struct HoldingsService {
    holding_repo: Arc<dyn HoldingRepositoryTrait>,
    quote_service: Arc<dyn QuoteServiceTrait>,
}

impl HoldingsService {
    pub fn new(
        holding_repo: Arc<dyn HoldingRepositoryTrait>,
        quote_service: Arc<dyn QuoteServiceTrait>,
    ) -> Self {
        Self {
            holding_repo,
            quote_service,
        }
    }

    /// Loads a holding and checks that `user_id` owns it.
    fn owned_holding(&self, user_id: i32, holding_id: i32) -> Result<Holding> {
        let holding = self
            .holding_repo
            .get_holding(holding_id)?
            .ok_or_else(|| Error::NotFound("Holding not found".to_string()))?;
        if holding.user_id != user_id {
            warn!(
                "User {} attempted to modify holding {} owned by user {}",
                user_id, holding_id, holding.user_id
            );
            return Err(Error::Forbidden("Forbidden: not your holding".to_string()));
        }
        Ok(holding)
    }

    fn open_view(holding: Holding, quote: Option<LatestQuote>) -> OpenHoldingView {
        let (current_price, previous_close) = match quote {
            Some(q) => (q.current_price, q.previous_close),
            None => (None, None),
        };
        OpenHoldingView {
            daily_pct: daily_pct(holding.position, current_price, previous_close),
            total_pct: total_pct(holding.position, holding.purchase_price, current_price),
            id: holding.id,
            ticker: holding.ticker,
            name: holding.name,
            holding_type: holding.holding_type,
            position: holding.position,
            purchase_price: holding.purchase_price,
            current_price,
            previous_close,
            created_at: holding.created_at,
        }
    }

    fn closed_view(holding: Holding) -> Result<ClosedHoldingView> {
        let (close_price, closed_at) = match (holding.close_price, holding.closed_at) {
            (Some(price), Some(at)) => (price, at),
            _ => {
                return Err(Error::Unexpected(format!(
                    "Holding {} is marked closed without a close price",
                    holding.id
                )))
            }
        };
        Ok(ClosedHoldingView {
            realized_pct: realized_pct(holding.position, holding.purchase_price, close_price),
            id: holding.id,
            ticker: holding.ticker,
            name: holding.name,
            holding_type: holding.holding_type,
            position: holding.position,
            purchase_price: holding.purchase_price,
            close_price,
            closed_at,
        })
    }

    fn validate_months(months: u32) -> Result<u32> {
        if months == 0 || months > MAX_HISTORY_MONTHS {
            return Err(Error::invalid_input(format!(
                "months must be between 1 and {}",
                MAX_HISTORY_MONTHS
            )));
        }
        Ok(months)
    }
}

/// Trims, upper-cases and de-duplicates tickers, keeping first-seen order.
pub fn normalize_tickers(tickers: &[String]) -> Vec<String> {
    let mut seen = Vec::new();
    for ticker in tickers {
        let ticker = ticker.trim().to_uppercase();
        if !ticker.is_empty() && !seen.contains(&ticker) {
            seen.push(ticker);
        }
    }
    seen
}

#[async_trait]
impl HoldingsServiceTrait for HoldingsService {
    async fn list_open_holdings(&self, user_id: i32) -> Result<Vec<OpenHoldingView>> {
        let holdings = self.holding_repo.list_open_holdings(user_id)?;
        debug!(
            "Valuing {} open holdings for user {}",
            holdings.len(),
            user_id
        );

        let quotes = join_all(
            holdings
                .iter()
                .map(|h| self.quote_service.get_quote(&h.ticker)),
        )
        .await;

        Ok(holdings
            .into_iter()
            .zip(quotes)
            .map(|(holding, quote)| Self::open_view(holding, quote))
            .collect())
    }

    fn list_closed_holdings(&self, user_id: i32) -> Result<Vec<ClosedHoldingView>> {
        self.holding_repo
            .list_closed_holdings(user_id)?
            .into_iter()
            .map(Self::closed_view)
            .collect()
    }

    async fn add_holding(&self, user_id: i32, new_holding: NewHolding) -> Result<Holding> {
        let ticker = new_holding.ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(ValidationError::MissingField("ticker".to_string()).into());
        }
        if ticker.chars().count() > MAX_TICKER_LEN {
            return Err(Error::invalid_input(format!(
                "ticker must be at most {} characters",
                MAX_TICKER_LEN
            )));
        }
        if new_holding.purchase_price <= Decimal::ZERO {
            return Err(Error::invalid_input(
                "purchase_price must be a positive number",
            ));
        }

        let quote = match self.quote_service.get_quote(&ticker).await {
            Some(q) if q.current_price.is_some() => q,
            _ => {
                return Err(Error::invalid_input(
                    "Ticker not found or has no price data",
                ))
            }
        };
        let name = match quote.short_name.trim() {
            "" => ticker.clone(),
            short_name => short_name.to_string(),
        };

        let holding = self
            .holding_repo
            .insert_holding(HoldingDraft {
                user_id,
                ticker,
                name,
                holding_type: new_holding.holding_type,
                position: new_holding.position,
                purchase_price: new_holding.purchase_price,
                created_at: Utc::now(),
            })
            .await?;
        info!(
            "User {} opened {} {} position {} at {}",
            user_id, holding.position, holding.ticker, holding.id, holding.purchase_price
        );
        Ok(holding)
    }

    async fn delete_holding(&self, user_id: i32, holding_id: i32) -> Result<()> {
        self.owned_holding(user_id, holding_id)?;
        let deleted = self.holding_repo.delete_holding(holding_id).await?;
        if deleted == 0 {
            return Err(Error::NotFound("Holding not found".to_string()));
        }
        info!("User {} deleted holding {}", user_id, holding_id);
        Ok(())
    }

    async fn close_holding(
        &self,
        user_id: i32,
        holding_id: i32,
        close_price: Decimal,
    ) -> Result<ClosedHoldingView> {
        let holding = self.owned_holding(user_id, holding_id)?;
        if close_price <= Decimal::ZERO {
            return Err(Error::invalid_input("close_price must be a positive number"));
        }
        if !holding.is_open() {
            return Err(Error::ConstraintViolation(
                "Holding is already closed".to_string(),
            ));
        }

        let closed = self
            .holding_repo
            .close_holding(holding_id, close_price, Utc::now())
            .await?;
        info!(
            "User {} closed holding {} at {}",
            user_id, holding_id, close_price
        );
        Self::closed_view(closed)
    }

    async fn search_tickers(&self, query: &str) -> Result<Vec<TickerMatch>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Error::invalid_input("Search query is required"));
        }

        let results = self.quote_service.search(query).await?;
        Ok(results
            .into_iter()
            .filter_map(|r| {
                HoldingType::from_provider_type(&r.asset_type).map(|holding_type| TickerMatch {
                    symbol: r.symbol,
                    name: r.name,
                    exchange: r.exchange,
                    holding_type,
                })
            })
            .collect())
    }

    async fn ticker_history(
        &self,
        tickers: &[String],
        months: u32,
    ) -> Result<BTreeMap<String, Vec<MonthlyClose>>> {
        let months = Self::validate_months(months)?;
        let tickers = normalize_tickers(tickers);
        if tickers.is_empty() {
            return Err(Error::invalid_input("tickers query parameter is required"));
        }
        if tickers.len() > MAX_HISTORY_TICKERS {
            return Err(Error::invalid_input(format!(
                "At most {} tickers per request",
                MAX_HISTORY_TICKERS
            )));
        }

        let histories = join_all(
            tickers
                .iter()
                .map(|t| self.quote_service.get_monthly_history(t, months)),
        )
        .await;

        Ok(tickers.into_iter().zip(histories).collect())
    }

    async fn portfolio_history(&self, user_id: i32, months: u32) -> Result<Vec<PortfolioPoint>> {
        let months = Self::validate_months(months)?;
        let holdings = self.holding_repo.list_open_holdings(user_id)?;
        if holdings.is_empty() {
            return Ok(Vec::new());
        }

        let tickers: Vec<String> =
            normalize_tickers(&holdings.iter().map(|h| h.ticker.clone()).collect::<Vec<_>>());
        let closes = join_all(
            tickers
                .iter()
                .map(|t| self.quote_service.get_monthly_closes(t, months)),
        )
        .await;
        let closes_by_ticker: HashMap<String, _> = tickers.into_iter().zip(closes).collect();

        // (year, month) -> (label, per-holding returns)
        let mut buckets: BTreeMap<(i32, u32), (String, Vec<Decimal>)> = BTreeMap::new();
        for holding in &holdings {
            let opened = (holding.created_at.year(), holding.created_at.month());
            let Some(closes) = closes_by_ticker.get(&holding.ticker) else {
                continue;
            };
            for close in closes {
                let key = (close.timestamp.year(), close.timestamp.month());
                if key < opened {
                    continue;
                }
                if let Some(ret) = signed_move(holding.position, holding.purchase_price, close.close)
                {
                    buckets
                        .entry(key)
                        .or_insert_with(|| (month_label(&close.timestamp), Vec::new()))
                        .1
                        .push(ret);
                }
            }
        }

        Ok(buckets
            .into_values()
            .filter_map(|(month, returns)| {
                average_pct(&returns).map(|portfolio_return| PortfolioPoint {
                    month,
                    portfolio_return,
                })
            })
            .collect())
    }
}
