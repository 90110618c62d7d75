use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::holdings_model::{
    ClosedHoldingView, Holding, HoldingDraft, NewHolding, OpenHoldingView, PortfolioPoint,
    TickerMatch,
};
use crate::errors::Result;
use crate::quotes::MonthlyClose;

/// Trait for holding repository operations
#[async_trait]
pub trait HoldingRepositoryTrait: Send + Sync {
    /// Open holdings of a member, newest first.
    fn list_open_holdings(&self, user_id: i32) -> Result<Vec<Holding>>;
    /// Closed holdings of a member, most recently closed first.
    fn list_closed_holdings(&self, user_id: i32) -> Result<Vec<Holding>>;
    fn get_holding(&self, holding_id: i32) -> Result<Option<Holding>>;
    async fn insert_holding(&self, draft: HoldingDraft) -> Result<Holding>;
    async fn delete_holding(&self, holding_id: i32) -> Result<usize>;
    async fn close_holding(
        &self,
        holding_id: i32,
        close_price: Decimal,
        closed_at: DateTime<Utc>,
    ) -> Result<Holding>;
}

/// Trait for holdings service operations
#[async_trait]
pub trait HoldingsServiceTrait: Send + Sync {
    async fn list_open_holdings(&self, user_id: i32) -> Result<Vec<OpenHoldingView>>;
    fn list_closed_holdings(&self, user_id: i32) -> Result<Vec<ClosedHoldingView>>;
    async fn add_holding(&self, user_id: i32, new_holding: NewHolding) -> Result<Holding>;
    async fn delete_holding(&self, user_id: i32, holding_id: i32) -> Result<()>;
    async fn close_holding(
        &self,
        user_id: i32,
        holding_id: i32,
        close_price: Decimal,
    ) -> Result<ClosedHoldingView>;
    async fn search_tickers(&self, query: &str) -> Result<Vec<TickerMatch>>;
    async fn ticker_history(
        &self,
        tickers: &[String],
        months: u32,
    ) -> Result<BTreeMap<String, Vec<MonthlyClose>>>;
    async fn portfolio_history(&self, user_id: i32, months: u32) -> Result<Vec<PortfolioPoint>>;
}
