//! Holdings module - position lifecycle and valuation.

mod holdings_model;
pub mod holdings_returns;
mod holdings_service;
mod holdings_traits;


pub use holdings_model::{
    ClosedHoldingView, Holding, HoldingDraft, HoldingType, NewHolding, OpenHoldingView,
    PortfolioPoint, PositionSide, TickerMatch,
};
pub use holdings_service::{normalize_tickers, HoldingsService};
pub use holdings_traits::{HoldingRepositoryTrait, HoldingsServiceTrait};
