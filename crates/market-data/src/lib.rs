//! Alpha Sigma Market Data Crate
//!
//! This crate fetches quotes from third-party market data providers for the
//! Alpha Sigma portfolio tracker.
//!
//! # Overview
//!
//! The market data crate supports:
//! - Latest quotes with the previous session close and a display name
//! - Monthly closing prices for charting portfolio history
//! - Ticker search restricted to what the provider exposes
//!
//! # Architecture
//!
//! ```text
//! +------------------+     +----------------------+     +-----------------+
//! |   Core services  | --> |  MarketDataProvider  | --> |  Yahoo Finance  |
//! +------------------+     +----------------------+     +-----------------+
//!                                    |
//!                                    v
//!                     LatestQuote / HistoricalClose / SearchResult
//! ```
//!
//! Quotes are cached by the core crate, which wraps providers with a
//! time-bounded cache.

pub mod errors;
pub mod models;
pub mod provider;

pub use errors::MarketDataError;
pub use models::{HistoricalClose, LatestQuote, SearchResult};
pub use provider::yahoo::YahooProvider;
pub use provider::MarketDataProvider;
