//! Quote lookups against the market-data provider.
//!
//! - [`cache`] - Time-bounded in-memory cache of latest quotes
//! - [`model`] - Monthly close points used by history charts
//! - [`service`] - Quote service combining the cache and the provider

pub mod cache;
pub mod model;
pub mod service;

pub use alphasigma_market_data::{LatestQuote, MarketDataError, SearchResult};
pub use cache::QuoteCache;
pub use model::{month_label, MonthlyClose};
pub use service::{QuoteService, QuoteServiceTrait};
