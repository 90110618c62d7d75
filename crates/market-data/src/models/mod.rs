//! Market data models
//!
//! - `quote` - Latest quote and historical close structures
//! - `search` - Search result data (SearchResult)

mod quote;
mod search;

pub use quote::{HistoricalClose, LatestQuote};
pub use search::SearchResult;
