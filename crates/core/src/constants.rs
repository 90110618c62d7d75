use std::time::Duration;

/// How long a fetched quote is served from memory before the provider is asked again.
pub const DEFAULT_QUOTE_CACHE_TTL: Duration = Duration::from_secs(60);

/// Longest ticker accepted when adding a holding.
pub const MAX_TICKER_LEN: usize = 10;

/// Upper bound on tickers per history request.
pub const MAX_HISTORY_TICKERS: usize = 20;

/// Default and maximum lookback for monthly history, in months.
pub const DEFAULT_HISTORY_MONTHS: u32 = 12;
pub const MAX_HISTORY_MONTHS: u32 = 60;

/// Minimum length for a member's new password.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Decimal places kept on every reported percentage.
pub const PERCENT_DECIMALS: u32 = 2;
