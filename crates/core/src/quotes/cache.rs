//! In-memory latest-quote cache.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use alphasigma_market_data::LatestQuote;
use log::warn;

use crate::constants::DEFAULT_QUOTE_CACHE_TTL;

struct Entry {
    quote: LatestQuote,
    fetched_at: Instant,
}

/// Latest quotes keyed by normalized ticker, each valid for `ttl` after it was stored.
pub struct QuoteCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(DEFAULT_QUOTE_CACHE_TTL)
    }
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Normalizes a ticker into its cache key.
    pub fn key(ticker: &str) -> String {
        ticker.trim().to_uppercase()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Quote cache mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Returns the cached quote while it is still fresh. Stale entries are evicted.
    pub fn get(&self, ticker: &str) -> Option<LatestQuote> {
        let key = Self::key(ticker);
        let mut entries = self.lock();
        match entries.get(&key) {
            Some(entry) if entry.fetched_at.elapsed() < self.ttl => Some(entry.quote.clone()),
            Some(_) => {
                entries.remove(&key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, ticker: &str, quote: LatestQuote) {
        let entry = Entry {
            quote,
            fetched_at: Instant::now(),
        };
        self.lock().insert(Self::key(ticker), entry);
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}
