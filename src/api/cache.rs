use std::time::Duration;

use moka::future::Cache;

use crate::models::Quote;

pub const QUOTE_TTL: Duration = Duration::from_secs(60);

const MAX_CACHED_QUOTES: u64 = 512;

#[derive(Clone)]
pub struct QuoteCache {
    quotes: Cache<String, Quote>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            quotes: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(MAX_CACHED_QUOTES)
                .build(),
        }
    }

    pub async fn get(&self, symbol: &str) -> Option<Quote> {
        self.quotes.get(symbol).await
    }

    pub async fn put(&self, quote: Quote) {
        self.quotes.insert(quote.symbol().clone(), quote).await;
    }

    pub fn clear(&self) {
        self.quotes.invalidate_all();
    }
}

impl Default for QuoteCache {
    fn default() -> Self {
        Self::new(QUOTE_TTL)
    }
}
