use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::QuoteField;

/// One daily bar as delivered by a history provider, before any narrowing
/// or rounding happens on the way into a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("provider returned HTTP {status}")]
    Http { status: u16 },

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Source of daily bar history.
///
/// Bars must come back ascending by date; the series constructor rejects
/// out-of-order payloads, so a misbehaving provider costs one logged,
/// skipped instrument rather than a corrupted lookup table.
#[async_trait]
pub trait HistoryProvider: Send + Sync {
    async fn fetch_daily_series(
        &self,
        ticker: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyBar>, ProviderError>;
}

/// Source of batched real-time quotes.
///
/// Returns the raw response body; extraction stays with the caller so the
/// transport never needs to know which attributes are being read out.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    async fn fetch_batch_quotes(
        &self,
        tickers: &[&str],
        field: QuoteField,
    ) -> Result<String, ProviderError>;
}
