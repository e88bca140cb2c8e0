use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Notify;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::constants::{
    QUOTE_DEMAND_WINDOW_SECS, QUOTE_STALE_AFTER_SECS, QUOTE_WAIT_TIMEOUT_SECS, UNOBSERVED_PRICE,
};
use crate::models::QuoteField;
use crate::registry::{InstrumentRegistry, SharedRegistry};
use crate::services::provider::QuoteProvider;

const SYMBOL_TAG: &str = "symbol\":\"";

/// Real-time price layer over the registry.
///
/// Pulls batched quote payloads, scans out per-ticker values, and merges
/// them into each instrument's atomic price scalars. Everything here is
/// best-effort: a failed fetch or an unparseable entry leaves the previous
/// value standing, and consumers tolerate staleness over corruption.
pub struct RealTimeOverlay {
    registry: SharedRegistry,
    provider: Arc<dyn QuoteProvider>,
    /// Unix millis of the last consumer read; 0 until the first one.
    last_demand_ms: AtomicI64,
    /// Unix millis of the last successful merge; 0 until the first one.
    last_merge_ms: AtomicI64,
    merge_notify: Notify,
    demand_notify: Notify,
    fetch_count: AtomicU64,
}

impl RealTimeOverlay {
    pub fn new(registry: SharedRegistry, provider: Arc<dyn QuoteProvider>) -> Self {
        Self {
            registry,
            provider,
            last_demand_ms: AtomicI64::new(0),
            last_merge_ms: AtomicI64::new(0),
            merge_notify: Notify::new(),
            demand_notify: Notify::new(),
            fetch_count: AtomicU64::new(0),
        }
    }

    pub fn registry(&self) -> &InstrumentRegistry {
        &self.registry
    }

    /// Successful quote fetches since startup.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }

    /// Whether any consumer asked for prices inside the demand window.
    /// The quote worker idles when this goes false.
    pub fn demand_active(&self, now: DateTime<Utc>) -> bool {
        let last = self.last_demand_ms.load(Ordering::Relaxed);
        last != 0 && now.timestamp_millis() - last <= QUOTE_DEMAND_WINDOW_SECS * 1000
    }

    /// Resolves when demand is next stamped. A stamp that lands before the
    /// worker starts waiting is kept as a permit, so the wakeup cannot be
    /// lost to the race.
    pub(crate) async fn demand_notified(&self) {
        self.demand_notify.notified().await;
    }

    /// Fetch one batched payload for `ids` and merge the extracted values
    /// into the requested price field. Errors are logged and swallowed.
    pub async fn refresh_last_prices(&self, ids: &[u32], field: QuoteField) {
        let instruments: Vec<_> = ids
            .iter()
            .filter_map(|id| self.registry.get_by_id(*id).ok())
            .collect();
        let tickers: Vec<&str> = instruments.iter().map(|i| i.ticker()).collect();
        if tickers.is_empty() {
            return;
        }

        let payload = match self.provider.fetch_batch_quotes(&tickers, field).await {
            Ok(payload) => payload,
            Err(err) => {
                warn!(
                    field = %field,
                    error = %err,
                    "quote fetch failed, keeping previous prices"
                );
                return;
            }
        };
        self.fetch_count.fetch_add(1, Ordering::Relaxed);

        let mut merged = 0usize;
        for (ticker, value) in extract_quotes(&payload, field.attribute_key()) {
            // Resolve inside the requested batch only; tickers repeat
            // across listings and the first match wins.
            let Some(instrument) = instruments.iter().find(|i| i.ticker() == ticker) else {
                continue;
            };
            match field {
                QuoteField::LastTrade => instrument.set_last_price(value),
                QuoteField::PreviousClose => instrument.set_previous_close(value),
            }
            merged += 1;
        }

        if merged > 0 {
            self.last_merge_ms
                .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
            self.merge_notify.notify_waiters();
        }
        debug!(field = %field, merged, "quote snapshot merged");
    }

    /// Read the requested price field for `ids`, waiting for an imminent
    /// merge when the overlay looks stale.
    ///
    /// The call stamps demand (waking an idle worker), and if no merge
    /// happened recently it blocks until the next one, bounded by the wait
    /// cap so a dead feed degrades into stale-but-served prices. Ids not
    /// in the registry report the unobserved sentinel.
    pub async fn fresh_prices(&self, ids: &[u32], field: QuoteField) -> Vec<(u32, f32)> {
        let now = Utc::now();
        self.last_demand_ms
            .store(now.timestamp_millis(), Ordering::Relaxed);
        self.demand_notify.notify_one();

        let last_merge = self.last_merge_ms.load(Ordering::Relaxed);
        let stale = last_merge == 0
            || now.timestamp_millis() - last_merge > QUOTE_STALE_AFTER_SECS * 1000;
        if stale {
            let wait = Duration::from_secs(QUOTE_WAIT_TIMEOUT_SECS);
            if timeout(wait, self.merge_notify.notified()).await.is_err() {
                debug!(field = %field, "no merge arrived in time, serving stale prices");
            }
        }

        ids.iter()
            .map(|&id| {
                let price = self
                    .registry
                    .get_by_id(id)
                    .map(|i| match field {
                        QuoteField::LastTrade => i.last_price(),
                        QuoteField::PreviousClose => i.previous_close(),
                    })
                    .unwrap_or(UNOBSERVED_PRICE);
                (id, price)
            })
            .collect()
    }
}

/// Scan `(ticker, value)` pairs out of a batched quote payload without
/// parsing it as JSON.
///
/// Each record is located by the `symbol":"` tag; the value is the text
/// between `<attribute>":` and the next `,"`. A truncated record ends the
/// scan, a non-numeric value (nulls, off-hours zero-stripping artifacts)
/// skips that pair only.
fn extract_quotes<'a>(payload: &'a str, attribute_key: &str) -> Vec<(&'a str, f32)> {
    let needle = format!("{}\":", attribute_key);
    let mut pairs = Vec::new();
    let mut cursor = 0usize;

    while cursor < payload.len() {
        let Some(symbol_rel) = payload[cursor..].find(SYMBOL_TAG) else {
            break;
        };
        let ticker_start = cursor + symbol_rel + SYMBOL_TAG.len();
        let Some(ticker_len) = payload[ticker_start..].find('"') else {
            break;
        };
        let ticker = &payload[ticker_start..ticker_start + ticker_len];

        let after_ticker = ticker_start + ticker_len;
        let Some(attr_rel) = payload[after_ticker..].find(&needle) else {
            break;
        };
        let value_start = after_ticker + attr_rel + needle.len();
        let Some(value_len) = payload[value_start..].find(",\"") else {
            break;
        };
        let raw = &payload[value_start..value_start + value_len];
        cursor = value_start + value_len;

        match raw.trim().parse::<f32>() {
            Ok(value) => pairs.push((ticker, value)),
            Err(_) => continue,
        }
    }

    pairs
}
