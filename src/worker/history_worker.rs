use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::sleep;
use tracing::{info, instrument, warn};

use crate::constants::FALLBACK_REFRESH_SPAN_SECS;
use crate::registry::SharedRegistry;
use crate::services::provider::HistoryProvider;
use crate::services::reload::reload_all;
use crate::services::trading_hours::next_refresh_instant;

/// Snapshot of the refresh worker for diagnostics endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshState {
    pub last_refresh_utc: Option<DateTime<Utc>>,
    pub next_wake_utc: Option<DateTime<Utc>>,
    pub cycle_count: u64,
    pub last_refreshed: usize,
    pub last_failed: usize,
}

pub type SharedRefreshState = Arc<RwLock<RefreshState>>;

/// Drive the daily-history refresh on the market-calendar ladder.
///
/// One cycle refreshes every instrument, then the worker sleeps until the
/// next cutover. Because the loop is sequential there is never more than
/// one refresh in flight, and a refresh that overruns a cutover simply
/// starts the next cycle immediately.
#[instrument(skip(registry, provider, state))]
pub async fn run(
    registry: SharedRegistry,
    provider: Arc<dyn HistoryProvider>,
    state: SharedRefreshState,
) {
    info!(
        instruments = registry.len(),
        "Starting history worker - refreshing at market cutovers"
    );

    let mut cycle_count = 0u64;

    loop {
        cycle_count += 1;
        let cycle_start = std::time::Instant::now();

        let outcome = reload_all(&registry, provider.as_ref()).await;

        let now = Utc::now();
        let next_wake = match next_refresh_instant(now) {
            Ok(wake) => wake,
            Err(e) => {
                warn!(
                    cycle = cycle_count,
                    error = %e,
                    fallback_secs = FALLBACK_REFRESH_SPAN_SECS,
                    "History worker: cutover unavailable, using fixed fallback span"
                );
                now + ChronoDuration::seconds(FALLBACK_REFRESH_SPAN_SECS as i64)
            }
        };

        {
            let mut snapshot = state.write().await;
            snapshot.last_refresh_utc = Some(now);
            snapshot.next_wake_utc = Some(next_wake);
            snapshot.cycle_count = cycle_count;
            snapshot.last_refreshed = outcome.refreshed;
            snapshot.last_failed = outcome.failed;
        }

        info!(
            cycle = cycle_count,
            refreshed = outcome.refreshed,
            failed = outcome.failed,
            elapsed_secs = cycle_start.elapsed().as_secs_f64(),
            next_wake = %next_wake,
            "History worker: cycle completed"
        );

        let span = (next_wake - Utc::now()).to_std().unwrap_or(Duration::ZERO);
        sleep(span).await;
    }
}
