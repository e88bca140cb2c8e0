use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::constants::{QUOTE_OFFHOURS_CADENCE_SECS, QUOTE_REGULAR_CADENCE_SECS};
use crate::models::QuoteField;
use crate::services::overlay::RealTimeOverlay;
use crate::services::trading_hours::{market_date, session_at, TradingSession};

/// Drive the real-time quote overlay.
///
/// The loop only spends provider calls while somebody is reading prices:
/// with no demand inside the window it parks until the next consumer
/// stamps one. While active it merges last trades on a fast cadence during
/// regular hours and a slow one otherwise, and refreshes previous closes
/// once per exchange day.
#[instrument(skip(overlay))]
pub async fn run(overlay: Arc<RealTimeOverlay>) {
    info!(
        regular_cadence_secs = QUOTE_REGULAR_CADENCE_SECS,
        offhours_cadence_secs = QUOTE_OFFHOURS_CADENCE_SECS,
        "Starting quote worker - demand-gated overlay refresh"
    );

    let mut iteration_count = 0u64;
    let mut previous_close_day: Option<NaiveDate> = None;

    loop {
        let now = Utc::now();
        if !overlay.demand_active(now) {
            debug!(
                iteration = iteration_count,
                "Quote worker: no recent consumers, parking"
            );
            overlay.demand_notified().await;
            continue;
        }

        iteration_count += 1;
        let ids = overlay.registry().ids();

        let market_day = market_date(now);
        if previous_close_day != Some(market_day) {
            overlay
                .refresh_last_prices(&ids, QuoteField::PreviousClose)
                .await;
            previous_close_day = Some(market_day);
            info!(
                iteration = iteration_count,
                market_day = %market_day,
                "Quote worker: previous closes refreshed"
            );
        }

        overlay.refresh_last_prices(&ids, QuoteField::LastTrade).await;

        let session = session_at(Utc::now());
        let cadence = if session == TradingSession::Regular {
            QUOTE_REGULAR_CADENCE_SECS
        } else {
            QUOTE_OFFHOURS_CADENCE_SECS
        };
        debug!(
            iteration = iteration_count,
            session = %session,
            cadence_secs = cadence,
            "Quote worker: merge pass completed"
        );
        sleep(Duration::from_secs(cadence)).await;
    }
}
