use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};

use crate::error::Result;
use crate::models::{Instrument, TickField, TradeDate};
use crate::registry::InstrumentRegistry;
use crate::series::{DailySeries, TimeSeries};
use crate::services::provider::{DailyBar, HistoryProvider};
use crate::services::trading_hours::market_date;

/// Per-cycle counters reported by [`reload_all`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReloadOutcome {
    pub refreshed: usize,
    pub failed: usize,
}

/// Refresh every instrument's daily history from `provider`.
///
/// Failures are isolated per instrument: a fetch or validation error is
/// logged, the existing series stays installed, and the pass moves on.
/// The whole cycle therefore always completes and reports how it went.
pub async fn reload_all(
    registry: &InstrumentRegistry,
    provider: &dyn HistoryProvider,
) -> ReloadOutcome {
    let today = market_date(Utc::now());
    let mut outcome = ReloadOutcome::default();

    for instrument in registry.instruments() {
        let start = instrument.span().start_date(today);
        match reload_one(instrument, provider, start, today).await {
            Ok(rows) => {
                outcome.refreshed += 1;
                info!(
                    ticker = instrument.ticker(),
                    rows,
                    start = %start,
                    "daily history replaced"
                );
            }
            Err(err) => {
                outcome.failed += 1;
                warn!(
                    ticker = instrument.ticker(),
                    error = %err,
                    "history refresh failed, keeping existing series"
                );
            }
        }
    }

    outcome
}

async fn reload_one(
    instrument: &Instrument,
    provider: &dyn HistoryProvider,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<usize> {
    let bars = provider
        .fetch_daily_series(instrument.ticker(), start, end)
        .await?;
    let series = build_daily_series(&bars)?;
    let rows = series.len();
    instrument.install_history(Arc::new(series));
    Ok(rows)
}

/// Narrow provider bars into the resident layout: adjusted closes rounded
/// to 4 decimals before the `f32` cast so re-runs produce identical bits,
/// volumes kept whole.
fn build_daily_series(bars: &[DailyBar]) -> Result<DailySeries> {
    let mut dates = Vec::with_capacity(bars.len());
    let mut closes = Vec::with_capacity(bars.len());
    let mut volumes = Vec::with_capacity(bars.len());
    for bar in bars {
        dates.push(TradeDate::try_from(bar.date)?);
        closes.push(round4(bar.adj_close) as f32);
        volumes.push(bar.volume);
    }
    let series = TimeSeries::from_sorted(
        dates,
        vec![(TickField::AdjClose, closes)],
        vec![(TickField::Volume, volumes)],
    )?;
    Ok(series)
}

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}
