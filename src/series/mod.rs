mod columns;
mod time_series;

pub use time_series::{SeriesError, TimeSeries};

use crate::models::{TickField, TradeDate};

/// Daily instantiation held by the registry: compact 2-byte dates,
/// `f32` prices, `u64` share volumes.
pub type DailySeries = TimeSeries<TradeDate, f32, u64>;

/// Empty daily series with the columns every refresh populates, so
/// readers of a not-yet-refreshed instrument see empty slices instead
/// of a missing-column error.
pub fn empty_daily() -> DailySeries {
    TimeSeries::new(&[TickField::AdjClose], &[TickField::Volume])
}
