use chrono::{Months, NaiveDate};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use crate::constants::{DEFAULT_INSTRUMENTS, UNOBSERVED_PRICE};
use crate::error::AppError;
use crate::models::{TickField, TradeDate};
use crate::series::{empty_daily, DailySeries};

/// How much daily history an instrument's refresh must load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HistorySpan {
    /// A trailing window of calendar years.
    Years(u32),
    /// Everything since a fixed start date.
    From(NaiveDate),
}

impl HistorySpan {
    /// First date the provider should be asked for, relative to `today`.
    pub fn start_date(&self, today: NaiveDate) -> NaiveDate {
        match self {
            HistorySpan::Years(years) => today - Months::new(12 * years),
            HistorySpan::From(date) => *date,
        }
    }
}

impl FromStr for HistorySpan {
    type Err = AppError;

    /// Accepts `"5y"` or `"Date: 2010-01-01"`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        if let Some(years) = raw.strip_suffix('y') {
            let years = years
                .trim()
                .parse::<u32>()
                .map_err(|_| AppError::InvalidInput(format!("bad history span: {}", raw)))?;
            return Ok(HistorySpan::Years(years));
        }
        if let Some(date) = raw.strip_prefix("Date:") {
            let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
                .map_err(|_| AppError::InvalidInput(format!("bad history span: {}", raw)))?;
            return Ok(HistorySpan::From(date));
        }
        Err(AppError::InvalidInput(format!("bad history span: {}", raw)))
    }
}

impl fmt::Display for HistorySpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistorySpan::Years(years) => write!(f, "{}y", years),
            HistorySpan::From(date) => write!(f, "Date: {}", date.format("%Y-%m-%d")),
        }
    }
}

/// Static configuration entry for one tracked instrument.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstrumentSpec {
    pub id: u32,
    pub ticker: String,
    pub span: HistorySpan,
}

impl InstrumentSpec {
    pub fn new(id: u32, ticker: impl Into<String>, span: HistorySpan) -> Self {
        Self {
            id,
            ticker: ticker.into(),
            span,
        }
    }

    /// The built-in instrument set.
    pub fn defaults() -> Vec<InstrumentSpec> {
        DEFAULT_INSTRUMENTS
            .iter()
            .map(|&(id, ticker, span)| {
                let span = span.parse().expect("built-in history span is well-formed");
                InstrumentSpec::new(id, ticker, span)
            })
            .collect()
    }
}

/// One tracked security and its resident market data.
///
/// The daily series is replaced wholesale by the refresh worker and the
/// scalar quote fields are written by the overlay; readers take an `Arc` of
/// the series and then work on plain slices with no lock held. A published
/// series is never mutated, only swapped out.
pub struct Instrument {
    id: u32,
    ticker: String,
    span: HistorySpan,
    history: RwLock<Arc<DailySeries>>,
    last_price_bits: AtomicU32,
    previous_close_bits: AtomicU32,
}

impl Instrument {
    pub(crate) fn new(spec: InstrumentSpec) -> Self {
        Self {
            id: spec.id,
            ticker: spec.ticker,
            span: spec.span,
            history: RwLock::new(Arc::new(empty_daily())),
            last_price_bits: AtomicU32::new(UNOBSERVED_PRICE.to_bits()),
            previous_close_bits: AtomicU32::new(UNOBSERVED_PRICE.to_bits()),
        }
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn span(&self) -> HistorySpan {
        self.span
    }

    /// Current daily history. The handle stays valid and immutable across
    /// concurrent refreshes.
    pub fn history(&self) -> Arc<DailySeries> {
        self.history.read().clone()
    }

    pub(crate) fn install_history(&self, series: Arc<DailySeries>) {
        *self.history.write() = series;
    }

    /// Last real-time trade price; `UNOBSERVED_PRICE` until the overlay has
    /// merged one.
    pub fn last_price(&self) -> f32 {
        f32::from_bits(self.last_price_bits.load(Ordering::Relaxed))
    }

    pub(crate) fn set_last_price(&self, price: f32) {
        self.last_price_bits.store(price.to_bits(), Ordering::Relaxed);
    }

    /// Prior session's close as reported by the quote provider; same
    /// sentinel convention as `last_price`.
    pub fn previous_close(&self) -> f32 {
        f32::from_bits(self.previous_close_bits.load(Ordering::Relaxed))
    }

    pub(crate) fn set_previous_close(&self, price: f32) {
        self.previous_close_bits.store(price.to_bits(), Ordering::Relaxed);
    }

    /// Adjusted close of the latest stored trading day strictly before
    /// `date`. Resolves "yesterday's close" even when `date` itself already
    /// has a row from an intraday fetch.
    pub fn last_close_before(&self, date: TradeDate) -> Option<(TradeDate, f32)> {
        let history = self.history();
        let mut index = history.index_of_key_or_before(&date)?;
        let keys = history.keys();
        if keys[index] == date {
            index = index.checked_sub(1)?;
        }
        let closes = history.values(TickField::AdjClose).ok()?;
        Some((keys[index], closes[index]))
    }
}

impl fmt::Debug for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instrument")
            .field("id", &self.id)
            .field("ticker", &self.ticker)
            .field("span", &self.span)
            .field("history_len", &self.history.read().len())
            .field("last_price", &self.last_price())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::series::TimeSeries;

    fn trade_date(y: i32, m: u32, d: u32) -> TradeDate {
        TradeDate::try_from(NaiveDate::from_ymd_opt(y, m, d).unwrap()).unwrap()
    }

    fn instrument() -> Instrument {
        Instrument::new(InstrumentSpec::new(3, "SPY", HistorySpan::Years(5)))
    }

    #[test]
    fn test_history_span_parsing() {
        assert_eq!("5y".parse::<HistorySpan>().unwrap(), HistorySpan::Years(5));
        assert_eq!(
            "Date: 2010-01-01".parse::<HistorySpan>().unwrap(),
            HistorySpan::From(NaiveDate::from_ymd_opt(2010, 1, 1).unwrap())
        );
        assert!("next tuesday".parse::<HistorySpan>().is_err());
        assert!("y".parse::<HistorySpan>().is_err());
        assert!("Date: 01/01/2010".parse::<HistorySpan>().is_err());
    }

    #[test]
    fn test_history_span_display_round_trips() {
        for raw in ["5y", "Date: 2018-01-25"] {
            let span = raw.parse::<HistorySpan>().unwrap();
            assert_eq!(span.to_string(), raw);
        }
    }

    #[test]
    fn test_start_date_for_trailing_years() {
        let today = NaiveDate::from_ymd_opt(2020, 6, 3).unwrap();
        assert_eq!(
            HistorySpan::Years(5).start_date(today),
            NaiveDate::from_ymd_opt(2015, 6, 3).unwrap()
        );
    }

    #[test]
    fn test_start_date_for_fixed_date() {
        let today = NaiveDate::from_ymd_opt(2020, 6, 3).unwrap();
        let since = NaiveDate::from_ymd_opt(2010, 1, 1).unwrap();
        assert_eq!(HistorySpan::From(since).start_date(today), since);
    }

    #[test]
    fn test_prices_start_at_the_sentinel() {
        let ins = instrument();
        assert_eq!(ins.last_price(), crate::constants::UNOBSERVED_PRICE);
        assert_eq!(ins.previous_close(), crate::constants::UNOBSERVED_PRICE);
    }

    #[test]
    fn test_price_bits_round_trip() {
        let ins = instrument();
        ins.set_last_price(304.82);
        ins.set_previous_close(301.5);
        assert_eq!(ins.last_price(), 304.82);
        assert_eq!(ins.previous_close(), 301.5);
    }

    #[test]
    fn test_install_history_swaps_the_handle() {
        let ins = instrument();
        let before = ins.history();
        assert!(before.is_empty());

        let series = TimeSeries::from_sorted(
            vec![trade_date(2020, 6, 1)],
            vec![(TickField::AdjClose, vec![300.0])],
            vec![(TickField::Volume, vec![1_000])],
        )
        .unwrap();
        ins.install_history(Arc::new(series));

        let after = ins.history();
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.len(), 1);
        // The old handle still reads the old data.
        assert!(before.is_empty());
    }

    #[test]
    fn test_last_close_before_skips_the_query_day() {
        let ins = instrument();
        let days = [
            trade_date(2020, 6, 1),
            trade_date(2020, 6, 2),
            trade_date(2020, 6, 3),
        ];
        let series = TimeSeries::from_sorted(
            days.to_vec(),
            vec![(TickField::AdjClose, vec![100.0, 101.0, 102.0])],
            vec![(TickField::Volume, vec![10, 11, 12])],
        )
        .unwrap();
        ins.install_history(Arc::new(series));

        // Exact hit steps back one trading day.
        assert_eq!(
            ins.last_close_before(trade_date(2020, 6, 3)),
            Some((days[1], 101.0))
        );
        // A date with no row (weekend) resolves to the prior day.
        assert_eq!(
            ins.last_close_before(trade_date(2020, 6, 6)),
            Some((days[2], 102.0))
        );
        // Nothing stored before the first day.
        assert_eq!(ins.last_close_before(days[0]), None);
        assert_eq!(ins.last_close_before(trade_date(2020, 5, 1)), None);
    }
}
