//! Store-wide tunables and the built-in instrument set.
//!
//! The refresh calendar itself (session boundaries, wake cutovers) lives in
//! `services::trading_hours` next to the code that interprets it; this module
//! holds the knobs that several modules share.

/// Scalar price meaning "no real-time quote observed yet".
///
/// Both `last_real_time_price` and `previous_close` start here and only ever
/// move to a real quote; consumers can rely on "negative means never seen".
pub const UNOBSERVED_PRICE: f32 = -100.0;

/// Pause before the next refresh cycle when the market-calendar computation
/// fails (1 hour). The worker must always re-arm with something.
pub const FALLBACK_REFRESH_SPAN_SECS: u64 = 3600;

/// Overlay poll cadence during the regular session.
pub const QUOTE_REGULAR_CADENCE_SECS: u64 = 3;

/// Overlay poll cadence during pre/post sessions and overnight.
pub const QUOTE_OFFHOURS_CADENCE_SECS: u64 = 60;

/// The quote worker keeps fetching only while some consumer read a price
/// within this window; otherwise it idles instead of hammering the provider
/// for nobody.
pub const QUOTE_DEMAND_WINDOW_SECS: i64 = 300;

/// A merged quote snapshot older than this counts as stale; `fresh_prices`
/// then waits for the next merge before reading.
pub const QUOTE_STALE_AFTER_SECS: i64 = 80;

/// Upper bound on that wait. Past it, stale values are served as-is.
pub const QUOTE_WAIT_TIMEOUT_SECS: u64 = 90;

/// Built-in tracked instruments: (id, ticker, history span).
///
/// Span strings follow the `HistorySpan` grammar:
///
/// | Form               | Meaning                               |
/// |--------------------|---------------------------------------|
/// | `"5y"`             | trailing five calendar years          |
/// | `"Date: 2010-01-01"` | everything since that fixed date    |
///
/// Ids are stable across restarts; 0 is reserved as the invalid sentinel.
pub const DEFAULT_INSTRUMENTS: &[(u32, &str, &str)] = &[
    (1, "GLD", "5y"),
    (2, "QQQ", "Date: 2010-01-01"),
    (3, "SPY", "Date: 2010-01-01"),
    (4, "TLT", "5y"),
    (5, "VXX", "Date: 2018-01-25"),
    (6, "UNG", "5y"),
    (7, "USO", "5y"),
];
