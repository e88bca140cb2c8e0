use chrono::{DateTime, Days, LocalResult, NaiveDate, NaiveTime, TimeZone, Timelike, Utc};
use chrono_tz::America::New_York;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{AppError, Result};

/// Exchange timezone for US equities. All session boundaries and refresh
/// cutovers are defined in this zone, so DST shifts move them in UTC.
pub const MARKET_TZ: Tz = New_York;

// Session boundaries, seconds since local midnight.
const SESSION_PRE_OPEN_SECS: u32 = 4 * 3600; // 04:00 pre-market open
const SESSION_REGULAR_OPEN_SECS: u32 = 9 * 3600 + 30 * 60; // 09:30 regular open
const SESSION_REGULAR_CLOSE_SECS: u32 = 16 * 3600; // 16:00 regular close
const SESSION_POST_CLOSE_SECS: u32 = 20 * 3600; // 20:00 post-market close

// History refresh cutovers, seconds since local midnight.
const REFRESH_PRE_OPEN_SECS: u32 = 4 * 3600; // 04:00 pick up overnight corrections
const REFRESH_LAST_CORRECTION_SECS: u32 = 9 * 3600; // 09:00 last pre-open correction pass
const REFRESH_POST_CLOSE_SECS: u32 = 16 * 3600 + 30 * 60; // 16:30 settled closing prices

/// Phase of the US equity trading day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradingSession {
    PreMarket,
    Regular,
    PostMarket,
    Closed,
}

impl TradingSession {
    pub fn as_str(&self) -> &'static str {
        match self {
            TradingSession::PreMarket => "pre-market",
            TradingSession::Regular => "regular",
            TradingSession::PostMarket => "post-market",
            TradingSession::Closed => "closed",
        }
    }
}

impl fmt::Display for TradingSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Classify an instant against the extended-hours session ladder
/// (04:00 / 09:30 / 16:00 / 20:00 ET). Weekends are not special-cased;
/// quote payloads simply stop moving when the venue is closed.
pub fn session_at(utc: DateTime<Utc>) -> TradingSession {
    let secs = utc.with_timezone(&MARKET_TZ).num_seconds_from_midnight();
    if secs < SESSION_PRE_OPEN_SECS {
        TradingSession::Closed
    } else if secs < SESSION_REGULAR_OPEN_SECS {
        TradingSession::PreMarket
    } else if secs < SESSION_REGULAR_CLOSE_SECS {
        TradingSession::Regular
    } else if secs < SESSION_POST_CLOSE_SECS {
        TradingSession::PostMarket
    } else {
        TradingSession::Closed
    }
}

/// Current session, by the wall clock.
pub fn current_session() -> TradingSession {
    session_at(Utc::now())
}

/// Calendar date at the exchange. Used for refresh windows and for the
/// once-a-day previous-close pass, both of which roll over at ET midnight
/// rather than UTC midnight.
pub fn market_date(utc: DateTime<Utc>) -> NaiveDate {
    utc.with_timezone(&MARKET_TZ).date_naive()
}

/// Next instant the daily history should be refreshed.
///
/// Strictly after `now_utc`: before 04:00 ET the answer is 04:00 today,
/// before 09:00 it is 09:00, before 16:30 it is 16:30, and any later time
/// rolls to 04:00 the next day. Returns an error if the target local time
/// cannot be mapped to a single UTC instant; callers fall back to a fixed
/// span so scheduling never stops.
pub fn next_refresh_instant(now_utc: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let local = now_utc.with_timezone(&MARKET_TZ);
    let now_secs = local.num_seconds_from_midnight();

    let (days_ahead, target_secs) = if now_secs < REFRESH_PRE_OPEN_SECS {
        (0, REFRESH_PRE_OPEN_SECS)
    } else if now_secs < REFRESH_LAST_CORRECTION_SECS {
        (0, REFRESH_LAST_CORRECTION_SECS)
    } else if now_secs < REFRESH_POST_CLOSE_SECS {
        (0, REFRESH_POST_CLOSE_SECS)
    } else {
        (1, REFRESH_PRE_OPEN_SECS)
    };

    let date = local.date_naive() + Days::new(days_ahead);
    let time = NaiveTime::from_num_seconds_from_midnight_opt(target_secs, 0).ok_or_else(|| {
        AppError::Scheduling(format!("invalid cutover offset {}s", target_secs))
    })?;

    match MARKET_TZ.from_local_datetime(&date.and_time(time)) {
        LocalResult::Single(wake) => Ok(wake.with_timezone(&Utc)),
        LocalResult::Ambiguous(..) | LocalResult::None => Err(AppError::Scheduling(format!(
            "cutover {} {} is ambiguous or nonexistent in {}",
            date, time, MARKET_TZ
        ))),
    }
}
