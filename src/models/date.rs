use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::AppError;

/// Compact trading date: days since 2000-01-01 in two bytes.
///
/// Daily series key arrays are resident for the life of the process, so the
/// key type is kept as small as the supported range allows. Two bytes cover
/// 2000-01-01 through 2179-06-06, which brackets every history span the
/// store loads.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradeDate(u16);

const EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2000, 1, 1) {
    Some(date) => date,
    None => unreachable!(),
};

impl TradeDate {
    /// Calendar form of this date.
    pub fn to_naive(self) -> NaiveDate {
        EPOCH + Duration::days(i64::from(self.0))
    }
}

impl TryFrom<NaiveDate> for TradeDate {
    type Error = AppError;

    fn try_from(date: NaiveDate) -> Result<Self, Self::Error> {
        let days = date.signed_duration_since(EPOCH).num_days();
        if !(0..=i64::from(u16::MAX)).contains(&days) {
            return Err(AppError::InvalidInput(format!(
                "date {} outside the representable range ({} onward)",
                date, EPOCH
            )));
        }
        Ok(TradeDate(days as u16))
    }
}

impl From<TradeDate> for NaiveDate {
    fn from(date: TradeDate) -> Self {
        date.to_naive()
    }
}

impl fmt::Display for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_naive().format("%Y-%m-%d"))
    }
}

impl fmt::Debug for TradeDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TradeDate({})", self)
    }
}

impl Serialize for TradeDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for TradeDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        let date = NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(serde::de::Error::custom)?;
        TradeDate::try_from(date).map_err(serde::de::Error::custom)
    }
}
