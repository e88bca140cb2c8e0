use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-day column a series can carry.
///
/// The set is closed so a series can hold its columns in a fixed table
/// indexed by the discriminant instead of a hash map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TickField {
    /// Opening price
    Open,
    /// Highest price
    High,
    /// Lowest price
    Low,
    /// Closing price
    Close,
    /// Split and dividend adjusted closing price
    AdjClose,
    /// Traded share volume
    Volume,
}

impl TickField {
    /// Number of distinct fields; sizes the per-series column table.
    pub const COUNT: usize = 6;

    /// All fields, in discriminant order.
    pub const ALL: [TickField; TickField::COUNT] = [
        TickField::Open,
        TickField::High,
        TickField::Low,
        TickField::Close,
        TickField::AdjClose,
        TickField::Volume,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TickField::Open => "open",
            TickField::High => "high",
            TickField::Low => "low",
            TickField::Close => "close",
            TickField::AdjClose => "adj_close",
            TickField::Volume => "volume",
        }
    }

    /// Slot of this field in a column table.
    pub(crate) fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for TickField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Real-time attribute the overlay can request from the quote provider.
///
/// One attribute per fetch; the overlay only writes the scalar matching the
/// requested attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuoteField {
    /// Price of the most recent trade
    LastTrade,
    /// Prior session's official close
    PreviousClose,
}

impl QuoteField {
    /// Key under which the provider payload carries this attribute.
    pub fn attribute_key(&self) -> &'static str {
        match self {
            QuoteField::LastTrade => "lastSalePrice",
            QuoteField::PreviousClose => "previousClose",
        }
    }
}

impl fmt::Display for QuoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.attribute_key())
    }
}
