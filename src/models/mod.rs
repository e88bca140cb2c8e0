mod date;
mod field;
mod instrument;

pub use date::TradeDate;
pub use field::{QuoteField, TickField};
pub use instrument::{HistorySpan, Instrument, InstrumentSpec};
