pub mod iex;
pub mod overlay;
pub mod provider;
pub mod reload;
pub mod trading_hours;

pub use iex::IexQuoteClient;
pub use overlay::RealTimeOverlay;
pub use provider::{DailyBar, HistoryProvider, ProviderError, QuoteProvider};
pub use reload::{reload_all, ReloadOutcome};
pub use trading_hours::{
    current_session, market_date, next_refresh_instant, session_at, TradingSession, MARKET_TZ,
};
