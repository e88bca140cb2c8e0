//! In-memory daily market data with a real-time price overlay.
//!
//! The crate keeps a small universe of instruments resident: each one owns
//! a columnar daily series (compact dates, `f32` adjusted closes, `u64`
//! volumes) that a background worker rebuilds from a [`services::HistoryProvider`]
//! at market-calendar cutovers, plus a pair of atomic price scalars that the
//! quote worker merges batched provider payloads into while consumers are
//! watching. Readers never block writers; a refresh swaps a new series in
//! behind an `Arc` and in-flight readers finish on the old one.

pub mod constants;
pub mod error;
pub mod models;
pub mod registry;
pub mod series;
pub mod services;
pub mod worker;

pub use error::{AppError, Result};
pub use models::{HistorySpan, Instrument, InstrumentSpec, QuoteField, TickField, TradeDate};
pub use registry::{InstrumentRegistry, SharedRegistry};
pub use series::{DailySeries, SeriesError, TimeSeries};
pub use services::{IexQuoteClient, RealTimeOverlay};
pub use worker::{RefreshState, SharedRefreshState};

/// Install the global tracing subscriber, honoring `RUST_LOG` and defaulting
/// to `info`.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();
}
