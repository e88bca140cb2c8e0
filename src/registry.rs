use std::mem;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Instrument, InstrumentSpec};

/// Shared handle passed to workers and read-side consumers.
pub type SharedRegistry = Arc<InstrumentRegistry>;

/// Catalog of tracked instruments.
///
/// The set is fixed at construction: workers hold `&Instrument` borrows
/// and per-instrument state swaps happen inside each entry, so the vector
/// itself never moves. Lookups are linear scans, which is the right trade
/// at the tens of entries this catalog holds.
pub struct InstrumentRegistry {
    instruments: Vec<Instrument>,
}

impl InstrumentRegistry {
    /// Build the catalog from specs, rejecting reserved or duplicate ids.
    pub fn from_specs(specs: Vec<InstrumentSpec>) -> Result<Self> {
        let mut instruments: Vec<Instrument> = Vec::with_capacity(specs.len());
        for spec in specs {
            if spec.id == 0 {
                return Err(AppError::InvalidInput(format!(
                    "instrument id 0 is reserved ({})",
                    spec.ticker
                )));
            }
            if instruments.iter().any(|i| i.id() == spec.id) {
                return Err(AppError::InvalidInput(format!(
                    "duplicate instrument id {}",
                    spec.id
                )));
            }
            instruments.push(Instrument::new(spec));
        }
        Ok(Self { instruments })
    }

    /// Catalog of the built-in tracked universe.
    pub fn with_defaults() -> Self {
        Self::from_specs(InstrumentSpec::defaults())
            .expect("built-in instrument list is valid")
    }

    pub fn len(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    pub fn instruments(&self) -> &[Instrument] {
        &self.instruments
    }

    /// Ids in registry order, for batched quote refreshes.
    pub fn ids(&self) -> Vec<u32> {
        self.instruments.iter().map(|i| i.id()).collect()
    }

    pub fn get_by_id(&self, id: u32) -> Result<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("instrument id {} is not tracked", id)))
    }

    /// First instrument carrying `ticker`, in registry order. Tickers are
    /// not unique across listings, so "first" is part of the contract.
    pub fn get_first_by_ticker(&self, ticker: &str) -> Result<&Instrument> {
        self.instruments
            .iter()
            .find(|i| i.ticker() == ticker)
            .ok_or_else(|| AppError::NotFound(format!("ticker {} is not tracked", ticker)))
    }

    /// Total rows held across all daily series.
    pub fn total_bar_count(&self) -> usize {
        self.instruments.iter().map(|i| i.history().len()).sum()
    }

    /// Rough resident footprint in bytes, counting backing-array capacity
    /// rather than row counts so over-allocation shows up.
    pub fn estimate_memory_usage(&self) -> usize {
        let mut total = mem::size_of::<Self>();
        for instrument in &self.instruments {
            total += mem::size_of::<Instrument>();
            total += instrument.ticker().len();
            total += instrument.history().resident_bytes();
        }
        total
    }
}
