//! Price → return → abnormal-return pipeline.
//!
//! Data flows strictly downstream:
//! loader → price matrix → returns (+ `mkt`) → abnormal returns.
//! Each stage is a pure function over the previous stage's table;
//! [`Pipeline`] binds them to a [`ProjectConfig`].

pub mod abnormal;
pub mod prices;
pub mod returns;

pub use abnormal::compute_abnormal_returns;
pub use prices::{build_price_matrix, dedupe_tickers};
pub use returns::{compute_returns, simple_returns};

use crate::config::ProjectConfig;
use crate::data::{CsvPriceStore, MarketReference, PriceSource, TickerUniverse};
use crate::error::Result;
use crate::naming::PriceField;
use crate::table::TimeSeriesTable;
use std::path::PathBuf;

/// Configured entry point for the whole pipeline.
#[derive(Debug, Clone)]
pub struct Pipeline {
    store: CsvPriceStore,
    market_csv: PathBuf,
    universe: TickerUniverse,
}

impl Pipeline {
    pub fn new(config: &ProjectConfig) -> Self {
        Self {
            store: config.price_store(),
            market_csv: config.market_csv.clone(),
            universe: config.tickers.clone(),
        }
    }

    pub fn universe(&self) -> &TickerUniverse {
        &self.universe
    }

    pub fn store(&self) -> &CsvPriceStore {
        &self.store
    }

    /// Every field of one ticker's price file.
    pub fn read_prices(&self, ticker: &str) -> Result<TimeSeriesTable> {
        self.store.load(ticker)
    }

    /// Price matrix of `field` for `tickers`.
    pub fn price_matrix<S: AsRef<str>>(
        &self,
        tickers: &[S],
        field: &PriceField,
    ) -> Result<TimeSeriesTable> {
        build_price_matrix(&self.store, tickers, field)
    }

    /// Price matrix of `field` for every ticker in the universe.
    pub fn universe_price_matrix(&self, field: &PriceField) -> Result<TimeSeriesTable> {
        let tickers = self.universe.tickers();
        self.price_matrix(tickers.as_slice(), field)
    }

    /// The configured market reference.
    pub fn market(&self) -> Result<MarketReference> {
        MarketReference::load(&self.market_csv)
    }

    /// Returns of `prices` joined with the configured market series.
    pub fn returns(&self, prices: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        let market = self.market()?.mkt()?;
        compute_returns(prices, &market)
    }

    pub fn abnormal_returns(&self, returns: &TimeSeriesTable) -> Result<TimeSeriesTable> {
        compute_abnormal_returns(returns)
    }
}
