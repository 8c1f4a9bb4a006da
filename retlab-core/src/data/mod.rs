//! Data ingestion: CSV reading, per-ticker price files, market reference,
//! ticker universe.

pub mod loader;
pub mod market;
pub mod reader;
pub mod universe;

pub use loader::{CsvPriceStore, PriceSource, DEFAULT_PRICE_SUFFIX};
pub use market::MarketReference;
pub use reader::{parse_date, read_table};
pub use universe::TickerUniverse;
