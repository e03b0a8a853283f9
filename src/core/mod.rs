//! Core business logic: currency conversion and destination search

pub mod catalog;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod debounce;
pub mod history;
pub mod log;
pub mod search;

// Re-export main types for cleaner imports
pub use catalog::{Catalog, CatalogEntry};
pub use conversion::{Conversion, Leg, RateConverter, RatePath};
pub use currency::{CurrencyRateProvider, RateTable, TableRateProvider};
pub use search::{CategoryFilter, SearchableEntry, search};
