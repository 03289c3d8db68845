//! Core business logic abstractions

pub mod amount;
pub mod chart;
pub mod config;
pub mod conversion;
pub mod currency;
pub mod error;
pub mod log;
pub mod timeseries;

// Re-export main types for cleaner imports
pub use amount::Amount;
pub use conversion::{ConversionOutcome, ConversionRequest, Generation, RequestTracker};
pub use currency::{Currency, CurrencyDataProvider, CurrencyDirectory};
pub use error::{ConversionError, FetchError};
pub use timeseries::{DateRange, RatePoint, TimeSeries};
