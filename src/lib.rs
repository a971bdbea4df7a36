//! `citycast` - incremental city search and weather forecast lookup
//!
//! This library provides the non-UI logic of a city weather viewer: a pure
//! filter over a static list of Japanese cities, a debounced search wrapper,
//! and a forecast fetcher that delivers results to a foreground thread.

pub mod catalog;
pub mod config;
pub mod error;
pub mod forecast;
pub mod models;
pub mod scheduler;
pub mod search;
pub mod telemetry;

// Re-export core types for public API
pub use catalog::CityCatalog;
pub use config::CitycastConfig;
pub use error::{CitycastError, ErrorKind, FetchError};
pub use forecast::{FetchHandle, ForecastClient, ForecastFetcher};
pub use models::{City, Forecast};
pub use scheduler::{MainLoop, MainQueue};
pub use search::{IncrementalSearch, filter_cities};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, CitycastError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
