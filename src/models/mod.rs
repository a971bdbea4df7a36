//! Data models for the citycast library
//!
//! This module contains the core domain models organized by concern:
//! - City: entries of the static city dataset
//! - Forecast: decoded forecast responses of the weather service

pub mod city;
pub mod forecast;

// Re-export all public types for convenient access
pub use city::City;
pub use forecast::{DailyForecast, Description, Forecast, ForecastLocation, Temperature, TemperatureReading};
