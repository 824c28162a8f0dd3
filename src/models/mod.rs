//! Data models for the weather dashboard
//!
//! This module contains the core domain models organized by concern:
//! - Location: Geographic coordinates and geocoding results
//! - Weather: Point-in-time weather snapshots and display units
//! - Forecast: 3-hourly forecast collections and dashboard views
//! - AirQuality: Air pollution index

pub mod air_quality;
pub mod forecast;
pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use air_quality::{AirQuality, Pollutants};
pub use forecast::{Forecast, ForecastEntry};
pub use location::{Coordinates, Location};
pub use weather::{TemperatureUnit, WeatherSnapshot, round_half_up};

#[cfg(test)]
pub(crate) use weather::sample_snapshot;
