//! `weatherdash` - Weather dashboard core
//!
//! This library provides current conditions and forecasts from OpenWeatherMap,
//! severe-condition alerts, a synthetic radar sweep with gradient color
//! mapping, activity recommendations and locally persisted dashboard state.

pub mod alerts;
pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod models;
pub mod radar;
pub mod recommendations;

// Re-export core types for public API
pub use alerts::{Condition, ConditionKind, evaluate};
pub use api::WeatherApiClient;
pub use cache::PersistentCache;
pub use config::DashboardConfig;
pub use error::{DashboardError, ErrorCode};
pub use favorites::DashboardStore;
pub use models::{AirQuality, Coordinates, Forecast, Location, TemperatureUnit, WeatherSnapshot};
pub use radar::{Density, GridPoint, Metric, PointFetcher, RadarSweeper, SweepState, SweepStatus};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, DashboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
