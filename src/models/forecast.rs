//! Weather forecast model and views used by the dashboard

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Number of 3-hourly entries per day in the forecast feed
const ENTRIES_PER_DAY: usize = 8;

/// Entries shown on the hourly timeline
const TIMELINE_ENTRIES: usize = 24;

/// One 3-hourly forecast step
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastEntry {
    /// Start of the forecast step
    pub timestamp: DateTime<Utc>,
    /// Temperature in °F
    pub temperature: f64,
    /// Relative humidity (0-100)
    pub humidity: u8,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Primary condition label
    pub condition: String,
    /// Longer description
    pub description: String,
}

/// Multi-day forecast for one location
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Forecast {
    /// Place name reported by the API
    pub name: String,
    /// Forecast location
    pub coordinates: Coordinates,
    /// Forecast steps sorted by timestamp
    pub entries: Vec<ForecastEntry>,
    /// When this forecast was retrieved
    pub retrieved_at: DateTime<Utc>,
}

impl Forecast {
    #[must_use]
    pub fn new(name: String, coordinates: Coordinates, entries: Vec<ForecastEntry>) -> Self {
        Self {
            name,
            coordinates,
            entries,
            retrieved_at: Utc::now(),
        }
    }

    /// One entry per day, at most five days (the daily forecast cards)
    #[must_use]
    pub fn daily(&self) -> Vec<&ForecastEntry> {
        self.entries
            .iter()
            .step_by(ENTRIES_PER_DAY)
            .take(5)
            .collect()
    }

    /// The first `count` forecast steps (the timeline)
    #[must_use]
    pub fn next_entries(&self, count: usize) -> &[ForecastEntry] {
        &self.entries[..count.min(self.entries.len())]
    }

    /// Timeline entries (the first 24 steps, three days)
    #[must_use]
    pub fn next_hours(&self) -> &[ForecastEntry] {
        self.next_entries(TIMELINE_ENTRIES)
    }

    /// Lowest and highest temperature over the whole forecast
    #[must_use]
    pub fn temperature_range(&self) -> Option<(f64, f64)> {
        self.entries.iter().map(|e| e.temperature).fold(None, |acc, t| {
            Some(match acc {
                Some((min, max)) => (f64::min(min, t), f64::max(max, t)),
                None => (t, t),
            })
        })
    }
}
