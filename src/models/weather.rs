//! Weather snapshot model and display methods

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Coordinates;

/// Round to the nearest integer with halves going toward positive infinity,
/// so `-2.5` becomes `-2` and `2.5` becomes `3`.
#[must_use]
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// A single point-in-time weather reading for one location.
///
/// Values are imperial, as requested from the API: temperatures in °F and
/// wind speed in mph.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    /// Place name reported by the API
    pub name: String,
    /// Where the reading was taken
    pub coordinates: Coordinates,
    /// Time of observation
    pub observed_at: DateTime<Utc>,
    /// Temperature in °F
    pub temperature: f64,
    /// Apparent temperature in °F
    pub feels_like: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_direction: Option<u16>,
    /// Relative humidity (0-100)
    pub humidity: u8,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: u8,
    /// Barometric pressure in hPa
    pub pressure: f64,
    /// Primary condition label ("Clear", "Rain", "Thunderstorm", ...)
    pub condition: String,
    /// Longer description, e.g. "light intensity drizzle"
    pub description: String,
}

impl WeatherSnapshot {
    /// Convert wind direction from degrees to cardinal direction
    #[must_use]
    pub fn wind_direction_to_cardinal(degrees: u16) -> &'static str {
        match degrees {
            0..=11 | 349..=360 => "N",
            12..=33 => "NNE",
            34..=56 => "NE",
            57..=78 => "ENE",
            79..=101 => "E",
            102..=123 => "ESE",
            124..=146 => "SE",
            147..=168 => "SSE",
            169..=191 => "S",
            192..=213 => "SSW",
            214..=236 => "SW",
            237..=258 => "WSW",
            259..=281 => "W",
            282..=303 => "WNW",
            304..=326 => "NW",
            327..=348 => "NNW",
            _ => "Unknown",
        }
    }

    /// Format temperature in the requested unit
    #[must_use]
    pub fn format_temperature(&self, unit: TemperatureUnit) -> String {
        unit.format(self.temperature)
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        match self.wind_direction {
            Some(degrees) => format!(
                "{} mph {}",
                self.wind_speed.round(),
                Self::wind_direction_to_cardinal(degrees)
            ),
            None => format!("{} mph", self.wind_speed.round()),
        }
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{:.0} hPa", self.pressure)
    }
}

/// Unit used to display temperatures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    #[serde(rename = "F")]
    Fahrenheit,
    #[serde(rename = "C")]
    Celsius,
}

impl TemperatureUnit {
    /// Convert a °F reading into this unit, rounded to whole degrees
    #[must_use]
    pub fn convert(self, fahrenheit: f64) -> i64 {
        let value = match self {
            Self::Fahrenheit => fahrenheit,
            Self::Celsius => (fahrenheit - 32.0) * 5.0 / 9.0,
        };
        round_half_up(value) as i64
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Fahrenheit => "°F",
            Self::Celsius => "°C",
        }
    }

    #[must_use]
    pub fn format(self, fahrenheit: f64) -> String {
        format!("{}{}", self.convert(fahrenheit), self.symbol())
    }

    /// The other unit
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Fahrenheit => Self::Celsius,
            Self::Celsius => Self::Fahrenheit,
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        name: "Newark".to_string(),
        coordinates: Coordinates::new(40.0, -74.0),
        observed_at: Utc::now(),
        temperature: 70.0,
        feels_like: 70.0,
        wind_speed: 5.0,
        wind_direction: Some(180),
        humidity: 50,
        cloud_cover: 20,
        pressure: 1013.0,
        condition: "Clear".to_string(),
        description: "clear sky".to_string(),
    }
}
