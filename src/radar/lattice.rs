//! Radar lattice geometry and grid point model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::colors::Metric;
use crate::DashboardError;
use crate::models::Coordinates;

/// Offsets run from `-RADIUS_STEPS` to `RADIUS_STEPS` on both axes
pub const RADIUS_STEPS: i32 = 3;

/// Number of points in one lattice (7 × 7)
pub const LATTICE_POINTS: usize = ((2 * RADIUS_STEPS + 1) * (2 * RADIUS_STEPS + 1)) as usize;

/// Lattice spacing setting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    /// 1.5° spacing, 75 km circles
    Low,
    /// 1.0° spacing, 50 km circles
    #[default]
    Medium,
    /// 0.5° spacing, 25 km circles
    High,
}

impl Density {
    /// Distance between neighbouring lattice points in degrees
    #[must_use]
    pub fn step_degrees(self) -> f64 {
        match self {
            Self::Low => 1.5,
            Self::Medium => 1.0,
            Self::High => 0.5,
        }
    }

    /// Radius of the circle drawn around each point, in kilometres
    #[must_use]
    pub fn display_radius_km(self) -> f64 {
        match self {
            Self::Low => 75.0,
            Self::Medium => 50.0,
            Self::High => 25.0,
        }
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        };
        f.write_str(name)
    }
}

impl FromStr for Density {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(DashboardError::validation(format!(
                "Unknown grid density '{other}'. Must be one of: low, medium, high"
            ))),
        }
    }
}

/// Lattice coordinates around `center`, row-major (latitude offset outer,
/// longitude offset inner).
#[must_use]
pub fn lattice(center: Coordinates, density: Density) -> Vec<Coordinates> {
    let step = density.step_degrees();
    let mut points = Vec::with_capacity(LATTICE_POINTS);

    for i in -RADIUS_STEPS..=RADIUS_STEPS {
        for j in -RADIUS_STEPS..=RADIUS_STEPS {
            points.push(Coordinates::new(
                center.latitude + f64::from(i) * step,
                center.longitude + f64::from(j) * step,
            ));
        }
    }

    points
}

/// Metric values for one lattice coordinate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointMetrics {
    /// Temperature in °F
    pub temperature: f64,
    /// Wind speed in mph
    pub wind_speed: f64,
    /// Pressure in hPa
    pub pressure: f64,
    /// Relative humidity (0-100)
    pub humidity: f64,
    /// Cloud cover percentage (0-100)
    pub cloud_cover: f64,
}

/// A sampled lattice point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridPoint {
    pub coordinates: Coordinates,
    pub metrics: PointMetrics,
    /// When the point was fetched
    pub captured_at: DateTime<Utc>,
}

impl GridPoint {
    /// Value of `metric` at this point
    #[must_use]
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Temperature => self.metrics.temperature,
            Metric::Wind => self.metrics.wind_speed,
            Metric::Pressure => self.metrics.pressure,
            Metric::Humidity => self.metrics.humidity,
            Metric::Clouds => self.metrics.cloud_cover,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_medium_lattice_is_unit_spaced() {
        let center = Coordinates::new(40.0, -74.0);
        let points = lattice(center, Density::Medium);
        assert_eq!(points.len(), 49);

        let mut expected = Vec::new();
        for i in -3..=3 {
            for j in -3..=3 {
                expected.push(Coordinates::new(40.0 + f64::from(i), -74.0 + f64::from(j)));
            }
        }
        assert_eq!(points, expected);
    }

    #[test]
    fn test_lattice_is_row_major() {
        let points = lattice(Coordinates::new(0.0, 0.0), Density::High);
        assert_eq!(points[0], Coordinates::new(-1.5, -1.5));
        assert_eq!(points[1], Coordinates::new(-1.5, -1.0));
        assert_eq!(points[7], Coordinates::new(-1.0, -1.5));
        assert_eq!(points[24], Coordinates::new(0.0, 0.0));
        assert_eq!(points[48], Coordinates::new(1.5, 1.5));
    }

    #[rstest]
    #[case(Density::Low, 1.5, 75.0)]
    #[case(Density::Medium, 1.0, 50.0)]
    #[case(Density::High, 0.5, 25.0)]
    fn test_density_settings(#[case] density: Density, #[case] step: f64, #[case] radius: f64) {
        assert_eq!(density.step_degrees(), step);
        assert_eq!(density.display_radius_km(), radius);

        // Shape stays 7x7 whatever the spacing.
        let points = lattice(Coordinates::new(10.0, 20.0), density);
        assert_eq!(points.len(), LATTICE_POINTS);
        assert_eq!(points[0].latitude, 10.0 - 3.0 * step);
        assert_eq!(points[48].longitude, 20.0 + 3.0 * step);
    }

    #[test]
    fn test_density_parsing() {
        assert_eq!("HIGH".parse::<Density>().unwrap(), Density::High);
        assert_eq!(" low ".parse::<Density>().unwrap(), Density::Low);
        assert!("dense".parse::<Density>().is_err());
        assert_eq!(Density::default().to_string(), "medium");
    }
}
