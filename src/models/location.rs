//! Location model for geographic coordinates and metadata

use serde::{Deserialize, Serialize};

use crate::DashboardError;

/// A point on the globe in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Create coordinates, rejecting values outside the valid ranges
    pub fn validated(latitude: f64, longitude: f64) -> crate::Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DashboardError::validation(format!(
                "Latitude must be between -90 and 90, got: {latitude}"
            )));
        }

        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DashboardError::validation(format!(
                "Longitude must be between -180 and 180, got: {longitude}"
            )));
        }

        Ok(Self::new(latitude, longitude))
    }

    /// Format as "lat, lon" with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }

    /// Round coordinates for cache key generation
    #[must_use]
    pub fn rounded(&self, precision: u32) -> (f64, f64) {
        let multiplier = 10_f64.powi(i32::try_from(precision).unwrap_or(4));
        let lat = (self.latitude * multiplier).round() / multiplier;
        let lon = (self.longitude * multiplier).round() / multiplier;
        (lat, lon)
    }
}

/// A named place returned by geocoding
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Location {
    /// Place name (city, town, etc.)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    /// State or region, when the API reports one
    pub state: Option<String>,
    /// Position of the place
    pub coordinates: Coordinates,
}

impl Location {
    #[must_use]
    pub fn new(name: String, coordinates: Coordinates) -> Self {
        Self {
            name,
            country: None,
            state: None,
            coordinates,
        }
    }

    /// Human readable label, e.g. "Springfield, IL, US"
    #[must_use]
    pub fn display_name(&self) -> String {
        [Some(self.name.as_str()), self.state.as_deref(), self.country.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Generate a cache key for data about this location
    #[must_use]
    pub fn cache_key(&self, kind: &str) -> String {
        let (lat, lon) = self.coordinates.rounded(2);
        format!("{kind}:{lat:.2}:{lon:.2}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_cache_key() {
        let location = Location::new("Newark".to_string(), Coordinates::new(40.7357, -74.1724));
        assert_eq!(location.cache_key("current"), "current:40.74:-74.17");
    }

    #[test]
    fn test_rounded_coordinates() {
        let coords = Coordinates::new(46.818_234, 8.227_456);
        let (lat, lon) = coords.rounded(2);
        assert_eq!(lat, 46.82);
        assert_eq!(lon, 8.23);
    }

    #[test]
    fn test_validated_coordinates() {
        assert!(Coordinates::validated(40.0, -74.0).is_ok());
        assert!(Coordinates::validated(91.0, 0.0).is_err());
        assert!(Coordinates::validated(0.0, -180.5).is_err());
    }

    #[test]
    fn test_display_name_skips_missing_parts() {
        let mut location = Location::new("Springfield".to_string(), Coordinates::new(39.8, -89.6));
        assert_eq!(location.display_name(), "Springfield");

        location.state = Some("IL".to_string());
        location.country = Some("US".to_string());
        assert_eq!(location.display_name(), "Springfield, IL, US");
    }
}
