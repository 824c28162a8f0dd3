//! Air quality index model

use serde::{Deserialize, Serialize};

/// Pollutant concentrations in μg/m³
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Pollutants {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
}

/// Current air quality at a location
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirQuality {
    /// Air quality index on the 1 (good) to 5 (very poor) scale
    pub aqi: u8,
    /// Individual pollutant readings
    pub components: Pollutants,
}

impl AirQuality {
    /// Label for the index level
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self.aqi {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            5 => "Very Poor",
            _ => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, "Good")]
    #[case(3, "Moderate")]
    #[case(5, "Very Poor")]
    #[case(0, "Unknown")]
    #[case(9, "Unknown")]
    fn test_aqi_label(#[case] aqi: u8, #[case] expected: &str) {
        let reading = AirQuality {
            aqi,
            components: Pollutants::default(),
        };
        assert_eq!(reading.label(), expected);
    }
}
