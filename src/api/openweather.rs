//! OpenWeatherMap response payloads and their conversion into dashboard models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{
    AirQuality, Coordinates, Forecast, ForecastEntry, Location, Pollutants, WeatherSnapshot,
};
use crate::radar::PointMetrics;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coord {
    pub lat: f64,
    pub lon: f64,
}

impl From<&Coord> for Coordinates {
    fn from(coord: &Coord) -> Self {
        Coordinates::new(coord.lat, coord.lon)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConditionInfo {
    pub main: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MainReadings {
    pub temp: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub pressure: f64,
    #[serde(default)]
    pub humidity: u8,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Wind {
    #[serde(default)]
    pub speed: f64,
    pub deg: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clouds {
    #[serde(default)]
    pub all: u8,
}

/// `/data/2.5/weather` response, also the item type of `/data/2.5/find`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentResponse {
    pub coord: Coord,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
    pub main: MainReadings,
    #[serde(default)]
    pub wind: Wind,
    #[serde(default)]
    pub clouds: Clouds,
    pub dt: i64,
    #[serde(default)]
    pub name: String,
}

impl CurrentResponse {
    fn primary_condition(&self) -> (String, String) {
        self.weather
            .first()
            .map(|w| (w.main.clone(), w.description.clone()))
            .unwrap_or_else(|| ("Unknown".to_string(), String::new()))
    }

    pub fn into_snapshot(self) -> WeatherSnapshot {
        let (condition, description) = self.primary_condition();
        WeatherSnapshot {
            name: self.name,
            coordinates: Coordinates::from(&self.coord),
            observed_at: timestamp(self.dt),
            temperature: self.main.temp,
            feels_like: self.main.feels_like.unwrap_or(self.main.temp),
            wind_speed: self.wind.speed,
            wind_direction: self.wind.deg,
            humidity: self.main.humidity,
            cloud_cover: self.clouds.all,
            pressure: self.main.pressure,
            condition,
            description,
        }
    }

    pub fn to_point_metrics(&self) -> PointMetrics {
        PointMetrics {
            temperature: self.main.temp,
            wind_speed: self.wind.speed,
            pressure: self.main.pressure,
            humidity: f64::from(self.main.humidity),
            cloud_cover: f64::from(self.clouds.all),
        }
    }
}

/// `/data/2.5/find` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindResponse {
    #[serde(default)]
    pub list: Vec<CurrentResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastItem {
    pub dt: i64,
    pub main: MainReadings,
    #[serde(default)]
    pub weather: Vec<ConditionInfo>,
    #[serde(default)]
    pub wind: Wind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastCity {
    #[serde(default)]
    pub name: String,
    pub coord: Coord,
}

/// `/data/2.5/forecast` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    #[serde(default)]
    pub list: Vec<ForecastItem>,
    pub city: ForecastCity,
}

impl ForecastResponse {
    pub fn into_forecast(self) -> Forecast {
        let entries = self
            .list
            .into_iter()
            .map(|item| {
                let (condition, description) = item
                    .weather
                    .into_iter()
                    .next()
                    .map(|w| (w.main, w.description))
                    .unwrap_or_else(|| ("Unknown".to_string(), String::new()));
                ForecastEntry {
                    timestamp: timestamp(item.dt),
                    temperature: item.main.temp,
                    humidity: item.main.humidity,
                    wind_speed: item.wind.speed,
                    condition,
                    description,
                }
            })
            .collect();

        Forecast::new(self.city.name, Coordinates::from(&self.city.coord), entries)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AqiIndex {
    pub aqi: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionItem {
    pub main: AqiIndex,
    #[serde(default)]
    pub components: Pollutants,
}

/// `/data/2.5/air_pollution` response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollutionResponse {
    #[serde(default)]
    pub list: Vec<PollutionItem>,
}

impl PollutionResponse {
    pub fn into_air_quality(self) -> Option<AirQuality> {
        self.list.into_iter().next().map(|item| AirQuality {
            aqi: item.main.aqi,
            components: item.components,
        })
    }
}

/// One `/geo/1.0/direct` result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            name: result.name,
            country: result.country,
            state: result.state,
            coordinates: Coordinates::new(result.lat, result.lon),
        }
    }
}

fn timestamp(seconds: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(seconds, 0).unwrap_or_else(Utc::now)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "coord": {"lon": -74.17, "lat": 40.74},
        "weather": [{"id": 200, "main": "Thunderstorm", "description": "thunderstorm with light rain", "icon": "11d"}],
        "main": {"temp": 96.2, "feels_like": 101.3, "pressure": 1008, "humidity": 62},
        "wind": {"speed": 24.6, "deg": 225},
        "clouds": {"all": 75},
        "dt": 1700000000,
        "sys": {"country": "US"},
        "name": "Newark"
    }"#;

    #[test]
    fn test_current_response_to_snapshot() {
        let response: CurrentResponse = serde_json::from_str(CURRENT).unwrap();
        let metrics = response.to_point_metrics();
        let snapshot = response.into_snapshot();

        assert_eq!(snapshot.name, "Newark");
        assert_eq!(snapshot.coordinates, Coordinates::new(40.74, -74.17));
        assert_eq!(snapshot.temperature, 96.2);
        assert_eq!(snapshot.feels_like, 101.3);
        assert_eq!(snapshot.wind_direction, Some(225));
        assert_eq!(snapshot.condition, "Thunderstorm");
        assert_eq!(snapshot.observed_at.timestamp(), 1_700_000_000);

        assert_eq!(metrics.pressure, 1008.0);
        assert_eq!(metrics.humidity, 62.0);
        assert_eq!(metrics.cloud_cover, 75.0);
    }

    #[test]
    fn test_missing_condition_list_is_unknown() {
        let json = r#"{"coord": {"lon": 0, "lat": 0}, "main": {"temp": 50}, "dt": 0}"#;
        let snapshot = serde_json::from_str::<CurrentResponse>(json)
            .unwrap()
            .into_snapshot();
        assert_eq!(snapshot.condition, "Unknown");
        assert_eq!(snapshot.feels_like, 50.0);
        assert_eq!(snapshot.wind_speed, 0.0);
    }

    #[test]
    fn test_pollution_response() {
        let json = r#"{"coord": {"lon": 0, "lat": 0}, "list": [{"main": {"aqi": 2},
            "components": {"co": 201.9, "no": 0.0, "no2": 0.8, "o3": 68.7, "so2": 0.6,
            "pm2_5": 0.5, "pm10": 0.5, "nh3": 0.1}, "dt": 1605182400}]}"#;
        let air = serde_json::from_str::<PollutionResponse>(json)
            .unwrap()
            .into_air_quality()
            .unwrap();
        assert_eq!(air.aqi, 2);
        assert_eq!(air.label(), "Fair");
        assert_eq!(air.components.o3, 68.7);

        let empty: PollutionResponse = serde_json::from_str(r#"{"list": []}"#).unwrap();
        assert!(empty.into_air_quality().is_none());
    }
}
