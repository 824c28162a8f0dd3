//! OpenWeatherMap API client
//!
//! Async HTTP client for current conditions, forecasts, air quality, nearby
//! cities and geocoding. Transient failures are retried with exponential
//! backoff, and responses are cached on disk when a cache is attached.

pub mod openweather;

use std::collections::HashMap;
use std::fmt::Debug;
use std::future::Future;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use rand::RngExt;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::RetryTransientMiddleware;
use reqwest_retry::policies::ExponentialBackoff;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use crate::cache::PersistentCache;
use crate::config::WeatherConfig;
use crate::models::{AirQuality, Coordinates, Forecast, Location, WeatherSnapshot};
use crate::radar::{PointFetcher, PointMetrics};
use crate::{DashboardError, ErrorCode, Result};

use openweather::{
    CurrentResponse, FindResponse, ForecastResponse, GeocodingResult, PollutionResponse,
};

/// Maximum number of geocoding suggestions requested
pub const GEOCODE_LIMIT: usize = 5;

/// Number of nearby cities used for comparison
pub const NEARBY_COUNT: usize = 3;

/// Weather API client for OpenWeatherMap
#[derive(Clone)]
pub struct WeatherApiClient {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: String,
    cache: Option<PersistentCache>,
    cache_ttl: Duration,
}

impl WeatherApiClient {
    /// Create a new weather API client. An API key is required.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                DashboardError::config(
                    "No OpenWeatherMap API key configured. Set weather.api_key or WEATHERDASH_WEATHER__API_KEY.",
                )
            })?;

        let timeout = Duration::from_secs(config.timeout_seconds.into());
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weatherdash/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DashboardError::config(format!("Failed to create HTTP client: {e}")))?;

        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        let client = ClientBuilder::new(http)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            cache: None,
            cache_ttl: Duration::ZERO,
        })
    }

    /// Cache responses in `cache` for roughly `ttl`
    #[must_use]
    pub fn with_cache(mut self, cache: PersistentCache, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    /// Current weather for a city name
    #[instrument(skip(self))]
    pub async fn current_by_city(&self, city: &str) -> Result<WeatherSnapshot> {
        let city = city.trim();
        if city.is_empty() {
            return Err(DashboardError::validation("City name cannot be empty"));
        }

        let key = format!("current:city:{}", city.to_lowercase());
        self.cached(key, || async move {
            let url = format!(
                "{}/data/2.5/weather?q={}&units=imperial&appid={}",
                self.base_url,
                urlencoding::encode(city),
                self.api_key
            );
            let response: CurrentResponse = self
                .get_json(&url, HashMap::from([("city".to_string(), city.to_string())]))
                .await?;
            Ok(response.into_snapshot())
        })
        .await
    }

    /// Current weather at a coordinate
    #[instrument(skip(self), fields(coordinates = %coordinates.format()))]
    pub async fn current_by_coordinates(&self, coordinates: Coordinates) -> Result<WeatherSnapshot> {
        Ok(self.current_response(coordinates).await?.into_snapshot())
    }

    /// 5-day forecast in 3-hour steps
    #[instrument(skip(self), fields(coordinates = %coordinates.format()))]
    pub async fn forecast(&self, coordinates: Coordinates) -> Result<Forecast> {
        let key = Location::new(String::new(), coordinates).cache_key("forecast");
        self.cached(key, || async move {
            let url = format!(
                "{}/data/2.5/forecast?lat={}&lon={}&units=imperial&appid={}",
                self.base_url, coordinates.latitude, coordinates.longitude, self.api_key
            );
            let response: ForecastResponse =
                self.get_json(&url, coordinates_context(coordinates)).await?;
            let forecast = response.into_forecast();
            info!(entries = forecast.entries.len(), "Retrieved forecast");
            Ok(forecast)
        })
        .await
    }

    /// Current air quality index
    #[instrument(skip(self), fields(coordinates = %coordinates.format()))]
    pub async fn air_quality(&self, coordinates: Coordinates) -> Result<AirQuality> {
        let key = Location::new(String::new(), coordinates).cache_key("air");
        self.cached(key, || async move {
            let url = format!(
                "{}/data/2.5/air_pollution?lat={}&lon={}&appid={}",
                self.base_url, coordinates.latitude, coordinates.longitude, self.api_key
            );
            let response: PollutionResponse =
                self.get_json(&url, coordinates_context(coordinates)).await?;
            response.into_air_quality().ok_or_else(|| {
                DashboardError::api_with_context(
                    "No air quality data available for this location",
                    ErrorCode::ApiInvalidResponse,
                    coordinates_context(coordinates),
                )
            })
        })
        .await
    }

    /// Current weather of up to `count` cities around a coordinate
    #[instrument(skip(self), fields(coordinates = %coordinates.format()))]
    pub async fn nearby(&self, coordinates: Coordinates, count: usize) -> Result<Vec<WeatherSnapshot>> {
        let key = Location::new(String::new(), coordinates).cache_key(&format!("nearby{count}"));
        self.cached(key, || async move {
            let url = format!(
                "{}/data/2.5/find?lat={}&lon={}&cnt={}&units=imperial&appid={}",
                self.base_url, coordinates.latitude, coordinates.longitude, count, self.api_key
            );
            let response: FindResponse =
                self.get_json(&url, coordinates_context(coordinates)).await?;
            Ok(response
                .list
                .into_iter()
                .map(CurrentResponse::into_snapshot)
                .collect())
        })
        .await
    }

    /// Place suggestions for a search query. An empty query yields no
    /// suggestions without contacting the API.
    #[instrument(skip(self))]
    pub async fn geocode(&self, query: &str, limit: usize) -> Result<Vec<Location>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/geo/1.0/direct?q={}&limit={}&appid={}",
            self.base_url,
            urlencoding::encode(query),
            limit,
            self.api_key
        );
        let results: Vec<GeocodingResult> = self
            .get_json(&url, HashMap::from([("query".to_string(), query.to_string())]))
            .await?;

        if results.is_empty() {
            warn!("No results found for location '{}'", query);
        } else {
            debug!(
                "Geocoding results: {:?}",
                results
                    .iter()
                    .map(|r| format!("{} ({:.4}, {:.4})", r.name, r.lat, r.lon))
                    .collect::<Vec<_>>()
            );
        }

        Ok(results.into_iter().map(Location::from).collect())
    }

    async fn current_response(&self, coordinates: Coordinates) -> Result<CurrentResponse> {
        let key = Location::new(String::new(), coordinates).cache_key("current");
        self.cached(key, || async move {
            let url = format!(
                "{}/data/2.5/weather?lat={}&lon={}&units=imperial&appid={}",
                self.base_url, coordinates.latitude, coordinates.longitude, self.api_key
            );
            self.get_json(&url, coordinates_context(coordinates)).await
        })
        .await
    }

    /// Serve from the cache when fresh, otherwise fetch and store.
    /// Cache failures are logged and never fail the request.
    async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned + Clone + Debug + Send + 'static,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let Some(cache) = &self.cache else {
            return fetch().await;
        };

        match cache.get::<T>(&key).await {
            Ok(Some(value)) => {
                debug!(%key, "Serving response from cache");
                return Ok(value);
            }
            Ok(None) => debug!(%key, "Cache miss"),
            Err(e) => warn!(%key, "Cache read failed: {e}"),
        }

        let value = fetch().await?;
        if let Err(e) = cache.put(&key, value.clone(), self.jittered_ttl()).await {
            warn!(%key, "Cache write failed: {e}");
        }
        Ok(value)
    }

    /// Cache lifetime with ±10% jitter so entries fetched together expire apart
    fn jittered_ttl(&self) -> Duration {
        let jitter: f64 = rand::rng().random_range(0.9..1.1);
        self.cache_ttl.mul_f64(jitter)
    }

    /// Perform a GET request and decode the JSON body
    #[instrument(skip(self, url, context), fields(url = %url.split("appid=").next().unwrap_or(url)))]
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        context: HashMap<String, String>,
    ) -> Result<T> {
        let start_time = Instant::now();

        let response = self.client.get(url).send().await.map_err(|e| {
            error!("Network error: {e}");
            let mut context = context.clone();
            context.insert("error".to_string(), e.to_string());
            DashboardError::api_with_context(
                format!("Network error: {e}"),
                ErrorCode::ApiNetworkError,
                context,
            )
        })?;

        let status = response.status();
        debug!(
            "HTTP response received: {} in {:.3}s",
            status,
            start_time.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            return Err(match status.as_u16() {
                401 => {
                    error!("API authentication failed (HTTP 401)");
                    DashboardError::api_with_context(
                        "Invalid API key. Please check your OpenWeatherMap API key.",
                        ErrorCode::ApiUnauthorized,
                        context,
                    )
                }
                404 => {
                    warn!("Location not found (HTTP 404)");
                    DashboardError::api_with_context(
                        "City not found. Please check the spelling and try again.",
                        ErrorCode::ApiLocationNotFound,
                        context,
                    )
                }
                429 => {
                    warn!("Server rate limit exceeded (HTTP 429)");
                    DashboardError::api_with_context(
                        "Rate limit exceeded and retry attempts exhausted.",
                        ErrorCode::ApiRateLimit,
                        context,
                    )
                }
                code => {
                    let message = format!(
                        "API request failed with status: {} - {}",
                        status,
                        status.canonical_reason().unwrap_or("Unknown error")
                    );
                    error!("{message}");
                    let mut context = context;
                    context.insert("status_code".to_string(), code.to_string());
                    DashboardError::api_with_context(message, ErrorCode::ApiNetworkError, context)
                }
            });
        }

        let body = response.text().await.map_err(|e| {
            DashboardError::api_with_context(
                format!("Failed to read response body: {e}"),
                ErrorCode::ApiNetworkError,
                context.clone(),
            )
        })?;

        let parsed = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse weather response: {e}");
            DashboardError::api_with_context(
                format!("Invalid weather data received: {e}"),
                ErrorCode::ApiInvalidResponse,
                context,
            )
        })?;

        let total = start_time.elapsed();
        if total.as_secs() > 5 {
            warn!("Slow API response detected: {:.3}s", total.as_secs_f64());
        }

        Ok(parsed)
    }
}

#[async_trait]
impl PointFetcher for WeatherApiClient {
    async fn fetch_point(&self, coordinates: Coordinates) -> Result<PointMetrics> {
        Ok(self.current_response(coordinates).await?.to_point_metrics())
    }
}

fn coordinates_context(coordinates: Coordinates) -> HashMap<String, String> {
    HashMap::from([(
        "coordinates".to_string(),
        format!("{:.4},{:.4}", coordinates.latitude, coordinates.longitude),
    )])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_key(api_key: Option<&str>) -> WeatherConfig {
        WeatherConfig {
            api_key: api_key.map(str::to_string),
            base_url: "https://api.openweathermap.org/".to_string(),
            timeout_seconds: 30,
            max_retries: 0,
        }
    }

    #[test]
    fn test_client_requires_api_key() {
        let err = WeatherApiClient::new(&config_with_key(None)).err().unwrap();
        assert!(matches!(err, DashboardError::Config { .. }));
        assert!(WeatherApiClient::new(&config_with_key(Some(""))).is_err());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = WeatherApiClient::new(&config_with_key(Some("test-api-key"))).unwrap();
        assert_eq!(client.base_url, "https://api.openweathermap.org");
    }

    #[test]
    fn test_jittered_ttl_stays_within_ten_percent() {
        let mut client = WeatherApiClient::new(&config_with_key(Some("test-api-key"))).unwrap();
        client.cache_ttl = Duration::from_secs(600);
        for _ in 0..50 {
            let ttl = client.jittered_ttl();
            assert!(ttl >= Duration::from_secs(540));
            assert!(ttl <= Duration::from_secs(660));
        }
    }

    #[tokio::test]
    async fn test_empty_geocode_query_skips_request() {
        // Unroutable base URL: any request would fail.
        let mut config = config_with_key(Some("test-api-key"));
        config.base_url = "http://127.0.0.1:9".to_string();
        let client = WeatherApiClient::new(&config).unwrap();
        assert!(client.geocode("   ", GEOCODE_LIMIT).await.unwrap().is_empty());
    }
}
