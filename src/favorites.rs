//! Persisted dashboard state: favorite cities, recent searches, the last
//! searched city and the preferred temperature unit.

use crate::Result;
use crate::cache::PersistentCache;
use crate::models::{Location, TemperatureUnit};

/// Number of recent searches kept
pub const MAX_RECENT_SEARCHES: usize = 5;

const FAVORITES_KEY: &str = "store:favorites";
const RECENT_KEY: &str = "store:recent_searches";
const LAST_CITY_KEY: &str = "store:last_city";
const UNIT_KEY: &str = "store:temperature_unit";

/// Put `location` at the front of `recent`, dropping any earlier entry with
/// the same coordinates and keeping at most [`MAX_RECENT_SEARCHES`].
#[must_use]
pub fn push_recent(recent: Vec<Location>, location: Location) -> Vec<Location> {
    let mut updated = Vec::with_capacity(MAX_RECENT_SEARCHES);
    let coordinates = location.coordinates;
    updated.push(location);
    updated.extend(
        recent
            .into_iter()
            .filter(|item| item.coordinates != coordinates)
            .take(MAX_RECENT_SEARCHES - 1),
    );
    updated
}

/// Dashboard state kept in the local cache database. Entries never expire.
#[derive(Clone)]
pub struct DashboardStore {
    cache: PersistentCache,
}

impl DashboardStore {
    #[must_use]
    pub fn new(cache: PersistentCache) -> Self {
        Self { cache }
    }

    /// Favorite city names in the order they were added
    pub async fn favorites(&self) -> Result<Vec<String>> {
        Ok(self.cache.get(FAVORITES_KEY).await?.unwrap_or_default())
    }

    pub async fn is_favorite(&self, city: &str) -> Result<bool> {
        Ok(self.favorites().await?.iter().any(|f| f == city))
    }

    /// Add `city` to the favorites, or remove it if already present.
    /// Returns whether the city is a favorite afterwards.
    pub async fn toggle_favorite(&self, city: &str) -> Result<bool> {
        let mut favorites = self.favorites().await?;
        let added = if let Some(index) = favorites.iter().position(|f| f == city) {
            favorites.remove(index);
            false
        } else {
            favorites.push(city.to_string());
            true
        };

        self.cache.put_permanent(FAVORITES_KEY, favorites).await?;
        tracing::debug!(city, added, "Toggled favorite city");
        Ok(added)
    }

    /// Recently selected locations, most recent first
    pub async fn recent_searches(&self) -> Result<Vec<Location>> {
        Ok(self.cache.get(RECENT_KEY).await?.unwrap_or_default())
    }

    /// Record a selected search suggestion and return the updated list
    pub async fn record_search(&self, location: Location) -> Result<Vec<Location>> {
        let updated = push_recent(self.recent_searches().await?, location);
        self.cache.put_permanent(RECENT_KEY, updated.clone()).await?;
        Ok(updated)
    }

    pub async fn last_city(&self) -> Result<Option<String>> {
        self.cache.get(LAST_CITY_KEY).await
    }

    pub async fn set_last_city(&self, city: &str) -> Result<()> {
        self.cache
            .put_permanent(LAST_CITY_KEY, city.to_string())
            .await
    }

    pub async fn clear_last_city(&self) -> Result<()> {
        self.cache.remove(LAST_CITY_KEY).await
    }

    /// Stored unit preference, or `default` when none has been saved
    pub async fn temperature_unit(&self, default: TemperatureUnit) -> Result<TemperatureUnit> {
        Ok(self.cache.get(UNIT_KEY).await?.unwrap_or(default))
    }

    pub async fn set_temperature_unit(&self, unit: TemperatureUnit) -> Result<()> {
        self.cache.put_permanent(UNIT_KEY, unit).await
    }
}
