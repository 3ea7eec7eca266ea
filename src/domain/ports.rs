use crate::domain::model::{HouseSystem, Planet, RawHouses, RawPlanet};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Planetary longitudes for a birth moment.
#[async_trait]
pub trait EphemerisPort: Send + Sync {
    async fn compute_planets(
        &self,
        birth_utc: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        tz_offset_hours: f64,
    ) -> Result<HashMap<Planet, RawPlanet>>;

    /// Version tag recorded in chart metadata.
    fn version(&self) -> &str;
}

/// House cusps and angles. Any error means the backend is unavailable.
#[async_trait]
pub trait HouseSystemPort: Send + Sync {
    async fn compute_houses(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
        house_system: HouseSystem,
    ) -> Result<RawHouses>;
}

/// A stored cache payload together with its expiry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheItem {
    pub payload: String,
    /// Expiry as epoch seconds.
    pub ttl: i64,
    pub created_at: String,
}

/// Key-value store with native TTL expiry.
#[async_trait]
pub trait CacheStore: Send + Sync {
    async fn get_item(&self, key: &str) -> Result<Option<CacheItem>>;
    async fn put_item(&self, key: &str, item: CacheItem) -> Result<()>;
}
