#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use natal_chart::domain::model::{HouseSystem, Planet, RawBirthEvent, RawHouses, RawPlanet};
use natal_chart::domain::ports::{CacheItem, CacheStore, EphemerisPort, HouseSystemPort};
use natal_chart::{ChartError, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn einstein() -> RawBirthEvent {
    RawBirthEvent {
        birth_date: Some("1879-03-14".to_string()),
        birth_time: Some("11:30".to_string()),
        latitude: Some(48.4),
        longitude: Some(9.99),
        iana_time_zone: Some("Europe/Berlin".to_string()),
    }
}

/// Longitudes loosely following 1879-03-14.
pub fn sample_longitudes() -> Vec<(Planet, f64)> {
    vec![
        (Planet::Sun, 353.5),
        (Planet::Moon, 254.3),
        (Planet::Mercury, 3.1),
        (Planet::Venus, 16.9),
        (Planet::Mars, 296.8),
        (Planet::Jupiter, 327.5),
        (Planet::Saturn, 4.2),
        (Planet::Uranus, 151.1),
        (Planet::Neptune, 37.8),
        (Planet::Pluto, 54.6),
    ]
}

pub fn sample_cusps() -> [f64; 12] {
    [
        101.6, 122.5, 144.9, 172.0, 207.4, 250.1, 281.6, 302.5, 324.9, 352.0, 27.4, 70.1,
    ]
}

pub struct StubEphemeris {
    pub longitudes: Vec<(Planet, f64)>,
    pub fail: bool,
    pub calls: AtomicUsize,
}

impl StubEphemeris {
    pub fn new(longitudes: Vec<(Planet, f64)>) -> Arc<Self> {
        Arc::new(Self {
            longitudes,
            fail: false,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            longitudes: Vec::new(),
            fail: true,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl EphemerisPort for StubEphemeris {
    async fn compute_planets(
        &self,
        _birth_utc: DateTime<Utc>,
        _latitude: f64,
        _longitude: f64,
        _tz_offset_hours: f64,
    ) -> Result<HashMap<Planet, RawPlanet>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(ChartError::computation("ephemeris unreachable"));
        }
        Ok(self
            .longitudes
            .iter()
            .map(|(planet, longitude)| {
                (
                    *planet,
                    RawPlanet {
                        longitude: *longitude,
                        distance: 1.0,
                    },
                )
            })
            .collect())
    }

    fn version(&self) -> &str {
        "stub-ephemeris-1"
    }
}

pub enum HouseBehaviour {
    Cusps([f64; 12]),
    Fail,
    Slow(Duration),
}

pub struct StubHouses {
    pub behaviour: HouseBehaviour,
    pub calls: AtomicUsize,
}

impl StubHouses {
    pub fn new(behaviour: HouseBehaviour) -> Arc<Self> {
        Arc::new(Self {
            behaviour,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HouseSystemPort for StubHouses {
    async fn compute_houses(
        &self,
        _julian_day: f64,
        _latitude: f64,
        _longitude: f64,
        _house_system: HouseSystem,
    ) -> Result<RawHouses> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            HouseBehaviour::Cusps(cusps) => Ok(RawHouses {
                cusps: *cusps,
                ascendant: cusps[0],
                midheaven: cusps[9],
            }),
            HouseBehaviour::Fail => Err(ChartError::house_backend("swisseph binary missing")),
            HouseBehaviour::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                Err(ChartError::house_backend("should have timed out"))
            }
        }
    }
}

/// Store whose reads and writes always fail.
pub struct BrokenStore;

#[async_trait]
impl CacheStore for BrokenStore {
    async fn get_item(&self, _key: &str) -> Result<Option<CacheItem>> {
        Err(ChartError::cache("connection refused"))
    }

    async fn put_item(&self, _key: &str, _item: CacheItem) -> Result<()> {
        Err(ChartError::cache("connection refused"))
    }
}

/// Store whose calls never complete.
pub struct StalledStore;

#[async_trait]
impl CacheStore for StalledStore {
    async fn get_item(&self, _key: &str) -> Result<Option<CacheItem>> {
        std::future::pending().await
    }

    async fn put_item(&self, _key: &str, _item: CacheItem) -> Result<()> {
        std::future::pending().await
    }
}
