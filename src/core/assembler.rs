use crate::config::EngineConfig;
use crate::core::cache_key::derive_key;
use crate::core::house_cache::HouseCache;
use crate::core::houses::CuspRing;
use crate::core::time::{julian_day, to_utc, UtcBirth};
use crate::core::validator::validate;
use crate::core::zodiac::{format_dms, normalize, normalize_degrees};
use crate::domain::model::{
    AngleData, BirthEvent, ChartMetadata, HouseCacheEntry, HouseCusp, HouseResult,
    NatalChartRecord, Planet, PlanetPosition, RawBirthEvent, RawHouses,
};
use crate::domain::ports::{CacheStore, EphemerisPort, HouseSystemPort};
use crate::utils::error::{ChartError, Result};
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Outcome of the house half of a request.
enum HouseLookup {
    Cached(HouseCacheEntry, CuspRing),
    Computed(RawHouses, CuspRing),
    Unavailable(ChartError),
}

/// Builds natal charts from the injected backends.
///
/// Planet positions are mandatory; houses are best effort. When the house
/// backend is missing, slow or returns unusable cusps, the chart still comes
/// back with `houses.status = failed` and no angles or planet houses.
pub struct NatalChartAssembler {
    ephemeris: Arc<dyn EphemerisPort>,
    houses: Option<Arc<dyn HouseSystemPort>>,
    cache: HouseCache,
    config: EngineConfig,
}

impl NatalChartAssembler {
    pub fn new(
        ephemeris: Arc<dyn EphemerisPort>,
        cache_store: Arc<dyn CacheStore>,
        config: EngineConfig,
    ) -> Self {
        let cache = HouseCache::new(
            cache_store,
            config.cache_key_prefix.clone(),
            config.cache_ttl(),
        )
        .with_store_timeout(config.backend_timeout());
        Self {
            ephemeris,
            houses: None,
            cache,
            config,
        }
    }

    pub fn with_house_system(mut self, houses: Arc<dyn HouseSystemPort>) -> Self {
        self.houses = Some(houses);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate raw input, then compute the chart.
    pub async fn compute_from_raw(&self, raw: &RawBirthEvent) -> Result<NatalChartRecord> {
        let event = validate(raw).inspect_err(|e| tracing::info!("Rejected birth data: {}", e))?;
        self.compute_natal_chart(event).await
    }

    pub async fn compute_natal_chart(&self, event: BirthEvent) -> Result<NatalChartRecord> {
        let utc = to_utc(&event)?;
        let input_hash = derive_key(
            event.birth_date(),
            event.birth_time(),
            event.latitude(),
            event.longitude(),
            &self.config.key_settings(),
        );
        tracing::info!(
            "Computing natal chart for {} {} at ({}, {}), key {}",
            event.birth_date(),
            event.birth_time().format("%H:%M"),
            event.latitude(),
            event.longitude(),
            input_hash
        );

        // 行星與宮位互不相依，同時進行
        let (planets, lookup) = tokio::join!(
            self.compute_planets(&event, &utc),
            self.lookup_houses(&input_hash, &event, &utc)
        );
        let planets = planets?;

        tracing::debug!("State: Normalizing");
        let (houses, ascendant, midheaven, planet_houses) = match lookup {
            HouseLookup::Cached(entry, ring) => {
                tracing::debug!("State: AssigningHouses (cached cusps)");
                let planet_houses = assign_planets(&ring, &planets);
                (
                    HouseResult::success(entry.houses),
                    Some(entry.ascendant),
                    Some(entry.midheaven),
                    Some(planet_houses),
                )
            }
            HouseLookup::Computed(raw, ring) => {
                tracing::debug!("State: AssigningHouses");
                let cusps: [HouseCusp; 12] =
                    std::array::from_fn(|i| HouseCusp::from_degree(i as u8 + 1, ring.cusps()[i]));
                let ascendant = AngleData::from_degree(raw.ascendant);
                let midheaven = AngleData::from_degree(raw.midheaven);
                let planet_houses = assign_planets(&ring, &planets);

                let entry = HouseCacheEntry {
                    houses: cusps.clone(),
                    ascendant: ascendant.clone(),
                    midheaven: midheaven.clone(),
                    planet_houses: planet_houses.clone(),
                    ttl: self.cache.expiry_from_now(),
                    created_at: Utc::now(),
                };
                self.cache.put(&input_hash, &entry).await;

                (
                    HouseResult::success(cusps),
                    Some(ascendant),
                    Some(midheaven),
                    Some(planet_houses),
                )
            }
            HouseLookup::Unavailable(err) => {
                tracing::warn!("Continuing without houses: {}", err);
                (HouseResult::failed(err.to_string()), None, None, None)
            }
        };

        tracing::debug!("State: Assembled");
        Ok(NatalChartRecord {
            birth_info: event,
            planets,
            houses,
            ascendant,
            midheaven,
            planet_houses,
            metadata: ChartMetadata {
                calculation_timestamp: Utc::now(),
                algo_version: self.config.algo_version.clone(),
                ephemeris_version: self.ephemeris.version().to_string(),
                input_hash,
            },
        })
    }

    async fn compute_planets(
        &self,
        event: &BirthEvent,
        utc: &UtcBirth,
    ) -> Result<BTreeMap<Planet, PlanetPosition>> {
        tracing::debug!("State: ComputingPlanets");
        let timeout = self.config.backend_timeout();
        let raw = match tokio::time::timeout(
            timeout,
            self.ephemeris.compute_planets(
                utc.instant,
                event.latitude(),
                event.longitude(),
                utc.offset_hours,
            ),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e @ ChartError::Computation { .. })) => return Err(e),
            Ok(Err(e)) => return Err(ChartError::computation(e.to_string())),
            Err(_) => {
                return Err(ChartError::computation(format!(
                    "ephemeris timed out after {:?}",
                    timeout
                )))
            }
        };

        let mut planets = BTreeMap::new();
        for planet in Planet::all() {
            let body = raw.get(planet).ok_or_else(|| {
                ChartError::computation(format!("ephemeris response lacks {}", planet))
            })?;
            if !body.longitude.is_finite() {
                return Err(ChartError::computation(format!(
                    "ephemeris returned non-finite longitude for {}",
                    planet
                )));
            }

            let longitude = normalize_degrees(body.longitude);
            let position = normalize(longitude);
            planets.insert(
                *planet,
                PlanetPosition {
                    name: *planet,
                    longitude,
                    longitude_dms: format_dms(longitude),
                    distance: body.distance,
                    sign: position.sign,
                    degree_in_sign: position.degree_in_sign,
                    minutes: position.minutes,
                },
            );
        }
        Ok(planets)
    }

    async fn lookup_houses(&self, key: &str, event: &BirthEvent, utc: &UtcBirth) -> HouseLookup {
        tracing::debug!("State: CacheLookup");
        if let Some(entry) = self.cache.get(key).await {
            match CuspRing::from_houses(&entry.houses) {
                Ok(ring) => return HouseLookup::Cached(entry, ring),
                Err(e) => tracing::warn!("Ignoring cached houses for {}: {}", key, e),
            }
        }

        let Some(backend) = &self.houses else {
            return HouseLookup::Unavailable(ChartError::house_backend(
                "house backend is not installed",
            ));
        };

        tracing::debug!("State: ComputingHouses");
        let jd = julian_day(utc.instant);
        let timeout = self.config.backend_timeout();
        let raw = match tokio::time::timeout(
            timeout,
            backend.compute_houses(
                jd,
                event.latitude(),
                event.longitude(),
                self.config.house_system,
            ),
        )
        .await
        {
            Ok(Ok(raw)) => raw,
            Ok(Err(e @ ChartError::HouseBackendUnavailable { .. })) => {
                return HouseLookup::Unavailable(e)
            }
            Ok(Err(e)) => return HouseLookup::Unavailable(ChartError::house_backend(e.to_string())),
            Err(_) => {
                return HouseLookup::Unavailable(ChartError::house_backend(format!(
                    "timed out after {:?}",
                    timeout
                )))
            }
        };

        let cusps = raw.cusps.map(normalize_degrees);
        if !raw.ascendant.is_finite() || !raw.midheaven.is_finite() {
            return HouseLookup::Unavailable(ChartError::house_backend(
                "house backend returned non-finite angles",
            ));
        }

        match CuspRing::new(cusps) {
            Ok(ring) => HouseLookup::Computed(raw, ring),
            Err(e) => HouseLookup::Unavailable(e),
        }
    }
}

fn assign_planets(
    ring: &CuspRing,
    planets: &BTreeMap<Planet, PlanetPosition>,
) -> BTreeMap<Planet, u8> {
    planets
        .iter()
        .map(|(planet, position)| (*planet, ring.assign(position.longitude)))
        .collect()
}
