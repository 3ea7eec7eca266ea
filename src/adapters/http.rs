use crate::domain::model::{HouseSystem, Planet, RawHouses, RawPlanet};
use crate::domain::ports::{EphemerisPort, HouseSystemPort};
use crate::utils::error::{ChartError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PlanetsRequest {
    datetime_utc: String,
    latitude: f64,
    longitude: f64,
    timezone_offset: f64,
}

#[derive(Deserialize)]
struct PlanetsResponse {
    planets: HashMap<String, RawPlanet>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HousesRequest {
    julian_day: f64,
    latitude: f64,
    longitude: f64,
    house_system: String,
}

/// Ephemeris service reached over JSON/HTTP.
pub struct HttpEphemeris {
    client: Client,
    endpoint: String,
    version: String,
}

impl HttpEphemeris {
    pub fn new(endpoint: impl Into<String>, version: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint, version)
    }

    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            version: version.into(),
        }
    }

    async fn request(&self, body: &PlanetsRequest) -> Result<PlanetsResponse> {
        let response = self
            .client
            .post(&self.endpoint)
            .json(body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl EphemerisPort for HttpEphemeris {
    async fn compute_planets(
        &self,
        birth_utc: DateTime<Utc>,
        latitude: f64,
        longitude: f64,
        tz_offset_hours: f64,
    ) -> Result<HashMap<Planet, RawPlanet>> {
        let body = PlanetsRequest {
            datetime_utc: birth_utc.to_rfc3339_opts(SecondsFormat::Secs, true),
            latitude,
            longitude,
            timezone_offset: tz_offset_hours,
        };

        tracing::debug!("Requesting planets from {}", self.endpoint);
        let response = self
            .request(&body)
            .await
            .map_err(|e| ChartError::computation(format!("ephemeris request failed: {}", e)))?;

        let mut planets = HashMap::new();
        for (name, raw) in response.planets {
            match Planet::from_name(&name) {
                Some(planet) => {
                    planets.insert(planet, raw);
                }
                None => tracing::debug!("Ignoring extra body '{}' from ephemeris", name),
            }
        }
        Ok(planets)
    }

    fn version(&self) -> &str {
        &self.version
    }
}

/// House service reached over JSON/HTTP.
pub struct HttpHouseSystem {
    client: Client,
    endpoint: String,
}

impl HttpHouseSystem {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(Client::new(), endpoint)
    }

    pub fn with_client(client: Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl HouseSystemPort for HttpHouseSystem {
    async fn compute_houses(
        &self,
        julian_day: f64,
        latitude: f64,
        longitude: f64,
        house_system: HouseSystem,
    ) -> Result<RawHouses> {
        let body = HousesRequest {
            julian_day,
            latitude,
            longitude,
            house_system: house_system.code().to_string(),
        };

        tracing::debug!("Requesting houses from {} for JD {}", self.endpoint, julian_day);
        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChartError::house_backend(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChartError::house_backend(format!(
                "house service returned {}",
                response.status()
            )));
        }

        response
            .json::<RawHouses>()
            .await
            .map_err(|e| ChartError::house_backend(format!("undecodable house response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn test_ephemeris_maps_known_bodies() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/planets")
                .json_body_partial(r#"{"datetimeUtc": "1879-03-14T10:30:00Z"}"#);
            then.status(200).json_body(serde_json::json!({
                "planets": {
                    "sun": {"longitude": 353.5, "distance": 0.99},
                    "moon": {"longitude": 254.0, "distance": 0.0026},
                    "chiron": {"longitude": 12.0, "distance": 17.0}
                }
            }));
        });

        let ephemeris = HttpEphemeris::new(server.url("/planets"), "test-1");
        let birth = Utc.with_ymd_and_hms(1879, 3, 14, 10, 30, 0).unwrap();
        let planets = ephemeris.compute_planets(birth, 48.4, 9.99, 1.0).await.unwrap();

        api_mock.assert();
        assert_eq!(planets.len(), 2);
        assert_eq!(planets[&Planet::Sun].longitude, 353.5);
        assert_eq!(ephemeris.version(), "test-1");
    }

    #[tokio::test]
    async fn test_ephemeris_failure_is_computation_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/planets");
            then.status(503);
        });

        let ephemeris = HttpEphemeris::new(server.url("/planets"), "test-1");
        let birth = Utc.with_ymd_and_hms(2000, 1, 1, 12, 0, 0).unwrap();
        let result = ephemeris.compute_planets(birth, 0.0, 0.0, 0.0).await;
        assert!(matches!(result, Err(ChartError::Computation { .. })));
    }

    #[tokio::test]
    async fn test_house_system_sends_placidus_code() {
        let server = MockServer::start();
        let cusps: Vec<f64> = (0..12).map(|i| i as f64 * 30.0).collect();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/houses")
                .json_body_partial(r#"{"houseSystem": "P"}"#);
            then.status(200).json_body(serde_json::json!({
                "cusps": cusps,
                "ascendant": 0.0,
                "midheaven": 270.0
            }));
        });

        let houses = HttpHouseSystem::new(server.url("/houses"));
        let raw = houses
            .compute_houses(2_451_545.0, 51.5, -0.12, HouseSystem::Placidus)
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(raw.cusps[3], 90.0);
        assert_eq!(raw.midheaven, 270.0);
    }

    #[tokio::test]
    async fn test_short_cusp_list_is_unavailable() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/houses");
            then.status(200).json_body(serde_json::json!({
                "cusps": [0.0, 30.0],
                "ascendant": 0.0,
                "midheaven": 270.0
            }));
        });

        let houses = HttpHouseSystem::new(server.url("/houses"));
        let result = houses
            .compute_houses(2_451_545.0, 51.5, -0.12, HouseSystem::Placidus)
            .await;
        assert!(matches!(
            result,
            Err(ChartError::HouseBackendUnavailable { .. })
        ));
    }
}
