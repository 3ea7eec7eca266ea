use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// The ten bodies every natal chart carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Planet {
    Sun,
    Moon,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

pub const ALL_PLANETS: [Planet; 10] = [
    Planet::Sun,
    Planet::Moon,
    Planet::Mercury,
    Planet::Venus,
    Planet::Mars,
    Planet::Jupiter,
    Planet::Saturn,
    Planet::Uranus,
    Planet::Neptune,
    Planet::Pluto,
];

impl Planet {
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sun => "sun",
            Self::Moon => "moon",
            Self::Mercury => "mercury",
            Self::Venus => "venus",
            Self::Mars => "mars",
            Self::Jupiter => "jupiter",
            Self::Saturn => "saturn",
            Self::Uranus => "uranus",
            Self::Neptune => "neptune",
            Self::Pluto => "pluto",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        ALL_PLANETS
            .iter()
            .copied()
            .find(|planet| planet.name().eq_ignore_ascii_case(name))
    }

    pub const fn all() -> &'static [Planet; 10] {
        &ALL_PLANETS
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tropical zodiac signs, 30 degrees each starting from Aries at 0 degrees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

pub const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Sign for a 0-based index; indices wrap modulo 12.
    pub const fn from_index(index: usize) -> Self {
        ALL_SIGNS[index % 12]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// House division method offered by the house backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseSystem {
    #[default]
    Placidus,
}

impl HouseSystem {
    /// Single-letter code understood by Swiss Ephemeris style backends.
    pub const fn code(self) -> char {
        match self {
            Self::Placidus => 'P',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZodiacMode {
    #[default]
    Tropical,
}

impl ZodiacMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Tropical => "tropical",
        }
    }
}

/// Birth data as it arrives from the caller, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBirthEvent {
    pub birth_date: Option<String>,
    pub birth_time: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub iana_time_zone: Option<String>,
}

/// Validated birth data. Only the validator builds one.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BirthEvent {
    #[serde(serialize_with = "serialize_date")]
    pub(crate) birth_date: NaiveDate,
    #[serde(serialize_with = "serialize_time")]
    pub(crate) birth_time: NaiveTime,
    pub(crate) latitude: f64,
    pub(crate) longitude: f64,
    pub(crate) iana_time_zone: String,
}

impl BirthEvent {
    pub fn birth_date(&self) -> NaiveDate {
        self.birth_date
    }

    pub fn birth_time(&self) -> NaiveTime {
        self.birth_time
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn iana_time_zone(&self) -> &str {
        &self.iana_time_zone
    }
}

fn serialize_date<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&date.format("%Y-%m-%d"))
}

fn serialize_time<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(&time.format("%H:%M"))
}

/// One body as reported by the ephemeris backend.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPlanet {
    pub longitude: f64,
    pub distance: f64,
}

/// House geometry as reported by the house backend, in raw degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawHouses {
    pub cusps: [f64; 12],
    pub ascendant: f64,
    pub midheaven: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanetPosition {
    pub name: Planet,
    pub longitude: f64,
    pub longitude_dms: String,
    pub distance: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: u8,
    pub minutes: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AngleData {
    pub degree: f64,
    pub sign: ZodiacSign,
    pub degree_in_sign: u8,
    pub minutes: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseCusp {
    pub house_number: u8,
    pub cusp_degree: f64,
    pub cusp_sign: ZodiacSign,
    pub cusp_degree_in_sign: u8,
    pub cusp_minutes: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HouseStatus {
    Success,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseResult {
    pub status: HouseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<[HouseCusp; 12]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HouseResult {
    pub fn success(data: [HouseCusp; 12]) -> Self {
        Self {
            status: HouseStatus::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            status: HouseStatus::Failed,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMetadata {
    pub calculation_timestamp: DateTime<Utc>,
    pub algo_version: String,
    pub ephemeris_version: String,
    pub input_hash: String,
}

/// Final chart handed to the caller; persistence is the caller's concern.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NatalChartRecord {
    pub birth_info: BirthEvent,
    pub planets: BTreeMap<Planet, PlanetPosition>,
    pub houses: HouseResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ascendant: Option<AngleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub midheaven: Option<AngleData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planet_houses: Option<BTreeMap<Planet, u8>>,
    pub metadata: ChartMetadata,
}

/// Cached house computation, keyed by the derived cache key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HouseCacheEntry {
    pub houses: [HouseCusp; 12],
    pub ascendant: AngleData,
    pub midheaven: AngleData,
    pub planet_houses: BTreeMap<Planet, u8>,
    /// Expiry as epoch seconds.
    pub ttl: i64,
    pub created_at: DateTime<Utc>,
}

impl HouseCacheEntry {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.ttl <= now.timestamp()
    }
}
