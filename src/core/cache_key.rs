use crate::domain::model::{HouseSystem, ZodiacMode};
use chrono::{NaiveDate, NaiveTime};
use sha2::{Digest, Sha256};

/// Inputs besides the birth moment that change house geometry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeySettings {
    pub house_system: HouseSystem,
    pub zodiac_mode: ZodiacMode,
    pub algo_version: String,
}

/// Canonical string hashed into the cache key.
///
/// Only date, time and coordinates take part; requester identity and the time
/// zone name do not change the houses and are left out.
pub fn canonical_input(
    birth_date: NaiveDate,
    birth_time: NaiveTime,
    latitude: f64,
    longitude: f64,
    settings: &KeySettings,
) -> String {
    format!(
        "{}T{}Z_{}_{}_{}_{}_{}",
        birth_date.format("%Y-%m-%d"),
        birth_time.format("%H:%M:%S"),
        // -0.0 + 0.0 is +0.0, so both zeros print as "0"
        latitude + 0.0,
        longitude + 0.0,
        settings.house_system.code(),
        settings.zodiac_mode.as_str(),
        settings.algo_version
    )
}

/// SHA-256 of the canonical input, lowercase hex.
pub fn derive_key(
    birth_date: NaiveDate,
    birth_time: NaiveTime,
    latitude: f64,
    longitude: f64,
    settings: &KeySettings,
) -> String {
    let canonical = canonical_input(birth_date, birth_time, latitude, longitude, settings);
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
