#[cfg(feature = "cli")]
pub mod cli;
pub mod lambda;
pub mod toml_config;

use crate::core::cache_key::KeySettings;
use crate::core::house_cache::{DEFAULT_KEY_PREFIX, DEFAULT_TTL_DAYS};
use crate::domain::model::{HouseSystem, ZodiacMode};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_ALGO_VERSION: &str = "1.0.0";
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 5;

/// Settings that shape chart computation and caching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Embedded in every cache key; bumping it invalidates all cached houses.
    pub algo_version: String,
    pub house_system: HouseSystem,
    pub zodiac_mode: ZodiacMode,
    pub cache_ttl_days: i64,
    pub cache_key_prefix: String,
    pub backend_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            algo_version: DEFAULT_ALGO_VERSION.to_string(),
            house_system: HouseSystem::default(),
            zodiac_mode: ZodiacMode::default(),
            cache_ttl_days: DEFAULT_TTL_DAYS,
            cache_key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            backend_timeout_secs: DEFAULT_BACKEND_TIMEOUT_SECS,
        }
    }
}

impl EngineConfig {
    pub fn key_settings(&self) -> KeySettings {
        KeySettings {
            house_system: self.house_system,
            zodiac_mode: self.zodiac_mode,
            algo_version: self.algo_version.clone(),
        }
    }

    pub fn cache_ttl(&self) -> chrono::Duration {
        chrono::Duration::days(self.cache_ttl_days)
    }

    pub fn backend_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.backend_timeout_secs)
    }
}

impl Validate for EngineConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("engine.algo_version", &self.algo_version)?;
        validate_non_empty_string("engine.cache_key_prefix", &self.cache_key_prefix)?;
        validate_range("engine.cache_ttl_days", self.cache_ttl_days, 1, 365)?;
        validate_range("engine.backend_timeout_secs", self.backend_timeout_secs, 1, 60)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.cache_ttl(), chrono::Duration::days(30));
        assert_eq!(config.backend_timeout(), std::time::Duration::from_secs(5));
        assert_eq!(config.key_settings().algo_version, "1.0.0");
    }

    #[test]
    fn test_rejects_zero_timeout_and_blank_version() {
        let config = EngineConfig {
            backend_timeout_secs: 0,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());

        let config = EngineConfig {
            algo_version: " ".to_string(),
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
