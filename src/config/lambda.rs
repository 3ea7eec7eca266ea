use crate::config::EngineConfig;
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_url, Validate};
use std::collections::HashMap;

/// Settings for the Lambda handler, read from its environment.
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub ephemeris_endpoint: String,
    pub ephemeris_version: String,
    pub houses_endpoint: Option<String>,
    pub cache_table_name: String,
    pub region: String,
    pub engine: EngineConfig,
}

impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(std::env::vars().collect())
    }

    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self> {
        let required = |name: &str| {
            vars.get(name)
                .filter(|value| !value.trim().is_empty())
                .cloned()
                .ok_or_else(|| ChartError::Config {
                    message: format!("{} environment variable is required", name),
                })
        };

        let defaults = EngineConfig::default();
        let engine = EngineConfig {
            algo_version: vars
                .get("ALGO_VERSION")
                .cloned()
                .unwrap_or(defaults.algo_version.clone()),
            cache_ttl_days: parse_or("CACHE_TTL_DAYS", &vars, defaults.cache_ttl_days)?,
            backend_timeout_secs: parse_or(
                "BACKEND_TIMEOUT_SECS",
                &vars,
                defaults.backend_timeout_secs,
            )?,
            ..defaults
        };

        Ok(Self {
            ephemeris_endpoint: required("EPHEMERIS_ENDPOINT")?,
            ephemeris_version: vars
                .get("EPHEMERIS_VERSION")
                .cloned()
                .unwrap_or_else(|| "remote".to_string()),
            houses_endpoint: vars
                .get("HOUSES_ENDPOINT")
                .filter(|value| !value.trim().is_empty())
                .cloned(),
            cache_table_name: required("HOUSE_CACHE_TABLE_NAME")?,
            region: vars
                .get("AWS_REGION")
                .cloned()
                .unwrap_or_else(|| "us-east-1".to_string()),
            engine,
        })
    }
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    vars: &HashMap<String, String>,
    default: T,
) -> Result<T> {
    match vars.get(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ChartError::InvalidConfigValue {
                field: name.to_string(),
                value: value.clone(),
                reason: "not a whole number".to_string(),
            }),
        None => Ok(default),
    }
}

impl Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        validate_url("EPHEMERIS_ENDPOINT", &self.ephemeris_endpoint)?;
        if let Some(endpoint) = &self.houses_endpoint {
            validate_url("HOUSES_ENDPOINT", endpoint)?;
        }
        validate_non_empty_string("HOUSE_CACHE_TABLE_NAME", &self.cache_table_name)?;
        validate_non_empty_string("AWS_REGION", &self.region)?;

        tracing::info!("✅ Lambda configuration validation passed");
        Ok(())
    }
}
