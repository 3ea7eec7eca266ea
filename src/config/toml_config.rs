use crate::config::EngineConfig;
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{validate_path, validate_url, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    pub backends: BackendsConfig,
    pub cache: Option<CacheConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendsConfig {
    pub ephemeris_endpoint: String,
    pub ephemeris_version: Option<String>,
    /// Left out when no house backend is installed.
    pub houses_endpoint: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub directory: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ChartError::Config {
            message: format!("TOML parsing error: {}", e),
        })
    }

    pub fn ephemeris_version(&self) -> &str {
        self.backends.ephemeris_version.as_deref().unwrap_or("remote")
    }

    pub fn cache_directory(&self) -> Option<&str> {
        self.cache.as_ref().and_then(|cache| cache.directory.as_deref())
    }
}

/// 替換環境變數 (例如 ${EPHEMERIS_HOST})，未設定的保持原樣
fn substitute_env_vars(content: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        validate_url("backends.ephemeris_endpoint", &self.backends.ephemeris_endpoint)?;
        if let Some(endpoint) = &self.backends.houses_endpoint {
            validate_url("backends.houses_endpoint", endpoint)?;
        }
        if let Some(directory) = self.cache_directory() {
            validate_path("cache.directory", directory)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::HouseSystem;
    use tempfile::TempDir;

    #[test]
    fn test_full_config() {
        let config = TomlConfig::from_toml_str(
            r#"
[engine]
algo_version = "2.1.0"
house_system = "placidus"
zodiac_mode = "tropical"
cache_ttl_days = 7
backend_timeout_secs = 3

[backends]
ephemeris_endpoint = "https://ephemeris.example.com/planets"
ephemeris_version = "swisseph-2.10"
houses_endpoint = "https://ephemeris.example.com/houses"

[cache]
directory = "/tmp/natal-cache"
"#,
        )
        .unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.engine.algo_version, "2.1.0");
        assert_eq!(config.engine.house_system, HouseSystem::Placidus);
        assert_eq!(config.engine.cache_ttl_days, 7);
        assert_eq!(config.engine.cache_key_prefix, "HOUSES#");
        assert_eq!(config.ephemeris_version(), "swisseph-2.10");
        assert_eq!(config.cache_directory(), Some("/tmp/natal-cache"));
    }

    #[test]
    fn test_engine_table_is_optional() {
        let config = TomlConfig::from_toml_str(
            r#"
[backends]
ephemeris_endpoint = "http://localhost:9000/planets"
"#,
        )
        .unwrap();

        assert_eq!(config.engine, EngineConfig::default());
        assert!(config.backends.houses_endpoint.is_none());
        assert_eq!(config.ephemeris_version(), "remote");
    }

    #[test]
    fn test_env_substitution() {
        std::env::set_var("NATAL_TEST_EPHEMERIS_HOST", "ephemeris.internal");
        let config = TomlConfig::from_toml_str(
            r#"
[backends]
ephemeris_endpoint = "https://${NATAL_TEST_EPHEMERIS_HOST}/planets"
houses_endpoint = "https://${NATAL_TEST_UNSET_VARIABLE}/houses"
"#,
        )
        .unwrap();

        assert_eq!(
            config.backends.ephemeris_endpoint,
            "https://ephemeris.internal/planets"
        );
        assert_eq!(
            config.backends.houses_endpoint.as_deref(),
            Some("https://${NATAL_TEST_UNSET_VARIABLE}/houses")
        );
    }

    #[test]
    fn test_invalid_endpoint_fails_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[backends]
ephemeris_endpoint = "ftp://ephemeris.example.com"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("natal.toml");
        std::fs::write(
            &path,
            "[backends]\nephemeris_endpoint = \"http://localhost:9000/planets\"\n",
        )
        .unwrap();

        let config = TomlConfig::from_file(&path).unwrap();
        assert_eq!(config.backends.ephemeris_endpoint, "http://localhost:9000/planets");
        assert!(TomlConfig::from_file(temp_dir.path().join("missing.toml")).is_err());
    }
}
