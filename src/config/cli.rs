use crate::config::toml_config::TomlConfig;
use crate::config::EngineConfig;
use crate::domain::model::RawBirthEvent;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_url, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CACHE_DIR: &str = "./.natal-cache";

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "natal-chart")]
#[command(about = "Compute a natal chart from birth date, time and place")]
pub struct CliConfig {
    #[arg(long, help = "Birth date as YYYY-MM-DD")]
    pub date: Option<String>,

    #[arg(long, help = "Local birth time as HH:MM")]
    pub time: Option<String>,

    #[arg(long, allow_hyphen_values = true, help = "Latitude in degrees, north positive")]
    pub lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true, help = "Longitude in degrees, east positive")]
    pub lon: Option<f64>,

    #[arg(long, help = "IANA time zone, e.g. Europe/Berlin")]
    pub tz: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Ephemeris service endpoint (overrides the config file)")]
    pub ephemeris_endpoint: Option<String>,

    #[arg(long, help = "House service endpoint; houses are skipped when absent")]
    pub houses_endpoint: Option<String>,

    #[arg(long, help = "House cache directory [default: ./.natal-cache]")]
    pub cache_dir: Option<String>,

    #[arg(long, help = "Keep the house cache in memory only")]
    pub no_cache: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

/// Settings resolved from the command line and an optional config file.
#[derive(Debug, Clone)]
pub struct ResolvedCli {
    pub engine: EngineConfig,
    pub ephemeris_endpoint: String,
    pub ephemeris_version: String,
    pub houses_endpoint: Option<String>,
    pub cache_dir: Option<String>,
}

impl CliConfig {
    pub fn raw_event(&self) -> RawBirthEvent {
        RawBirthEvent {
            birth_date: self.date.clone(),
            birth_time: self.time.clone(),
            latitude: self.lat,
            longitude: self.lon,
            iana_time_zone: self.tz.clone(),
        }
    }

    /// 命令列參數優先於設定檔
    pub fn resolve(&self) -> Result<ResolvedCli> {
        let file = match &self.config {
            Some(path) => Some(TomlConfig::from_file(path)?),
            None => None,
        };

        let ephemeris_endpoint = self
            .ephemeris_endpoint
            .clone()
            .or_else(|| file.as_ref().map(|f| f.backends.ephemeris_endpoint.clone()))
            .unwrap_or_default();
        let houses_endpoint = self
            .houses_endpoint
            .clone()
            .or_else(|| file.as_ref().and_then(|f| f.backends.houses_endpoint.clone()));
        let cache_dir = if self.no_cache {
            None
        } else {
            Some(
                self.cache_dir
                    .clone()
                    .or_else(|| file.as_ref().and_then(|f| f.cache_directory().map(str::to_string)))
                    .unwrap_or_else(|| DEFAULT_CACHE_DIR.to_string()),
            )
        };

        Ok(ResolvedCli {
            engine: file.as_ref().map(|f| f.engine.clone()).unwrap_or_default(),
            ephemeris_version: file
                .as_ref()
                .map(|f| f.ephemeris_version().to_string())
                .unwrap_or_else(|| "remote".to_string()),
            ephemeris_endpoint,
            houses_endpoint,
            cache_dir,
        })
    }
}

impl Validate for ResolvedCli {
    fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        validate_url("ephemeris_endpoint", &self.ephemeris_endpoint)?;
        if let Some(endpoint) = &self.houses_endpoint {
            validate_url("houses_endpoint", endpoint)?;
        }
        if let Some(dir) = &self.cache_dir {
            validate_path("cache_dir", dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parses_negative_coordinates() {
        let cli = CliConfig::parse_from([
            "natal-chart",
            "--date",
            "1990-01-01",
            "--time",
            "12:00",
            "--lat",
            "-33.87",
            "--lon",
            "-74.006",
            "--tz",
            "America/New_York",
            "--ephemeris-endpoint",
            "http://localhost:9000/planets",
        ]);

        let raw = cli.raw_event();
        assert_eq!(raw.latitude, Some(-33.87));
        assert_eq!(raw.longitude, Some(-74.006));

        let resolved = cli.resolve().unwrap();
        assert!(resolved.validate().is_ok());
        assert_eq!(resolved.cache_dir.as_deref(), Some("./.natal-cache"));
        assert!(resolved.houses_endpoint.is_none());
    }

    #[test]
    fn test_flags_override_config_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("natal.toml");
        std::fs::write(
            &path,
            r#"
[engine]
algo_version = "3.0.0"

[backends]
ephemeris_endpoint = "http://file-host/planets"
houses_endpoint = "http://file-host/houses"
"#,
        )
        .unwrap();

        let cli = CliConfig::parse_from([
            "natal-chart",
            "--config",
            path.to_str().unwrap(),
            "--ephemeris-endpoint",
            "http://flag-host/planets",
            "--no-cache",
        ]);

        let resolved = cli.resolve().unwrap();
        assert_eq!(resolved.engine.algo_version, "3.0.0");
        assert_eq!(resolved.ephemeris_endpoint, "http://flag-host/planets");
        assert_eq!(resolved.houses_endpoint.as_deref(), Some("http://file-host/houses"));
        assert!(resolved.cache_dir.is_none());
    }

    #[test]
    fn test_missing_ephemeris_endpoint_fails_validation() {
        let cli = CliConfig::parse_from(["natal-chart"]);
        assert!(cli.resolve().unwrap().validate().is_err());
    }

    #[test]
    fn test_cache_dir_precedence() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("natal.toml");
        std::fs::write(
            &path,
            r#"
[backends]
ephemeris_endpoint = "http://file-host/planets"

[cache]
directory = "/var/cache/natal-from-file"
"#,
        )
        .unwrap();
        let config_path = path.to_str().unwrap();

        let from_flag = CliConfig::parse_from([
            "natal-chart",
            "--config",
            config_path,
            "--cache-dir",
            "/tmp/natal-from-flag",
        ]);
        assert_eq!(
            from_flag.resolve().unwrap().cache_dir.as_deref(),
            Some("/tmp/natal-from-flag")
        );

        let from_file = CliConfig::parse_from(["natal-chart", "--config", config_path]);
        assert_eq!(
            from_file.resolve().unwrap().cache_dir.as_deref(),
            Some("/var/cache/natal-from-file")
        );
    }
}
