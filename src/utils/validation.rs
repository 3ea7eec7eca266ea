use crate::utils::error::{ChartError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(ChartError::InvalidConfigValue {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ChartError::InvalidConfigValue {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// Required free-text input; empty or whitespace-only counts as missing.
pub fn require_text(field_name: &str, value: Option<&str>) -> Result<String> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ChartError::MissingField {
            field: field_name.to_string(),
        }),
    }
}

/// Required coordinate; zero is a valid value, non-finite values are out of range.
pub fn require_coordinate(field_name: &str, value: Option<f64>, limit: f64) -> Result<f64> {
    let value = value.ok_or_else(|| ChartError::MissingField {
        field: field_name.to_string(),
    })?;

    if !value.is_finite() || value < -limit || value > limit {
        return Err(ChartError::OutOfRange {
            field: field_name.to_string(),
            value,
            min: -limit,
            max: limit,
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("ephemeris_endpoint", "https://example.com").is_ok());
        assert!(validate_url("ephemeris_endpoint", "http://example.com").is_ok());
        assert!(validate_url("ephemeris_endpoint", "").is_err());
        assert!(validate_url("ephemeris_endpoint", "invalid-url").is_err());
        assert!(validate_url("ephemeris_endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_require_text_treats_blank_as_missing() {
        assert_eq!(require_text("birthDate", Some(" 2000-01-01 ")).unwrap(), "2000-01-01");
        assert!(matches!(
            require_text("birthDate", Some("   ")),
            Err(ChartError::MissingField { .. })
        ));
        assert!(matches!(
            require_text("birthDate", None),
            Err(ChartError::MissingField { .. })
        ));
    }

    #[test]
    fn test_require_coordinate() {
        assert_eq!(require_coordinate("latitude", Some(0.0), 90.0).unwrap(), 0.0);
        assert_eq!(require_coordinate("latitude", Some(-90.0), 90.0).unwrap(), -90.0);
        assert!(matches!(
            require_coordinate("latitude", Some(90.5), 90.0),
            Err(ChartError::OutOfRange { .. })
        ));
        assert!(matches!(
            require_coordinate("longitude", Some(f64::NAN), 180.0),
            Err(ChartError::OutOfRange { .. })
        ));
        assert!(matches!(
            require_coordinate("longitude", None, 180.0),
            Err(ChartError::MissingField { .. })
        ));
    }
}
