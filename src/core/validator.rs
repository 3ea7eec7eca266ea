use crate::domain::model::{BirthEvent, RawBirthEvent};
use crate::utils::error::{ChartError, Result};
use crate::utils::validation::{require_coordinate, require_text};
use chrono::{NaiveDate, NaiveTime};
use chrono_tz::Tz;

const MAX_LATITUDE: f64 = 90.0;
const MAX_LONGITUDE: f64 = 180.0;

/// Validate raw birth data into a [`BirthEvent`].
///
/// Every field is required, including the birth time: callers that allow an
/// unknown time must substitute their own estimate before calling this.
pub fn validate(raw: &RawBirthEvent) -> Result<BirthEvent> {
    let date_text = require_text("birthDate", raw.birth_date.as_deref())?;
    let time_text = require_text("birthTime", raw.birth_time.as_deref())?;
    let latitude = require_coordinate("latitude", raw.latitude, MAX_LATITUDE)?;
    let longitude = require_coordinate("longitude", raw.longitude, MAX_LONGITUDE)?;
    let zone_text = require_text("ianaTimeZone", raw.iana_time_zone.as_deref())?;

    let birth_date = parse_date(&date_text)?;
    let birth_time = parse_time(&time_text)?;

    // 只確認時區存在，換算 UTC 在 time 模組
    zone_text
        .parse::<Tz>()
        .map_err(|_| ChartError::InvalidFormat {
            field: "ianaTimeZone".to_string(),
            value: zone_text.clone(),
            reason: "unknown IANA time zone".to_string(),
        })?;

    Ok(BirthEvent {
        birth_date,
        birth_time,
        latitude,
        longitude,
        iana_time_zone: zone_text,
    })
}

fn parse_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|e| ChartError::InvalidFormat {
        field: "birthDate".to_string(),
        value: text.to_string(),
        reason: format!("expected YYYY-MM-DD: {}", e),
    })
}

fn parse_time(text: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(text, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
        .map_err(|e| ChartError::InvalidFormat {
            field: "birthTime".to_string(),
            value: text.to_string(),
            reason: format!("expected HH:MM: {}", e),
        })
}
