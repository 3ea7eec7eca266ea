//! Local birth time to UTC, and UTC to Julian Day.

use crate::domain::model::BirthEvent;
use crate::utils::error::{ChartError, Result};
use chrono::{DateTime, Datelike, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Birth moment in UTC together with the zone offset that produced it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtcBirth {
    pub instant: DateTime<Utc>,
    pub offset_hours: f64,
}

/// Resolve the local birth time in its IANA zone.
///
/// Ambiguous wall-clock times (end of daylight saving) take the earlier
/// instant. Times that fall in a spring-forward gap use the offset in force
/// at that reading taken as UTC.
pub fn to_utc(event: &BirthEvent) -> Result<UtcBirth> {
    let zone: Tz = event
        .iana_time_zone()
        .parse()
        .map_err(|_| ChartError::InvalidFormat {
            field: "ianaTimeZone".to_string(),
            value: event.iana_time_zone().to_string(),
            reason: "unknown IANA time zone".to_string(),
        })?;
    let local = NaiveDateTime::new(event.birth_date(), event.birth_time());

    let offset = match zone.from_local_datetime(&local) {
        LocalResult::Single(dt) => dt.offset().fix(),
        LocalResult::Ambiguous(earliest, _) => earliest.offset().fix(),
        LocalResult::None => {
            tracing::debug!(
                "Local time {} does not exist in {}, using surrounding offset",
                local,
                zone
            );
            zone.offset_from_utc_datetime(&local).fix()
        }
    };

    let offset_seconds = offset.local_minus_utc();
    let instant = (local - chrono::Duration::seconds(offset_seconds as i64)).and_utc();

    Ok(UtcBirth {
        instant,
        offset_hours: offset_seconds as f64 / 3600.0,
    })
}

/// Julian Day for a UTC instant on the Gregorian calendar.
pub fn julian_day(instant: DateTime<Utc>) -> f64 {
    let day_fraction = (instant.hour() as f64
        + instant.minute() as f64 / 60.0
        + (instant.second() as f64 + instant.nanosecond() as f64 / 1e9) / 3600.0)
        / 24.0;

    calendar_to_jd(
        instant.year(),
        instant.month(),
        instant.day() as f64 + day_fraction,
    )
}

fn calendar_to_jd(year: i32, month: u32, day: f64) -> f64 {
    let (y, m) = if month <= 2 {
        (year as f64 - 1.0, month as f64 + 12.0)
    } else {
        (year as f64, month as f64)
    };
    let a = (y / 100.0).floor();
    let b = 2.0 - a + (a / 4.0).floor();

    (365.25 * (y + 4716.0)).floor() + (30.6001 * (m + 1.0)).floor() + day + b - 1524.5
}
