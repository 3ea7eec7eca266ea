//! Zodiac notation for ecliptic longitudes.
//!
//! The ecliptic is split into 12 signs of 30 degrees each, Aries first. A raw
//! longitude becomes a sign, whole degrees within the sign, and rounded
//! arc-minutes.

use crate::domain::model::{AngleData, HouseCusp, ZodiacSign};

const FULL_CIRCLE: f64 = 360.0;
const SIGN_SPAN: f64 = 30.0;

/// Sign placement of a longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZodiacPosition {
    pub sign: ZodiacSign,
    /// Whole degrees within the sign (0..29).
    pub degree_in_sign: u8,
    /// Rounded arc-minutes (0..59).
    pub minutes: u8,
}

/// Reduce any finite angle into `[0, 360)`.
pub fn normalize_degrees(degree: f64) -> f64 {
    let reduced = degree.rem_euclid(FULL_CIRCLE);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if reduced >= FULL_CIRCLE {
        0.0
    } else {
        reduced
    }
}

/// Convert a longitude into sign, degree and minutes.
///
/// Minutes are rounded to the nearest whole minute. When rounding reaches 60
/// the minute carries into the degree, and a degree of 30 carries into the
/// next sign, so 29°59.7' of Pisces reads as 0°00' Aries.
pub fn normalize(degree: f64) -> ZodiacPosition {
    let normalized = normalize_degrees(degree);
    let mut sign_index = (normalized / SIGN_SPAN).floor() as usize;
    let within = normalized - sign_index as f64 * SIGN_SPAN;

    let mut whole = within.floor() as u32;
    let mut minutes = ((within - within.floor()) * 60.0).round() as u32;

    if minutes >= 60 {
        minutes = 0;
        whole += 1;
    }
    if whole >= 30 {
        whole = 0;
        sign_index += 1;
    }

    ZodiacPosition {
        sign: ZodiacSign::from_index(sign_index),
        degree_in_sign: whole as u8,
        minutes: minutes as u8,
    }
}

/// Degrees, minutes and seconds of the full longitude, e.g. `354°05'12"`.
pub fn format_dms(degree: f64) -> String {
    let normalized = normalize_degrees(degree);
    let total_seconds = (normalized * 3600.0).round() as u64 % (360 * 3600);
    let degrees = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}°{:02}'{:02}\"", degrees, minutes, seconds)
}

impl AngleData {
    pub fn from_degree(degree: f64) -> Self {
        let degree = normalize_degrees(degree);
        let position = normalize(degree);
        Self {
            degree,
            sign: position.sign,
            degree_in_sign: position.degree_in_sign,
            minutes: position.minutes,
        }
    }
}

impl HouseCusp {
    pub fn from_degree(house_number: u8, degree: f64) -> Self {
        let degree = normalize_degrees(degree);
        let position = normalize(degree);
        Self {
            house_number,
            cusp_degree: degree,
            cusp_sign: position.sign,
            cusp_degree_in_sign: position.degree_in_sign,
            cusp_minutes: position.minutes,
        }
    }
}
