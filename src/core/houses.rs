//! House membership for ecliptic longitudes.
//!
//! House N spans from its cusp up to (not including) the cusp of house N+1,
//! house 12 runs back to house 1. Exactly one house may span the 0°/360°
//! origin; that house has a cusp greater than the next one.

use crate::core::zodiac::normalize_degrees;
use crate::domain::model::HouseCusp;
use crate::utils::error::{ChartError, Result};

/// Twelve cusps that partition the circle with no gap or overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CuspRing {
    cusps: [f64; 12],
}

impl CuspRing {
    /// Check that the cusps increase cyclically and cover the circle once.
    pub fn new(cusps: [f64; 12]) -> Result<Self> {
        for (index, cusp) in cusps.iter().enumerate() {
            if !cusp.is_finite() || *cusp < 0.0 || *cusp >= 360.0 {
                return Err(ChartError::house_backend(format!(
                    "cusp of house {} is outside [0, 360): {}",
                    index + 1,
                    cusp
                )));
            }
        }

        let mut descents = 0;
        for house in 0..12 {
            let lo = cusps[house];
            let hi = cusps[(house + 1) % 12];
            if lo == hi {
                return Err(ChartError::house_backend(format!(
                    "houses {} and {} share cusp {}",
                    house + 1,
                    (house + 1) % 12 + 1,
                    lo
                )));
            }
            if lo > hi {
                descents += 1;
            }
        }

        // 剛好一次跨越 0° 才是完整的一圈
        if descents != 1 {
            return Err(ChartError::house_backend(format!(
                "cusps wrap the circle {} times instead of once",
                descents
            )));
        }

        Ok(Self { cusps })
    }

    pub fn from_houses(houses: &[HouseCusp; 12]) -> Result<Self> {
        Self::new(std::array::from_fn(|i| houses[i].cusp_degree))
    }

    pub fn cusps(&self) -> &[f64; 12] {
        &self.cusps
    }

    /// House number (1..=12) occupied by `longitude`.
    pub fn assign(&self, longitude: f64) -> u8 {
        let x = normalize_degrees(longitude);
        (0..12)
            .find(|&house| span_contains(self.cusps[house], self.cusps[(house + 1) % 12], x))
            .map(|house| house as u8 + 1)
            .unwrap_or_else(|| unreachable!("validated cusp ring covers {}", x))
    }
}

fn span_contains(lo: f64, hi: f64, x: f64) -> bool {
    if lo <= hi {
        lo <= x && x < hi
    } else {
        x >= lo || x < hi
    }
}
