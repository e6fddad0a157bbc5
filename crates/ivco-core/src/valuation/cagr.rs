//! Compound annual growth between the first and last Owner Earnings points.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::valuation::OwnerEarningsPoint;
use crate::{DomainError, ValidationError};

/// Per-year calibration multipliers applied to Owner Earnings before growth
/// is measured. Years without an entry use 1.0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RealityCoefficients(BTreeMap<i32, f64>);

impl RealityCoefficients {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, year: i32, coefficient: f64) -> Self {
        self.0.insert(year, coefficient);
        self
    }

    pub fn coefficient(&self, year: i32) -> f64 {
        self.0.get(&year).copied().unwrap_or(1.0)
    }
}

impl FromIterator<(i32, f64)> for RealityCoefficients {
    fn from_iter<I: IntoIterator<Item = (i32, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// A single `YEAR=FACTOR` entry, as typed on the command line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RealityCoefficient {
    pub year: i32,
    pub coefficient: f64,
}

impl FromStr for RealityCoefficient {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidRealityCoefficient {
            value: value.to_owned(),
        };

        let (year, coefficient) = value.split_once('=').ok_or_else(invalid)?;
        let year = year.trim().parse::<i32>().map_err(|_| invalid())?;
        let coefficient = coefficient.trim().parse::<f64>().map_err(|_| invalid())?;
        if !coefficient.is_finite() {
            return Err(invalid());
        }

        Ok(Self { year, coefficient })
    }
}

/// Growth rate plus the figures it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CagrResult {
    pub cagr: f64,
    pub years: i32,
    pub start_year: i32,
    pub end_year: i32,
    pub start_oe: i64,
    pub end_oe: i64,
    pub calibrated_start: f64,
    pub calibrated_end: f64,
}

/// CAGR between the earliest and latest points of `series`.
///
/// Intermediate years do not influence the rate. A non-positive calibrated
/// endpoint yields a CAGR of exactly 0.0 instead of an error.
pub fn cagr(
    series: &[OwnerEarningsPoint],
    coefficients: &RealityCoefficients,
) -> Result<CagrResult, DomainError> {
    if series.len() < 2 {
        return Err(DomainError::InsufficientSeries { len: series.len() });
    }

    let mut ordered = series.to_vec();
    ordered.sort_by_key(|point| point.year);

    // len >= 2 was checked above
    let start = ordered[0];
    let end = ordered[ordered.len() - 1];
    cagr_between(start, end, coefficients)
}

/// CAGR between two explicit points.
pub fn cagr_between(
    start: OwnerEarningsPoint,
    end: OwnerEarningsPoint,
    coefficients: &RealityCoefficients,
) -> Result<CagrResult, DomainError> {
    let years = end
        .year
        .checked_sub(start.year)
        .ok_or(DomainError::Overflow {
            operation: "elapsed years",
        })?;
    if years <= 0 {
        return Err(DomainError::NonPositiveElapsedYears {
            start_year: start.year,
            end_year: end.year,
            years,
        });
    }

    let start_coefficient = coefficients.coefficient(start.year);
    let end_coefficient = coefficients.coefficient(end.year);
    if !start_coefficient.is_finite() || !end_coefficient.is_finite() {
        return Err(DomainError::NonFinite {
            field: "reality_coefficient",
        });
    }

    let calibrated_start = start.oe as f64 * start_coefficient;
    let calibrated_end = end.oe as f64 * end_coefficient;

    let rate = if calibrated_start <= 0.0 || calibrated_end <= 0.0 {
        tracing::debug!(
            calibrated_start,
            calibrated_end,
            "non-positive growth base, cagr set to 0"
        );
        0.0
    } else {
        (calibrated_end / calibrated_start).powf(1.0 / f64::from(years)) - 1.0
    };

    Ok(CagrResult {
        cagr: rate,
        years,
        start_year: start.year,
        end_year: end.year,
        start_oe: start.oe,
        end_oe: end.oe,
        calibrated_start,
        calibrated_end,
    })
}
