//! Owner Earnings: reported profit plus non-cash charges, less the share of
//! capital expenditure needed just to keep the business where it is.

use serde::{Deserialize, Serialize};

use crate::{DomainError, FinancialStatementYear};

/// Owner Earnings for one fiscal year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct OwnerEarningsPoint {
    pub year: i32,
    pub oe: i64,
}

impl OwnerEarningsPoint {
    pub const fn new(year: i32, oe: i64) -> Self {
        Self { year, oe }
    }
}

/// `net_income + depreciation + amortization - round(|capex| * ratio)`.
///
/// Maintenance capex rounds half away from zero, so `5 * 0.5` costs 3.
/// The sign of `capex` is ignored. The ratio is expected in `[0, 1]` but is
/// not checked. Results outside `i64` fail with [`DomainError::Overflow`].
pub fn owner_earnings(
    net_income: i64,
    depreciation: i64,
    amortization: i64,
    capex: i64,
    maintenance_capex_ratio: f64,
) -> Result<i64, DomainError> {
    cash_earnings(net_income, depreciation, amortization)?
        .checked_sub(maintenance_capex(capex, maintenance_capex_ratio))
        .ok_or(DomainError::Overflow {
            operation: "owner earnings",
        })
}

/// `net_income + depreciation + amortization`.
pub fn cash_earnings(
    net_income: i64,
    depreciation: i64,
    amortization: i64,
) -> Result<i64, DomainError> {
    net_income
        .checked_add(depreciation)
        .and_then(|sum| sum.checked_add(amortization))
        .ok_or(DomainError::Overflow {
            operation: "cash earnings",
        })
}

/// Portion of capex attributed to maintenance, rounded half away from zero.
/// Saturates at the `i64` bounds.
pub fn maintenance_capex(capex: i64, maintenance_capex_ratio: f64) -> i64 {
    (capex.unsigned_abs() as f64 * maintenance_capex_ratio).round() as i64
}

/// Owner Earnings for a statement row.
pub fn statement_owner_earnings(
    statement: &FinancialStatementYear,
    maintenance_capex_ratio: f64,
) -> Result<OwnerEarningsPoint, DomainError> {
    let oe = owner_earnings(
        statement.net_income,
        statement.depreciation,
        statement.amortization,
        statement.capex,
        maintenance_capex_ratio,
    )?;
    Ok(OwnerEarningsPoint::new(statement.year, oe))
}

/// Owner Earnings per statement, ascending by year.
pub fn owner_earnings_series(
    statements: &[FinancialStatementYear],
    maintenance_capex_ratio: f64,
) -> Result<Vec<OwnerEarningsPoint>, DomainError> {
    let mut series = statements
        .iter()
        .map(|statement| statement_owner_earnings(statement, maintenance_capex_ratio))
        .collect::<Result<Vec<_>, _>>()?;
    series.sort_by_key(|point| point.year);
    Ok(series)
}
