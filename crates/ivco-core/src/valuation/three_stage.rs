//! Three-stage discounted Owner Earnings valuation.
//!
//! Stage 1 compounds the latest Owner Earnings at the measured CAGR scaled
//! by a confidence coefficient, stage 2 continues at a moderate rate, and
//! stage 3 is a Gordon-growth perpetuity on the last explicit year. All
//! flows share one discount clock: year `t` is discounted by
//! `(1 + discount_rate)^t` and the terminal value by the full explicit
//! horizon.
//!
//! The confidence band is produced by running the model twice, once with
//! stage-1 growth `cagr * cc_low` and once with `cagr * cc_high`. The
//! lower per-share result is reported as the low bound.

use serde::{Deserialize, Serialize};

use crate::DomainError;

pub const DEFAULT_STAGE1_YEARS: u32 = 5;
pub const DEFAULT_STAGE2_YEARS: u32 = 5;
/// Longest explicit horizon accepted for either growth stage.
pub const MAX_STAGE_YEARS: u32 = 100;
/// Raw share counts pass through unchanged unless a larger par value says
/// they are stated in par-value units.
pub const DEFAULT_SHARE_PAR_VALUE: i64 = 1;

/// Assumption set for one valuation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValuationParameters {
    pub cc_low: f64,
    pub cc_high: f64,
    pub stage2_cagr: f64,
    pub stage3_cagr: f64,
    pub discount_rate: f64,
    pub long_term_debt: i64,
    pub shares_outstanding_raw: i64,
    pub share_par_value: i64,
    pub stage1_years: u32,
    pub stage2_years: u32,
}

impl ValuationParameters {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        cc_low: f64,
        cc_high: f64,
        stage2_cagr: f64,
        stage3_cagr: f64,
        discount_rate: f64,
        long_term_debt: i64,
        shares_outstanding_raw: i64,
    ) -> Self {
        Self {
            cc_low,
            cc_high,
            stage2_cagr,
            stage3_cagr,
            discount_rate,
            long_term_debt,
            shares_outstanding_raw,
            share_par_value: DEFAULT_SHARE_PAR_VALUE,
            stage1_years: DEFAULT_STAGE1_YEARS,
            stage2_years: DEFAULT_STAGE2_YEARS,
        }
    }

    pub fn with_share_par_value(mut self, share_par_value: i64) -> Self {
        self.share_par_value = share_par_value;
        self
    }

    pub fn with_horizons(mut self, stage1_years: u32, stage2_years: u32) -> Self {
        self.stage1_years = stage1_years;
        self.stage2_years = stage2_years;
        self
    }

    fn validate(&self, cagr: f64) -> Result<(), DomainError> {
        let floats = [
            ("cagr", cagr),
            ("cc_low", self.cc_low),
            ("cc_high", self.cc_high),
            ("stage2_cagr", self.stage2_cagr),
            ("stage3_cagr", self.stage3_cagr),
            ("discount_rate", self.discount_rate),
        ];
        if let Some(&(field, _)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(DomainError::NonFinite { field });
        }

        if self.discount_rate <= -1.0 {
            return Err(DomainError::InvalidDiscountRate {
                value: self.discount_rate,
            });
        }

        if self.discount_rate - self.stage3_cagr <= 0.0 {
            return Err(DomainError::TerminalGrowthNotBelowDiscount {
                discount_rate: self.discount_rate,
                stage3_cagr: self.stage3_cagr,
            });
        }

        for (stage, years) in [("stage1", self.stage1_years), ("stage2", self.stage2_years)] {
            if years == 0 {
                return Err(DomainError::EmptyHorizon { stage });
            }
            if years > MAX_STAGE_YEARS {
                return Err(DomainError::HorizonTooLong {
                    stage,
                    years,
                    max: MAX_STAGE_YEARS,
                });
            }
        }

        Ok(())
    }
}

/// True share count from a reported figure.
///
/// A par value above 1 means the report states share capital in par-value
/// units, so the count is divided by it once. Par value 1 passes through.
pub fn normalize_shares(
    shares_outstanding_raw: i64,
    share_par_value: i64,
) -> Result<f64, DomainError> {
    if share_par_value <= 0 {
        return Err(DomainError::NonPositiveParValue {
            value: share_par_value,
        });
    }

    let shares = if share_par_value > 1 {
        shares_outstanding_raw as f64 / share_par_value as f64
    } else {
        shares_outstanding_raw as f64
    };

    if shares <= 0.0 {
        return Err(DomainError::NonPositiveShares { value: shares });
    }

    Ok(shares)
}

/// One projected year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectedCashFlow {
    /// Years from today, counted across both explicit stages.
    pub year: u32,
    pub oe: f64,
    pub present_value: f64,
}

/// Explicit-horizon stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageProjection {
    pub growth: f64,
    pub cash_flows: Vec<ProjectedCashFlow>,
    pub present_value: f64,
}

impl StageProjection {
    fn final_oe(&self, fallback: f64) -> f64 {
        self.cash_flows.last().map_or(fallback, |flow| flow.oe)
    }
}

/// Full audit trail for one confidence coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioValuation {
    pub confidence_coefficient: f64,
    pub stage1: StageProjection,
    pub stage2: StageProjection,
    pub terminal_value: f64,
    pub discounted_terminal_value: f64,
    pub enterprise_value: f64,
    pub equity_value: f64,
    pub iv_per_share: f64,
}

/// Intrinsic value range and the figures behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValuationResult {
    pub latest_oe: i64,
    pub cagr: f64,
    pub iv_per_share_low: f64,
    pub iv_per_share_high: f64,
    pub enterprise_value_low: f64,
    pub enterprise_value_high: f64,
    pub equity_value_low: f64,
    pub equity_value_high: f64,
    pub normalized_shares: f64,
    pub low: ScenarioValuation,
    pub high: ScenarioValuation,
}

/// Run the three-stage model for both confidence coefficients.
///
/// # Errors
///
/// Returns [`DomainError`] when an input is not finite, the discount rate
/// is at or below -100%, `stage3_cagr >= discount_rate`, a stage horizon is
/// zero, or the normalized share count is not positive. Implausible but
/// computable inputs (negative Owner Earnings, negative IV) are returned
/// as-is.
pub fn three_stage_valuation(
    latest_oe: i64,
    cagr: f64,
    params: &ValuationParameters,
) -> Result<ValuationResult, DomainError> {
    params.validate(cagr)?;
    let normalized_shares =
        normalize_shares(params.shares_outstanding_raw, params.share_par_value)?;

    let (cc_low, cc_high) = if params.cc_low <= params.cc_high {
        (params.cc_low, params.cc_high)
    } else {
        tracing::warn!(
            cc_low = params.cc_low,
            cc_high = params.cc_high,
            "confidence coefficients inverted, swapping"
        );
        (params.cc_high, params.cc_low)
    };

    let first = scenario(latest_oe, cagr, cc_low, params, normalized_shares);
    let second = scenario(latest_oe, cagr, cc_high, params, normalized_shares);
    let (low, high) = if first.iv_per_share <= second.iv_per_share {
        (first, second)
    } else {
        (second, first)
    };

    tracing::debug!(
        iv_per_share_low = low.iv_per_share,
        iv_per_share_high = high.iv_per_share,
        normalized_shares,
        "three-stage valuation complete"
    );

    Ok(ValuationResult {
        latest_oe,
        cagr,
        iv_per_share_low: low.iv_per_share,
        iv_per_share_high: high.iv_per_share,
        enterprise_value_low: low.enterprise_value,
        enterprise_value_high: high.enterprise_value,
        equity_value_low: low.equity_value,
        equity_value_high: high.equity_value,
        normalized_shares,
        low,
        high,
    })
}

fn scenario(
    latest_oe: i64,
    cagr: f64,
    confidence_coefficient: f64,
    params: &ValuationParameters,
    normalized_shares: f64,
) -> ScenarioValuation {
    let base = latest_oe as f64;
    let stage1 = project(
        base,
        cagr * confidence_coefficient,
        1,
        params.stage1_years,
        params.discount_rate,
    );
    let stage2 = project(
        stage1.final_oe(base),
        params.stage2_cagr,
        params.stage1_years + 1,
        params.stage2_years,
        params.discount_rate,
    );

    let horizon = params.stage1_years + params.stage2_years;
    let final_oe = stage2.final_oe(base);
    let terminal_value = final_oe * (1.0 + params.stage3_cagr)
        / (params.discount_rate - params.stage3_cagr);
    let discounted_terminal_value = terminal_value / discount_factor(params.discount_rate, horizon);

    let enterprise_value = stage1.present_value + stage2.present_value + discounted_terminal_value;
    let equity_value = enterprise_value - params.long_term_debt as f64;

    ScenarioValuation {
        confidence_coefficient,
        stage1,
        stage2,
        terminal_value,
        discounted_terminal_value,
        enterprise_value,
        equity_value,
        iv_per_share: equity_value / normalized_shares,
    }
}

fn project(
    start_oe: f64,
    growth: f64,
    first_year: u32,
    years: u32,
    discount_rate: f64,
) -> StageProjection {
    let mut oe = start_oe;
    let cash_flows = (first_year..first_year + years)
        .map(|year| {
            oe *= 1.0 + growth;
            ProjectedCashFlow {
                year,
                oe,
                present_value: oe / discount_factor(discount_rate, year),
            }
        })
        .collect::<Vec<_>>();
    let present_value = cash_flows.iter().map(|flow| flow.present_value).sum();

    StageProjection {
        growth,
        cash_flows,
        present_value,
    }
}

fn discount_factor(discount_rate: f64, year: u32) -> f64 {
    (1.0 + discount_rate).powf(f64::from(year))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ValuationParameters {
        ValuationParameters::new(1.0, 1.0, 0.05, 0.02, 0.08, 0, 1_000)
    }

    #[test]
    fn hand_computed_single_year_stages() {
        let params = ValuationParameters::new(1.0, 1.0, 0.0, 0.0, 0.10, 0, 1).with_horizons(1, 1);
        let result = three_stage_valuation(100, 0.10, &params).expect("valid inputs");

        let scenario = &result.low;
        assert!((scenario.stage1.cash_flows[0].oe - 110.0).abs() < 1e-9);
        assert!((scenario.stage1.present_value - 100.0).abs() < 1e-9);
        assert!((scenario.stage2.present_value - 110.0 / 1.21).abs() < 1e-9);
        assert!((scenario.terminal_value - 1_100.0).abs() < 1e-9);
        assert!((scenario.enterprise_value - 1_100.0).abs() < 1e-9);
        assert!((result.iv_per_share_low - 1_100.0).abs() < 1e-9);
    }

    #[test]
    fn equal_confidence_coefficients_collapse_the_range() {
        let result = three_stage_valuation(1_000, 0.12, &params()).expect("valid inputs");
        assert_eq!(result.iv_per_share_low, result.iv_per_share_high);
    }

    #[test]
    fn higher_confidence_raises_the_high_bound() {
        let params = ValuationParameters { cc_low: 0.8, cc_high: 1.2, ..params() };
        let result = three_stage_valuation(1_000, 0.12, &params).expect("valid inputs");

        assert!(result.iv_per_share_low < result.iv_per_share_high);
        assert_eq!(result.low.confidence_coefficient, 0.8);
        assert_eq!(result.high.confidence_coefficient, 1.2);
        assert!((result.low.stage1.growth - 0.096).abs() < 1e-12);
    }

    #[test]
    fn inverted_band_is_swapped() {
        let ordered = ValuationParameters { cc_low: 0.8, cc_high: 1.2, ..params() };
        let inverted = ValuationParameters { cc_low: 1.2, cc_high: 0.8, ..params() };

        let a = three_stage_valuation(1_000, 0.12, &ordered).expect("valid");
        let b = three_stage_valuation(1_000, 0.12, &inverted).expect("valid");
        assert_eq!(a, b);
    }

    #[test]
    fn negative_growth_keeps_bounds_ordered() {
        let params = ValuationParameters { cc_low: 0.5, cc_high: 1.5, ..params() };
        let result = three_stage_valuation(1_000, -0.10, &params).expect("valid");

        assert!(result.iv_per_share_low <= result.iv_per_share_high);
        assert_eq!(result.low.confidence_coefficient, 1.5);
    }

    #[test]
    fn debt_is_subtracted_before_per_share_division() {
        let debt_free = three_stage_valuation(1_000, 0.05, &params()).expect("valid");
        let levered = ValuationParameters { long_term_debt: 5_000, ..params() };
        let levered = three_stage_valuation(1_000, 0.05, &levered).expect("valid");

        assert!((debt_free.equity_value_low - levered.equity_value_low - 5_000.0).abs() < 1e-6);
        assert!((debt_free.iv_per_share_low - levered.iv_per_share_low - 5.0).abs() < 1e-9);
    }

    #[test]
    fn par_value_normalizes_share_count_once() {
        assert_eq!(normalize_shares(259_303_800, 10).expect("valid"), 25_930_380.0);
        assert_eq!(normalize_shares(259_303_800, 1).expect("valid"), 259_303_800.0);

        let params = ValuationParameters {
            shares_outstanding_raw: 259_303_800,
            ..params()
        }
        .with_share_par_value(10);
        let result = three_stage_valuation(1_000_000_000, 0.10, &params).expect("valid");

        assert_eq!(result.normalized_shares, 25_930_380.0);
        let implied = result.iv_per_share_low * 25_930_380.0;
        assert!((implied - result.equity_value_low).abs() / result.equity_value_low < 1e-12);
    }

    #[test]
    fn terminal_growth_at_or_above_discount_rate_is_rejected() {
        for stage3 in [0.08, 0.09, 0.5] {
            let params = ValuationParameters { stage3_cagr: stage3, ..params() };
            let err = three_stage_valuation(1_000, 0.1, &params).expect_err("undefined terminal");
            assert!(matches!(err, DomainError::TerminalGrowthNotBelowDiscount { .. }));
        }
    }

    #[test]
    fn non_positive_shares_are_rejected() {
        for shares in [0, -10] {
            let params = ValuationParameters { shares_outstanding_raw: shares, ..params() };
            let err = three_stage_valuation(1_000, 0.1, &params).expect_err("no shares");
            assert!(matches!(err, DomainError::NonPositiveShares { .. }));
        }

        let params = params().with_share_par_value(0);
        let err = three_stage_valuation(1_000, 0.1, &params).expect_err("bad par value");
        assert_eq!(err, DomainError::NonPositiveParValue { value: 0 });
    }

    #[test]
    fn degenerate_rates_and_horizons_are_rejected() {
        let params_nan = ValuationParameters { stage2_cagr: f64::NAN, ..params() };
        assert_eq!(
            three_stage_valuation(1_000, 0.1, &params_nan).expect_err("nan"),
            DomainError::NonFinite { field: "stage2_cagr" }
        );

        let params_rate = ValuationParameters {
            discount_rate: -1.0,
            stage3_cagr: -2.0,
            ..params()
        };
        assert!(matches!(
            three_stage_valuation(1_000, 0.1, &params_rate).expect_err("rate"),
            DomainError::InvalidDiscountRate { .. }
        ));

        let params_horizon = params().with_horizons(5, 0);
        assert_eq!(
            three_stage_valuation(1_000, 0.1, &params_horizon).expect_err("horizon"),
            DomainError::EmptyHorizon { stage: "stage2" }
        );
    }

    #[test]
    fn horizons_beyond_the_cap_are_rejected() {
        for (stage1, stage2, stage) in [(u32::MAX, 1, "stage1"), (5, 1_000_000_000, "stage2")] {
            let params = params().with_horizons(stage1, stage2);
            let err = three_stage_valuation(1_000, 0.1, &params).expect_err("too long");
            assert!(matches!(err, DomainError::HorizonTooLong { stage: s, .. } if s == stage));
            assert_eq!(err.code(), "domain.horizon_too_long");
        }

        let params = params().with_horizons(MAX_STAGE_YEARS, MAX_STAGE_YEARS);
        let result = three_stage_valuation(1_000, 0.01, &params).expect("at the cap");
        assert_eq!(result.low.stage2.cash_flows.len(), MAX_STAGE_YEARS as usize);
    }

    #[test]
    fn negative_owner_earnings_produce_negative_value() {
        let result = three_stage_valuation(-1_000, 0.0, &params()).expect("computable");
        assert!(result.iv_per_share_high < 0.0);
    }

    #[test]
    fn projection_years_run_across_both_stages() {
        let result = three_stage_valuation(1_000, 0.1, &params()).expect("valid");
        let years = result
            .low
            .stage1
            .cash_flows
            .iter()
            .chain(&result.low.stage2.cash_flows)
            .map(|flow| flow.year)
            .collect::<Vec<_>>();
        assert_eq!(years, (1..=10).collect::<Vec<_>>());
    }
}
