//! Behaviour tests for the valuation engine.
//!
//! These check the properties callers rely on across stages rather than
//! individual formulas.

use ivco_core::valuation::{
    cagr, cagr_between, owner_earnings, owner_earnings_series, three_stage_valuation,
    verify_range, OwnerEarningsPoint, RealityCoefficients, ValuationParameters,
    VerificationStatus,
};
use ivco_core::DomainError;
use ivco_tests::statement;

fn base_params() -> ValuationParameters {
    ValuationParameters::new(1.2, 1.5, 0.05, 0.02, 0.08, 1_000_000, 10_000)
}

// =============================================================================
// Owner Earnings
// =============================================================================

#[test]
fn when_tsmc_2022_figures_are_used_owner_earnings_match_the_worked_example() {
    // Given: TSMC FY2022 net income, D&A and capex with a 20% maintenance ratio
    // When: Owner Earnings are computed
    let oe = owner_earnings(1_016_900_515_000, 437_254_273_000, 0, 1_075_620_698_000, 0.20)
        .expect("fits in i64");

    // Then: cash earnings less rounded maintenance capex
    assert_eq!(oe, 1_239_030_648_400);
}

#[test]
fn owner_earnings_never_exceed_cash_earnings_for_non_negative_inputs() {
    // Given: a grid of non-negative line items and ratios in [0, 1]
    for net_income in [0_i64, 1, 999, 1_000_000_007] {
        for capex in [0_i64, 1, 5, 3_333_333] {
            for ratio in [0.0, 0.1, 0.5, 0.95, 1.0] {
                // When: Owner Earnings are computed
                let oe = owner_earnings(net_income, 17, 3, capex, ratio).expect("fits in i64");

                // Then: they equal ni+d+a-round(capex*ratio) and never exceed ni+d+a
                let cash = net_income + 17 + 3;
                assert_eq!(oe, cash - (capex as f64 * ratio).round() as i64);
                assert!(oe <= cash);
            }
        }
    }
}

#[test]
fn owner_earnings_outside_i64_are_reported_not_wrapped() {
    // Given: line items whose sum leaves the i64 range
    // When: Owner Earnings are computed
    let err = owner_earnings(i64::MAX, 1, 0, 0, 0.2).expect_err("sum overflows");

    // Then: a domain error is returned instead of a panic or wrapped value
    assert!(matches!(err, DomainError::Overflow { .. }));
}

#[test]
fn maintenance_capex_ties_round_away_from_zero() {
    // Given: capex 5 at ratio 0.5 (exactly 2.5)
    // When/Then: the deduction is 3, not 2
    assert_eq!(owner_earnings(10, 0, 0, 5, 0.5), Ok(7));
    assert_eq!(owner_earnings(10, 0, 0, -5, 0.5), Ok(7));
}

// =============================================================================
// CAGR
// =============================================================================

#[test]
fn cagr_is_invariant_under_positive_scaling() {
    // Given: a series and the same series scaled by several factors
    let series = [OwnerEarningsPoint::new(2015, 120), OwnerEarningsPoint::new(2022, 377)];
    let baseline = cagr(&series, &RealityCoefficients::new()).expect("valid series");

    for factor in [2_i64, 7, 1_000, 1_000_000] {
        let scaled = series.map(|point| OwnerEarningsPoint::new(point.year, point.oe * factor));

        // When: CAGR is measured on the scaled series
        let result = cagr(&scaled, &RealityCoefficients::new()).expect("valid series");

        // Then: the rate is unchanged
        assert!((result.cagr - baseline.cagr).abs() < 1e-12);
    }
}

#[test]
fn cagr_between_points_of_the_same_year_is_a_domain_error() {
    // Given: two points in the same fiscal year
    let start = OwnerEarningsPoint::new(2022, 100);
    let end = OwnerEarningsPoint::new(2022, 200);

    // When: a rate is requested
    let err = cagr_between(start, end, &RealityCoefficients::new()).expect_err("zero years");

    // Then: the engine refuses instead of dividing by zero
    assert!(matches!(err, DomainError::NonPositiveElapsedYears { years: 0, .. }));
}

#[test]
fn cagr_ignores_intermediate_years_and_input_order() {
    // Given: a statement history delivered newest first with a volatile middle year
    let statements = vec![
        statement(2022, 400, 0, 0),
        statement(2021, 1, 0, 0),
        statement(2020, 100, 0, 0),
    ];
    let series = owner_earnings_series(&statements, 0.2).expect("fits in i64");

    // When: CAGR is measured
    let result = cagr(&series, &RealityCoefficients::new()).expect("valid series");

    // Then: only 2020 and 2022 count
    assert_eq!((result.start_year, result.end_year), (2020, 2022));
    assert!((result.cagr - 1.0).abs() < 1e-12);
}

#[test]
fn reality_coefficients_calibrate_endpoints() {
    // Given: a 2022 coefficient that halves the latest year
    let coefficients = RealityCoefficients::new().with(2022, 0.5);
    let series = [OwnerEarningsPoint::new(2020, 100), OwnerEarningsPoint::new(2022, 800)];

    // When: CAGR is measured
    let result = cagr(&series, &coefficients).expect("valid series");

    // Then: growth is measured from 100 to 400
    assert_eq!(result.calibrated_end, 400.0);
    assert!((result.cagr - 1.0).abs() < 1e-12);
}

// =============================================================================
// Three-stage valuation
// =============================================================================

#[test]
fn raising_the_discount_rate_lowers_both_bounds() {
    // Given: positive cash flows and increasing discount rates above stage 3 growth
    let mut previous: Option<(f64, f64)> = None;
    for discount_rate in [0.03, 0.05, 0.08, 0.12, 0.2] {
        let params = ValuationParameters {
            discount_rate,
            long_term_debt: 0,
            ..base_params()
        };

        // When: the company is valued
        let result = three_stage_valuation(5_000_000, 0.1, &params).expect("valid inputs");

        // Then: both bounds strictly decrease
        if let Some((low, high)) = previous {
            assert!(result.iv_per_share_low < low);
            assert!(result.iv_per_share_high < high);
        }
        previous = Some((result.iv_per_share_low, result.iv_per_share_high));
    }
}

#[test]
fn terminal_growth_not_below_discount_rate_is_rejected() {
    // Given: stage 3 growth equal to and above the discount rate
    for stage3_cagr in [0.08, 0.10] {
        let params = ValuationParameters {
            stage3_cagr,
            ..base_params()
        };

        // When/Then: the perpetuity is undefined
        let err = three_stage_valuation(5_000_000, 0.1, &params).expect_err("undefined");
        assert!(matches!(err, DomainError::TerminalGrowthNotBelowDiscount { .. }));
    }
}

#[test]
fn equal_confidence_coefficients_give_a_point_estimate() {
    // Given: cc_low == cc_high
    let params = ValuationParameters {
        cc_low: 1.3,
        cc_high: 1.3,
        ..base_params()
    };

    // When: the company is valued
    let result = three_stage_valuation(5_000_000, 0.1, &params).expect("valid inputs");

    // Then: the range collapses
    assert_eq!(result.iv_per_share_low, result.iv_per_share_high);
}

#[test]
fn par_value_shares_are_normalized_exactly_once() {
    // Given: a share figure stated in NT$10 par units
    let params = ValuationParameters {
        shares_outstanding_raw: 259_303_800,
        ..base_params()
    }
    .with_share_par_value(10);
    let unit_params = ValuationParameters {
        shares_outstanding_raw: 25_930_380,
        ..base_params()
    };

    // When: both are valued
    let par = three_stage_valuation(5_000_000_000, 0.1, &params).expect("valid inputs");
    let unit = three_stage_valuation(5_000_000_000, 0.1, &unit_params).expect("valid inputs");

    // Then: the normalized count and per-share values agree
    assert_eq!(par.normalized_shares, 25_930_380.0);
    assert_eq!(par.iv_per_share_low, unit.iv_per_share_low);
    assert_eq!(par.iv_per_share_high, unit.iv_per_share_high);
}

// =============================================================================
// Verification
// =============================================================================

#[test]
fn verifier_reports_signed_differences_against_tolerance() {
    // Given/When/Then: the three canonical comparisons
    let exact = verify_range(100, 200, 100, 200, 0).expect("in range");
    assert_eq!(exact.status, VerificationStatus::Pass);

    let off = verify_range(95, 205, 100, 200, 0).expect("in range");
    assert_eq!(off.status, VerificationStatus::Fail);
    assert_eq!((off.diff_low, off.diff_high), (-5, 5));

    let tolerated = verify_range(95, 205, 100, 200, 5).expect("in range");
    assert_eq!(tolerated.status, VerificationStatus::Pass);
}

#[test]
fn verification_outcome_serializes_with_stable_field_names() {
    // Given: a failing comparison
    let outcome = verify_range(4_565, 5_639, 4_630, 5_678, 0).expect("in range");

    // When: it is serialized
    let json = serde_json::to_value(outcome).expect("serializes");

    // Then: the field names and status spelling are stable
    assert_eq!(json["status"], "FAIL");
    assert_eq!(json["diff_low"], -65);
    assert_eq!(json["diff_high"], -39);
    assert_eq!(json["tolerance"], 0);
}

#[test]
fn verifier_reports_overflowing_differences() {
    // Given: bounds whose difference leaves the i64 range
    // When: they are compared
    let err = verify_range(i64::MAX, 0, -1, 0, 0).expect_err("difference overflows");

    // Then: the comparison fails with a domain error
    assert_eq!(err.code(), "domain.overflow");
}
