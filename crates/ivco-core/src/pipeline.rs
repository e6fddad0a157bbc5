//! Composed fetch → Owner Earnings → CAGR → three-stage valuation run.
//!
//! [`analyze`] is pure over already-fetched records; [`analyze_ticker`]
//! pulls them from a [`StatementSource`] first.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::statement_source::{fetch_bundle, StatementSource};
use crate::valuation::{
    cagr, owner_earnings_series, three_stage_valuation, verify_range, CagrResult,
    OwnerEarningsPoint, RealityCoefficients, ValuationParameters, ValuationResult,
    VerificationOutcome, DEFAULT_SHARE_PAR_VALUE, DEFAULT_STAGE1_YEARS, DEFAULT_STAGE2_YEARS,
};
use crate::{BalanceSheetYear, FinancialStatementYear, PipelineError, QuoteSnapshot, Ticker};

pub const DEFAULT_MAINTENANCE_RATIO: f64 = 0.20;
pub const DEFAULT_CC_LOW: f64 = 1.2;
pub const DEFAULT_CC_HIGH: f64 = 1.5;
pub const DEFAULT_STAGE2_CAGR: f64 = 0.05;
pub const DEFAULT_STAGE3_CAGR: f64 = 0.02;
pub const DEFAULT_DISCOUNT_RATE: f64 = 0.08;
pub const DEFAULT_HISTORY_YEARS: usize = 10;

/// Externally supplied IV range to check the result against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedRange {
    pub low: i64,
    pub high: i64,
    pub tolerance: u64,
}

/// Assumptions for one composed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisParameters {
    pub maintenance_ratio: f64,
    pub reality_coefficients: RealityCoefficients,
    pub cc_low: f64,
    pub cc_high: f64,
    pub stage2_cagr: f64,
    pub stage3_cagr: f64,
    pub discount_rate: f64,
    pub share_par_value: i64,
    pub stage1_years: u32,
    pub stage2_years: u32,
    /// Overrides the latest balance sheet's share count.
    pub shares_outstanding: Option<i64>,
    /// Overrides the latest balance sheet's total debt.
    pub long_term_debt: Option<i64>,
    pub expected: Option<ExpectedRange>,
}

impl Default for AnalysisParameters {
    fn default() -> Self {
        Self {
            maintenance_ratio: DEFAULT_MAINTENANCE_RATIO,
            reality_coefficients: RealityCoefficients::new(),
            cc_low: DEFAULT_CC_LOW,
            cc_high: DEFAULT_CC_HIGH,
            stage2_cagr: DEFAULT_STAGE2_CAGR,
            stage3_cagr: DEFAULT_STAGE3_CAGR,
            discount_rate: DEFAULT_DISCOUNT_RATE,
            share_par_value: DEFAULT_SHARE_PAR_VALUE,
            stage1_years: DEFAULT_STAGE1_YEARS,
            stage2_years: DEFAULT_STAGE2_YEARS,
            shares_outstanding: None,
            long_term_debt: None,
            expected: None,
        }
    }
}

/// Result of a composed analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub ticker: String,
    pub oe_series: Vec<OwnerEarningsPoint>,
    pub cagr: CagrResult,
    pub valuation: ValuationResult,
    pub current_price: f64,
    pub shares_outstanding: i64,
    pub long_term_debt: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification: Option<VerificationOutcome>,
}

/// Value a company from its annual statements.
pub fn analyze(
    statements: &[FinancialStatementYear],
    balance_sheets: &[BalanceSheetYear],
    quote: &QuoteSnapshot,
    params: &AnalysisParameters,
) -> Result<AnalysisReport, PipelineError> {
    let dated = statements
        .iter()
        .filter(|statement| statement.year != 0)
        .cloned()
        .collect::<Vec<_>>();
    if dated.is_empty() {
        return Err(PipelineError::insufficient("no dated income statements"));
    }

    let oe_series = owner_earnings_series(&dated, params.maintenance_ratio)?;
    let Some(latest) = oe_series.last().copied() else {
        return Err(PipelineError::insufficient("no owner earnings computed"));
    };

    let fiscal_years = oe_series
        .iter()
        .map(|point| point.year)
        .collect::<BTreeSet<_>>();
    if fiscal_years.len() < 2 {
        return Err(PipelineError::insufficient(
            "at least two distinct fiscal years are needed for a growth rate",
        ));
    }

    let growth = cagr(&oe_series, &params.reality_coefficients)?;
    if growth.cagr <= 0.0 {
        return Err(PipelineError::insufficient(format!(
            "owner earnings CAGR is not positive ({:.4})",
            growth.cagr
        )));
    }

    let latest_sheet = balance_sheets
        .iter()
        .filter(|sheet| sheet.year != 0)
        .max_by_key(|sheet| sheet.year)
        .or_else(|| balance_sheets.first());

    let shares_outstanding = params
        .shares_outstanding
        .or_else(|| latest_sheet.map(|sheet| sheet.shares_outstanding))
        .unwrap_or(0);
    if shares_outstanding == 0 {
        return Err(PipelineError::insufficient("shares outstanding unavailable"));
    }

    let long_term_debt = params
        .long_term_debt
        .or_else(|| latest_sheet.map(|sheet| sheet.total_debt))
        .unwrap_or(0);

    tracing::debug!(
        latest_year = latest.year,
        latest_oe = latest.oe,
        cagr = growth.cagr,
        shares_outstanding,
        long_term_debt,
        "valuation inputs resolved"
    );

    let valuation_params = ValuationParameters::new(
        params.cc_low,
        params.cc_high,
        params.stage2_cagr,
        params.stage3_cagr,
        params.discount_rate,
        long_term_debt,
        shares_outstanding,
    )
    .with_share_par_value(params.share_par_value)
    .with_horizons(params.stage1_years, params.stage2_years);

    let valuation = three_stage_valuation(latest.oe, growth.cagr, &valuation_params)?;

    let verification = params
        .expected
        .map(|expected| {
            verify_range(
                valuation.iv_per_share_low.round() as i64,
                valuation.iv_per_share_high.round() as i64,
                expected.low,
                expected.high,
                expected.tolerance,
            )
        })
        .transpose()?;

    Ok(AnalysisReport {
        ticker: quote.ticker.clone(),
        oe_series,
        cagr: growth,
        valuation,
        current_price: quote.price,
        shares_outstanding,
        long_term_debt,
        verification,
    })
}

/// Fetch `years` of statements for `ticker` and run [`analyze`].
pub async fn analyze_ticker<S>(
    source: &S,
    ticker: &Ticker,
    years: usize,
    params: &AnalysisParameters,
) -> Result<AnalysisReport, PipelineError>
where
    S: StatementSource + ?Sized,
{
    let bundle = fetch_bundle(source, ticker, years).await?;
    let mut report = analyze(
        &bundle.income_statements,
        &bundle.balance_sheet,
        &bundle.quote,
        params,
    )?;
    if report.ticker.is_empty() {
        report.ticker = ticker.as_str().to_owned();
    }
    Ok(report)
}
