use std::time::Instant;

use serde::Serialize;

use ivco_core::pipeline::{analyze_ticker, AnalysisParameters, AnalysisReport, ExpectedRange};
use ivco_core::{StatementSource, Ticker};

use crate::cli::AnalyzeArgs;
use crate::config::ValuationConfig;
use crate::error::CliError;

use super::{elapsed_ms, inverted_band_warning, resolve_valuation, CommandResult, Outcome};

#[derive(Debug, Serialize)]
struct AnalyzeResponseData {
    #[serde(flatten)]
    report: AnalysisReport,
    years: usize,
    inputs: AnalysisParameters,
}

pub async fn run<S>(
    args: &AnalyzeArgs,
    defaults: &ValuationConfig,
    source: &S,
) -> Result<CommandResult, CliError>
where
    S: StatementSource + ?Sized,
{
    let ticker = Ticker::parse(&args.ticker)?;
    let settings = resolve_valuation(&args.valuation, defaults);
    let params = AnalysisParameters {
        maintenance_ratio: args.maintenance_ratio.unwrap_or(defaults.maintenance_ratio),
        reality_coefficients: args
            .reality
            .iter()
            .map(|entry| (entry.year, entry.coefficient))
            .collect(),
        cc_low: settings.cc_low,
        cc_high: settings.cc_high,
        stage2_cagr: settings.stage2_cagr,
        stage3_cagr: settings.stage3_cagr,
        discount_rate: settings.discount_rate,
        share_par_value: settings.share_par_value,
        stage1_years: settings.stage1_years,
        stage2_years: settings.stage2_years,
        shares_outstanding: args.shares_outstanding,
        long_term_debt: args.long_term_debt,
        expected: args
            .expected_low
            .zip(args.expected_high)
            .map(|(low, high)| ExpectedRange {
                low,
                high,
                tolerance: args.tolerance,
            }),
    };

    let started = Instant::now();
    let report = analyze_ticker(source, &ticker, args.years, &params).await?;
    let latency_ms = elapsed_ms(started);

    let outcome = match &report.verification {
        Some(verification) if !verification.passed() => Outcome::VerificationFailed,
        _ => Outcome::Success,
    };
    let data = AnalyzeResponseData {
        report,
        years: args.years,
        inputs: params,
    };

    let mut result = CommandResult::ok(serde_json::to_value(data)?)
        .with_source_chain(vec![source.id()])
        .with_latency(latency_ms)
        .with_outcome(outcome);
    if let Some(warning) = inverted_band_warning(&settings) {
        result = result.with_warning(warning);
    }
    Ok(result)
}
