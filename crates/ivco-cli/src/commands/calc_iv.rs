use serde::Serialize;

use ivco_core::valuation::{three_stage_valuation, ValuationParameters, ValuationResult};

use crate::cli::CalcIvArgs;
use crate::config::ValuationConfig;
use crate::error::CliError;

use super::{inverted_band_warning, resolve_valuation, CommandResult};

#[derive(Debug, Serialize)]
struct CalcIvInputs {
    latest_oe: i64,
    cagr: f64,
    #[serde(flatten)]
    params: ValuationParameters,
}

#[derive(Debug, Serialize)]
struct CalcIvResponseData {
    #[serde(flatten)]
    result: ValuationResult,
    inputs: CalcIvInputs,
}

pub fn run(args: &CalcIvArgs, defaults: &ValuationConfig) -> Result<CommandResult, CliError> {
    let settings = resolve_valuation(&args.valuation, defaults);
    let params = ValuationParameters::new(
        settings.cc_low,
        settings.cc_high,
        settings.stage2_cagr,
        settings.stage3_cagr,
        settings.discount_rate,
        args.long_term_debt,
        args.shares_outstanding,
    )
    .with_share_par_value(settings.share_par_value)
    .with_horizons(settings.stage1_years, settings.stage2_years);

    let result = three_stage_valuation(args.latest_oe, args.cagr, &params)?;
    let negative = result.iv_per_share_low < 0.0;

    let data = CalcIvResponseData {
        result,
        inputs: CalcIvInputs {
            latest_oe: args.latest_oe,
            cagr: args.cagr,
            params,
        },
    };

    let mut command_result = CommandResult::ok(serde_json::to_value(data)?);
    if let Some(warning) = inverted_band_warning(&settings) {
        command_result = command_result.with_warning(warning);
    }
    if negative {
        command_result = command_result
            .with_warning("iv_per_share_low is negative; check latest_oe, growth and debt");
    }
    Ok(command_result)
}
