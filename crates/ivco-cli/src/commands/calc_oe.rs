use serde::Serialize;

use ivco_core::valuation::{cash_earnings, maintenance_capex, owner_earnings};

use crate::cli::CalcOeArgs;
use crate::config::ValuationConfig;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CalcOeInputs {
    net_income: i64,
    depreciation: i64,
    amortization: i64,
    capex: i64,
    maintenance_capex_ratio: f64,
}

#[derive(Debug, Serialize)]
struct CalcOeResponseData {
    owner_earnings: i64,
    cash_earnings: i64,
    maintenance_capex: i64,
    inputs: CalcOeInputs,
}

pub fn run(args: &CalcOeArgs, defaults: &ValuationConfig) -> Result<CommandResult, CliError> {
    let ratio = args.maintenance_ratio.unwrap_or(defaults.maintenance_ratio);
    if !ratio.is_finite() {
        return Err(CliError::InvalidInput(String::from(
            "maintenance ratio must be a finite number",
        )));
    }

    let data = CalcOeResponseData {
        owner_earnings: owner_earnings(
            args.net_income,
            args.depreciation,
            args.amortization,
            args.capex,
            ratio,
        )?,
        cash_earnings: cash_earnings(args.net_income, args.depreciation, args.amortization)?,
        maintenance_capex: maintenance_capex(args.capex, ratio),
        inputs: CalcOeInputs {
            net_income: args.net_income,
            depreciation: args.depreciation,
            amortization: args.amortization,
            capex: args.capex,
            maintenance_capex_ratio: ratio,
        },
    };

    let mut result = CommandResult::ok(serde_json::to_value(data)?);
    if !(0.0..=1.0).contains(&ratio) {
        result = result.with_warning(format!("maintenance ratio {ratio} is outside [0, 1]"));
    }
    Ok(result)
}
