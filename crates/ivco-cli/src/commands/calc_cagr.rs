use serde::Serialize;

use ivco_core::valuation::{cagr_between, CagrResult, OwnerEarningsPoint, RealityCoefficients};

use crate::cli::CalcCagrArgs;
use crate::error::CliError;

use super::CommandResult;

#[derive(Debug, Serialize)]
struct CalcCagrInputs {
    start_oe: i64,
    end_oe: i64,
    start_year: i32,
    end_year: i32,
    reality_coefficients: RealityCoefficients,
}

#[derive(Debug, Serialize)]
struct CalcCagrResponseData {
    #[serde(flatten)]
    result: CagrResult,
    inputs: CalcCagrInputs,
}

pub fn run(args: &CalcCagrArgs) -> Result<CommandResult, CliError> {
    let coefficients = args
        .reality
        .iter()
        .map(|entry| (entry.year, entry.coefficient))
        .collect::<RealityCoefficients>();

    let result = cagr_between(
        OwnerEarningsPoint::new(args.start_year, args.start_oe),
        OwnerEarningsPoint::new(args.end_year, args.end_oe),
        &coefficients,
    )?;

    let sentinel = result.calibrated_start <= 0.0 || result.calibrated_end <= 0.0;
    let data = CalcCagrResponseData {
        result,
        inputs: CalcCagrInputs {
            start_oe: args.start_oe,
            end_oe: args.end_oe,
            start_year: args.start_year,
            end_year: args.end_year,
            reality_coefficients: coefficients,
        },
    };

    let mut command_result = CommandResult::ok(serde_json::to_value(data)?);
    if sentinel {
        command_result = command_result.with_warning(
            "calibrated owner earnings are not positive at an endpoint; cagr reported as 0",
        );
    }
    Ok(command_result)
}
