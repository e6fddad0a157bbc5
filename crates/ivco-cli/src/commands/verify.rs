use ivco_core::valuation::verify_range;

use crate::cli::VerifyArgs;
use crate::error::CliError;

use super::{CommandResult, Outcome};

pub fn run(args: &VerifyArgs) -> Result<CommandResult, CliError> {
    let outcome = verify_range(
        args.computed_low,
        args.computed_high,
        args.expected_low,
        args.expected_high,
        args.tolerance,
    )?;

    let result = CommandResult::ok(serde_json::to_value(outcome)?);
    if outcome.passed() {
        Ok(result)
    } else {
        Ok(result.with_outcome(Outcome::VerificationFailed))
    }
}
