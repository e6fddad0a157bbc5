use std::time::Instant;

use serde::Serialize;

use ivco_core::{fetch_bundle, ProviderId, StatementBundle, StatementSource, Ticker};

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::{elapsed_ms, CommandResult};

#[derive(Debug, Serialize)]
struct FetchResponseData {
    source: ProviderId,
    years: usize,
    #[serde(flatten)]
    bundle: StatementBundle,
}

pub async fn run<S>(args: &FetchArgs, source: &S) -> Result<CommandResult, CliError>
where
    S: StatementSource + ?Sized,
{
    let ticker = Ticker::parse(&args.ticker)?;
    let started = Instant::now();
    let bundle = fetch_bundle(source, &ticker, args.years).await?;
    let latency_ms = elapsed_ms(started);

    let mut warnings = Vec::new();
    if bundle.income_statements.is_empty() {
        warnings.push(format!("no income statements returned for {ticker}"));
    }
    if bundle.balance_sheet.is_empty() {
        warnings.push(format!("no balance sheets returned for {ticker}"));
    }

    let data = FetchResponseData {
        source: source.id(),
        years: args.years,
        bundle,
    };

    let mut result = CommandResult::ok(serde_json::to_value(data)?)
        .with_source_chain(vec![source.id()])
        .with_latency(latency_ms);
    for warning in warnings {
        result = result.with_warning(warning);
    }
    Ok(result)
}
