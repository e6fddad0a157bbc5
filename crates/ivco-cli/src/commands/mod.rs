mod analyze;
mod calc_cagr;
mod calc_iv;
mod calc_oe;
mod fetch;
mod tools;
mod verify;

use std::sync::Arc;

use ivco_core::{Envelope, FmpFetcher, ProviderId, ReqwestHttpClient, UpstreamError};
use serde_json::Value;

use crate::cli::{Cli, Command, SourceSelector, ValuationArgs};
use crate::config::{Config, FmpConfig, ValuationConfig};
use crate::error::CliError;
use crate::metadata::Metadata;

/// How a successfully rendered command should exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    VerificationFailed,
}

impl Outcome {
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::VerificationFailed => 1,
        }
    }
}

#[derive(Debug)]
pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub latency_ms: u64,
    pub source_chain: Vec<ProviderId>,
    pub outcome: Outcome,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            latency_ms: 0,
            source_chain: vec![ProviderId::Local],
            outcome: Outcome::Success,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_latency(mut self, latency_ms: u64) -> Self {
        self.latency_ms = latency_ms;
        self
    }

    pub fn with_source_chain(mut self, source_chain: Vec<ProviderId>) -> Self {
        self.source_chain = source_chain;
        self
    }

    pub fn with_outcome(mut self, outcome: Outcome) -> Self {
        self.outcome = outcome;
        self
    }
}

pub async fn run(cli: &Cli, config: &Config) -> Result<(Envelope<Value>, Outcome), CliError> {
    let command_result = match &cli.command {
        Command::CalcOe(args) => calc_oe::run(args, &config.valuation)?,
        Command::CalcCagr(args) => calc_cagr::run(args)?,
        Command::CalcIv(args) => calc_iv::run(args, &config.valuation)?,
        Command::Verify(args) => verify::run(args)?,
        Command::Fetch(args) => {
            let fetcher = build_source(args.source, &config.fmp)?;
            fetch::run(args, &fetcher).await?
        }
        Command::Analyze(args) => {
            let fetcher = build_source(SourceSelector::Fmp, &config.fmp)?;
            analyze::run(args, &config.valuation, &fetcher).await?
        }
        Command::ListTools => tools::list()?,
        Command::ToolInfo(args) => tools::info(args)?,
    };

    let CommandResult {
        data,
        warnings,
        latency_ms,
        source_chain,
        outcome,
    } = command_result;

    let mut metadata = Metadata::new(source_chain, latency_ms)?;
    for warning in warnings {
        metadata.push_warning(warning);
    }
    let meta = metadata.into_envelope_meta()?;

    Ok((Envelope::success(meta, data), outcome))
}

fn build_source(source: SourceSelector, config: &FmpConfig) -> Result<FmpFetcher, CliError> {
    match source {
        SourceSelector::Fmp => {
            let api_key = config
                .resolve_api_key()
                .ok_or(UpstreamError::MissingApiKey)?;
            let fetcher = FmpFetcher::new(Arc::new(ReqwestHttpClient::new()), api_key)?
                .with_base_url(config.base_url.as_str())
                .with_timeout_ms(config.timeout_ms);
            Ok(fetcher)
        }
    }
}

/// Overlay explicit flags on the configured defaults.
fn resolve_valuation(args: &ValuationArgs, defaults: &ValuationConfig) -> ValuationConfig {
    ValuationConfig {
        maintenance_ratio: defaults.maintenance_ratio,
        cc_low: args.cc_low.unwrap_or(defaults.cc_low),
        cc_high: args.cc_high.unwrap_or(defaults.cc_high),
        stage2_cagr: args.stage2_cagr.unwrap_or(defaults.stage2_cagr),
        stage3_cagr: args.stage3_cagr.unwrap_or(defaults.stage3_cagr),
        discount_rate: args.discount_rate.unwrap_or(defaults.discount_rate),
        share_par_value: args.share_par_value.unwrap_or(defaults.share_par_value),
        stage1_years: args.stage1_years.unwrap_or(defaults.stage1_years),
        stage2_years: args.stage2_years.unwrap_or(defaults.stage2_years),
    }
}

fn inverted_band_warning(settings: &ValuationConfig) -> Option<String> {
    (settings.cc_low > settings.cc_high).then(|| {
        format!(
            "cc_low ({}) exceeds cc_high ({}); coefficients were swapped",
            settings.cc_low, settings.cc_high
        )
    })
}

fn elapsed_ms(started: std::time::Instant) -> u64 {
    u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX)
}
