mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod metadata;
mod output;

use clap::Parser;
use ivco_core::{Envelope, EnvelopeError, ProviderId};
use std::process::ExitCode;

use crate::cli::Cli;
use crate::config::Config;
use crate::error::CliError;
use crate::metadata::Metadata;
use crate::output::RenderOptions;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_cli_logger(cli.verbose);

    let options = RenderOptions {
        format: cli.format,
        pretty: cli.pretty,
        data_only: cli.data_only,
    };

    match run(&cli, options).await {
        Ok(code) => code,
        Err(error) => {
            tracing::debug!(code = error.code(), "command failed");
            if let Err(render_error) = render_failure(&error, options) {
                eprintln!("error: failed to render error envelope: {render_error}");
            }
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run(cli: &Cli, options: RenderOptions) -> Result<ExitCode, CliError> {
    let config = Config::load(cli.config.as_deref())?;

    let (envelope, outcome) = commands::run(cli, &config).await?;
    output::render(&envelope, options)?;

    Ok(ExitCode::from(outcome.exit_code()))
}

/// Failures still produce an envelope on stdout, with `data: null`.
fn render_failure(error: &CliError, options: RenderOptions) -> Result<(), CliError> {
    let source_chain = vec![error.provider().unwrap_or(ProviderId::Local)];
    let meta = Metadata::new(source_chain, 0)?.into_envelope_meta()?;

    let mut envelope_error = EnvelopeError::new(error.code(), error.to_string())?;
    if let Some(provider) = error.provider() {
        envelope_error = envelope_error.with_source(provider);
    }

    output::render(&Envelope::failure(meta, envelope_error), options)
}
