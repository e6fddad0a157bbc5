//! CLI argument definitions for ivco.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `calc-oe` | Owner Earnings for one fiscal year |
//! | `calc-cagr` | Growth rate between two Owner Earnings points |
//! | `calc-iv` | Three-stage intrinsic value range |
//! | `verify` | Compare a computed range with expected values |
//! | `fetch` | Download statements from FMP |
//! | `analyze` | fetch → calc-oe → calc-cagr → calc-iv |
//! | `list-tools` | Tool catalog |
//! | `tool-info` | One catalog entry |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `json` | Output format (json, table) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--data-only` | `false` | Emit only the `data` record |
//! | `--config` | `$IVCO_CONFIG` | TOML defaults for valuation and FMP |
//! | `--verbose` | `false` | Debug logging on stderr |
//!
//! Flags left unset fall back to the config file, then to built-in defaults.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use ivco_core::valuation::RealityCoefficient;

/// IVCO - Owner Earnings valuation toolkit
#[derive(Debug, Parser)]
#[command(
    name = "ivco",
    author,
    version,
    about = "Intrinsic Value Confidence Observatory: Owner Earnings valuation tools",
    long_about = "Composable valuation primitives (Owner Earnings, CAGR, three-stage DCF, \
range verification) plus an FMP statement fetcher and a one-stop analyze command.\n\
\n\
Every command prints a JSON envelope on stdout; logs go to stderr.\n\
\n\
Use 'ivco <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Print only the data record instead of the full envelope.
    #[arg(long, global = true, default_value_t = false)]
    pub data_only: bool,

    /// Path to a TOML config file (falls back to IVCO_CONFIG).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr.
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Key/value listing for terminal display.
    Table,
    /// Single JSON object output.
    Json,
}

/// Statement providers selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceSelector {
    /// Financial Modeling Prep (free tier).
    Fmp,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate Owner Earnings for a single year.
    ///
    ///   ivco calc-oe --net-income 1016900515000 --depreciation 437254273000 \
    ///     --amortization 0 --capex 1075620698000 --maintenance-ratio 0.20
    CalcOe(CalcOeArgs),

    /// Calculate CAGR between two Owner Earnings points.
    ///
    ///   ivco calc-cagr --start-oe 100 --end-oe 200 --start-year 2018 --end-year 2023
    CalcCagr(CalcCagrArgs),

    /// Calculate the intrinsic value range with a three-stage DCF.
    CalcIv(CalcIvArgs),

    /// Cross-validate a computed IV range against expected values.
    ///
    /// Exits with code 1 when the check fails.
    Verify(VerifyArgs),

    /// Fetch income statements, balance sheets and a quote.
    ///
    /// Requires FMP_API_KEY or `[fmp] api_key` in the config file.
    Fetch(FetchArgs),

    /// One-stop analysis: fetch → calc-oe → calc-cagr → calc-iv.
    Analyze(AnalyzeArgs),

    /// List the tool catalog.
    ListTools,

    /// Show one tool catalog entry.
    ToolInfo(ToolInfoArgs),
}

/// Arguments for the `calc-oe` command.
#[derive(Debug, Args)]
pub struct CalcOeArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub net_income: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub depreciation: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub amortization: i64,

    /// Capital expenditure; the sign is ignored.
    #[arg(long, allow_negative_numbers = true)]
    pub capex: i64,

    /// Share of capex treated as maintenance, in [0, 1].
    #[arg(long)]
    pub maintenance_ratio: Option<f64>,
}

/// Arguments for the `calc-cagr` command.
#[derive(Debug, Args)]
pub struct CalcCagrArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub start_oe: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub end_oe: i64,

    #[arg(long)]
    pub start_year: i32,

    #[arg(long)]
    pub end_year: i32,

    /// Reality coefficient as YEAR=FACTOR; repeatable.
    #[arg(long = "reality", value_name = "YEAR=FACTOR")]
    pub reality: Vec<RealityCoefficient>,
}

/// Valuation assumptions shared by `calc-iv` and `analyze`.
#[derive(Debug, Clone, Default, Args)]
pub struct ValuationArgs {
    /// Low confidence coefficient applied to stage-1 growth.
    #[arg(long, allow_negative_numbers = true)]
    pub cc_low: Option<f64>,

    /// High confidence coefficient applied to stage-1 growth.
    #[arg(long, allow_negative_numbers = true)]
    pub cc_high: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub stage2_cagr: Option<f64>,

    /// Perpetual growth; must stay below the discount rate.
    #[arg(long, allow_negative_numbers = true)]
    pub stage3_cagr: Option<f64>,

    #[arg(long, allow_negative_numbers = true)]
    pub discount_rate: Option<f64>,

    /// Par value per share when the raw share figure is stated in par units.
    #[arg(long, allow_negative_numbers = true)]
    pub share_par_value: Option<i64>,

    #[arg(long)]
    pub stage1_years: Option<u32>,

    #[arg(long)]
    pub stage2_years: Option<u32>,
}

/// Arguments for the `calc-iv` command.
#[derive(Debug, Args)]
pub struct CalcIvArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub latest_oe: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub cagr: f64,

    #[command(flatten)]
    pub valuation: ValuationArgs,

    #[arg(long, allow_negative_numbers = true)]
    pub long_term_debt: i64,

    /// Raw share count as reported.
    #[arg(long, allow_negative_numbers = true)]
    pub shares_outstanding: i64,
}

/// Arguments for the `verify` command.
#[derive(Debug, Args)]
pub struct VerifyArgs {
    #[arg(long, allow_negative_numbers = true)]
    pub computed_low: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub computed_high: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub expected_low: i64,

    #[arg(long, allow_negative_numbers = true)]
    pub expected_high: i64,

    /// Allowed absolute difference per bound.
    #[arg(long, default_value_t = 0)]
    pub tolerance: u64,
}

/// Arguments for the `fetch` command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Ticker symbol (e.g., TSM).
    #[arg(long)]
    pub ticker: String,

    /// Number of fiscal years to request.
    #[arg(long, default_value_t = ivco_core::pipeline::DEFAULT_HISTORY_YEARS)]
    pub years: usize,

    #[arg(long, value_enum, default_value_t = SourceSelector::Fmp)]
    pub source: SourceSelector,
}

/// Arguments for the `analyze` command.
#[derive(Debug, Args)]
pub struct AnalyzeArgs {
    /// Ticker symbol (e.g., TSM).
    #[arg(long)]
    pub ticker: String,

    /// Number of fiscal years to request.
    #[arg(long, default_value_t = ivco_core::pipeline::DEFAULT_HISTORY_YEARS)]
    pub years: usize,

    /// Share of capex treated as maintenance, in [0, 1].
    #[arg(long)]
    pub maintenance_ratio: Option<f64>,

    /// Reality coefficient as YEAR=FACTOR; repeatable.
    #[arg(long = "reality", value_name = "YEAR=FACTOR")]
    pub reality: Vec<RealityCoefficient>,

    #[command(flatten)]
    pub valuation: ValuationArgs,

    /// Override the share count from the latest balance sheet.
    #[arg(long)]
    pub shares_outstanding: Option<i64>,

    /// Override total debt from the latest balance sheet.
    #[arg(long, allow_negative_numbers = true)]
    pub long_term_debt: Option<i64>,

    /// Expected low IV per share; verification runs when both bounds are set.
    #[arg(long, allow_negative_numbers = true, requires = "expected_high")]
    pub expected_low: Option<i64>,

    #[arg(long, allow_negative_numbers = true, requires = "expected_low")]
    pub expected_high: Option<i64>,

    #[arg(long, default_value_t = 0)]
    pub tolerance: u64,
}

/// Arguments for the `tool-info` command.
#[derive(Debug, Args)]
pub struct ToolInfoArgs {
    /// Tool name as listed by `list-tools`.
    pub name: String,
}
