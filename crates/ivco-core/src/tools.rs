//! Discoverable catalog of the commands this toolkit exposes.

use serde::Serialize;

/// Static description of one command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ToolInfo {
    pub name: &'static str,
    pub layer: u8,
    pub layer_name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub input: &'static str,
    pub output: &'static str,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    pub composes: &'static [&'static str],
}

const PRIMITIVE: &str = "primitive";
const COMPOSED: &str = "composed";

static TOOLS: [ToolInfo; 6] = [
    ToolInfo {
        name: "calc-oe",
        layer: 1,
        layer_name: PRIMITIVE,
        description: "Calculate Owner Earnings for a single year",
        usage: "ivco calc-oe --net-income N --depreciation N --amortization N --capex N --maintenance-ratio F",
        input: "Financial statement values + maintenance ratio",
        output: "JSON with owner_earnings value",
        composes: &[],
    },
    ToolInfo {
        name: "calc-cagr",
        layer: 1,
        layer_name: PRIMITIVE,
        description: "Calculate CAGR from OE series with Reality Coefficients",
        usage: "ivco calc-cagr --start-oe N --end-oe N --start-year Y --end-year Y [--reality YEAR=FACTOR]",
        input: "OE start/end values + years + optional reality coefficients",
        output: "JSON with cagr, years, calibrated values",
        composes: &[],
    },
    ToolInfo {
        name: "calc-iv",
        layer: 1,
        layer_name: PRIMITIVE,
        description: "Calculate Intrinsic Value using Three-Stage DCF",
        usage: "ivco calc-iv --latest-oe N --cagr F --cc-low F --cc-high F --stage2-cagr F --stage3-cagr F --discount-rate F --long-term-debt N --shares-outstanding N [--share-par-value N]",
        input: "OE + CAGR + valuation parameters",
        output: "JSON with iv_per_share_low, iv_per_share_high",
        composes: &[],
    },
    ToolInfo {
        name: "verify",
        layer: 1,
        layer_name: PRIMITIVE,
        description: "Cross-validate computed IV against expected values",
        usage: "ivco verify --computed-low N --computed-high N --expected-low N --expected-high N [--tolerance N]",
        input: "Computed and expected IV ranges",
        output: "JSON with status PASS/FAIL + deviations",
        composes: &[],
    },
    ToolInfo {
        name: "fetch",
        layer: 1,
        layer_name: PRIMITIVE,
        description: "Fetch financial data from external API (FMP free tier)",
        usage: "ivco fetch --ticker TSM --years 10 --source fmp",
        input: "Ticker symbol + years",
        output: "JSON with income_statements, balance_sheet, quote",
        composes: &[],
    },
    ToolInfo {
        name: "analyze",
        layer: 2,
        layer_name: COMPOSED,
        description: "One-stop analysis: fetch → calc-oe → calc-cagr → calc-iv",
        usage: "ivco analyze --ticker TSM --maintenance-ratio 0.20 --cc-low 1.2 --cc-high 1.5",
        input: "Ticker + valuation parameters",
        output: "JSON with full OE series, CAGR, IV range, current price",
        composes: &["fetch", "calc-oe", "calc-cagr", "calc-iv"],
    },
];

pub fn list_tools() -> &'static [ToolInfo] {
    &TOOLS
}

pub fn tool_info(name: &str) -> Option<&'static ToolInfo> {
    TOOLS.iter().find(|tool| tool.name == name)
}
