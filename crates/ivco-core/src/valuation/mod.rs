//! # Valuation Engine
//!
//! Pure numeric stages, leaves first:
//!
//! | Stage | Entry point | Output |
//! |-------|-------------|--------|
//! | Owner Earnings | [`owner_earnings`] | `i64` per year |
//! | Growth | [`cagr`] | [`CagrResult`] |
//! | Three-stage DCF | [`three_stage_valuation`] | [`ValuationResult`] |
//! | Verification | [`verify_range`] | [`VerificationOutcome`] |
//!
//! Nothing here performs I/O or holds state. Arithmetic that is undefined
//! or leaves `i64` fails with [`DomainError`](crate::DomainError); a CAGR over a
//! non-positive base is the one documented exception and returns `0.0`.

mod cagr;
mod owner_earnings;
mod three_stage;
mod verify;

pub use cagr::{cagr, cagr_between, CagrResult, RealityCoefficient, RealityCoefficients};
pub use owner_earnings::{
    cash_earnings, maintenance_capex, owner_earnings, owner_earnings_series, statement_owner_earnings,
    OwnerEarningsPoint,
};
pub use three_stage::{
    normalize_shares, three_stage_valuation, ProjectedCashFlow, ScenarioValuation,
    StageProjection, ValuationParameters, ValuationResult, DEFAULT_SHARE_PAR_VALUE,
    DEFAULT_STAGE1_YEARS, DEFAULT_STAGE2_YEARS, MAX_STAGE_YEARS,
};
pub use verify::{verify_range, VerificationOutcome, VerificationStatus};
