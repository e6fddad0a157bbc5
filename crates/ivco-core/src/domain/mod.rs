//! # Domain Models
//!
//! Canonical records exchanged between the statement fetcher, the
//! valuation engine and the command surface.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated exchange ticker |
//! | [`FinancialStatementYear`] | Income/cash-flow items for one fiscal year |
//! | [`BalanceSheetYear`] | Debt, assets and share count for one fiscal year |
//! | [`QuoteSnapshot`] | Latest market price |
//! | [`UtcDateTime`] | UTC timestamp used in envelope metadata |
//!
//! Records are immutable once built. Vendor fields that are missing are
//! zero-filled at the ingestion boundary, never inside the engine.

mod statements;
mod ticker;
mod timestamp;

pub use statements::{BalanceSheetYear, FinancialStatementYear, QuoteSnapshot};
pub use ticker::Ticker;
pub use timestamp::UtcDateTime;
