//! Core contracts for ivco.
//!
//! This crate contains:
//! - The Owner Earnings valuation engine (OE, CAGR, three-stage DCF, verifier)
//! - Canonical statement records and validation
//! - Response envelope and structured errors
//! - Statement source trait and the FMP fetcher
//! - The composed analysis pipeline and tool catalog

pub mod adapters;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod http_client;
pub mod pipeline;
pub mod source;
pub mod statement_source;
pub mod tools;
pub mod valuation;

pub use adapters::{FmpFetcher, FMP_API_KEY_ENV, FMP_BASE_URL};
pub use domain::{BalanceSheetYear, FinancialStatementYear, QuoteSnapshot, Ticker, UtcDateTime};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta, SCHEMA_VERSION};
pub use error::{DomainError, PipelineError, UpstreamError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use pipeline::{analyze, analyze_ticker, AnalysisParameters, AnalysisReport, ExpectedRange};
pub use source::ProviderId;
pub use statement_source::{fetch_bundle, SourceFuture, StatementBundle, StatementSource};
pub use tools::{list_tools, tool_info, ToolInfo};
