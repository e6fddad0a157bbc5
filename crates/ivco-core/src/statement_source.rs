//! Statement provider contract.
//!
//! A [`StatementSource`] turns a vendor's wire format into the canonical
//! records in [`crate::domain`]. Anything it cannot normalize it leaves
//! out; callers treat an empty series as insufficient data.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::{
    BalanceSheetYear, FinancialStatementYear, ProviderId, QuoteSnapshot, Ticker, UpstreamError,
};

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, UpstreamError>> + Send + 'a>>;

/// Source adapter contract.
///
/// Implementations must be `Send + Sync`. Each call is a single request;
/// there is no retry or caching behind it.
pub trait StatementSource: Send + Sync {
    /// Provider recorded in envelope metadata.
    fn id(&self) -> ProviderId;

    /// Up to `limit` annual income statements, newest first as the vendor
    /// returns them.
    fn income_statements<'a>(
        &'a self,
        ticker: &'a Ticker,
        limit: usize,
    ) -> SourceFuture<'a, Vec<FinancialStatementYear>>;

    /// Up to `limit` annual balance sheets.
    fn balance_sheets<'a>(
        &'a self,
        ticker: &'a Ticker,
        limit: usize,
    ) -> SourceFuture<'a, Vec<BalanceSheetYear>>;

    /// Latest quote. Providers with no data return [`QuoteSnapshot::empty`].
    fn quote<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, QuoteSnapshot>;
}

/// Everything one ticker's valuation needs from upstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementBundle {
    pub ticker: Ticker,
    pub income_statements: Vec<FinancialStatementYear>,
    pub balance_sheet: Vec<BalanceSheetYear>,
    pub quote: QuoteSnapshot,
}

/// Fetch income statements, balance sheets and quote one after another.
pub async fn fetch_bundle<S>(
    source: &S,
    ticker: &Ticker,
    years: usize,
) -> Result<StatementBundle, UpstreamError>
where
    S: StatementSource + ?Sized,
{
    let income_statements = source.income_statements(ticker, years).await?;
    let balance_sheet = source.balance_sheets(ticker, years).await?;
    let quote = source.quote(ticker).await?;

    tracing::debug!(
        ticker = ticker.as_str(),
        income_statements = income_statements.len(),
        balance_sheets = balance_sheet.len(),
        "statement bundle fetched"
    );

    Ok(StatementBundle {
        ticker: ticker.clone(),
        income_statements,
        balance_sheet,
        quote,
    })
}
