use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::http_client::{HttpClient, HttpRequest, DEFAULT_TIMEOUT_MS};
use crate::statement_source::{SourceFuture, StatementSource};
use crate::{
    BalanceSheetYear, FinancialStatementYear, ProviderId, QuoteSnapshot, Ticker, UpstreamError,
};

pub const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";
pub const FMP_API_KEY_ENV: &str = "FMP_API_KEY";

/// Financial Modeling Prep v3 client (free tier: 250 requests/day).
#[derive(Clone)]
pub struct FmpFetcher {
    http_client: Arc<dyn HttpClient>,
    api_key: String,
    base_url: String,
    timeout_ms: u64,
}

impl std::fmt::Debug for FmpFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FmpFetcher")
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .finish_non_exhaustive()
    }
}

impl FmpFetcher {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        api_key: impl Into<String>,
    ) -> Result<Self, UpstreamError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(UpstreamError::MissingApiKey);
        }

        Ok(Self {
            http_client,
            api_key,
            base_url: String::from(FMP_BASE_URL),
            timeout_ms: DEFAULT_TIMEOUT_MS,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn build_url(&self, ticker: &Ticker, endpoint: &str, limit: usize) -> String {
        format!(
            "{}/{endpoint}/{}?limit={limit}&apikey={}",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }

    fn quote_url(&self, ticker: &Ticker) -> String {
        format!(
            "{}/quote/{}?apikey={}",
            self.base_url,
            urlencoding::encode(ticker.as_str()),
            urlencoding::encode(&self.api_key)
        )
    }

    /// Parse an income statement into the engine's schema.
    ///
    /// FMP reports depreciation and amortization as one figure, so it all
    /// lands in `depreciation`. Capex is stored as a magnitude.
    pub fn parse_income_statement(raw: &FmpIncomeStatement) -> FinancialStatementYear {
        FinancialStatementYear {
            ticker: raw.symbol.clone().unwrap_or_default(),
            year: year_of(raw.date.as_deref()),
            period: raw.period.clone().unwrap_or_else(|| String::from("FY")),
            net_income: whole(raw.net_income),
            depreciation: whole(raw.depreciation_and_amortization),
            amortization: 0,
            capex: whole(raw.capital_expenditure).saturating_abs(),
            revenue: whole(raw.revenue),
            gross_profit: whole(raw.gross_profit),
        }
    }

    pub fn parse_balance_sheet(raw: &FmpBalanceSheet) -> BalanceSheetYear {
        BalanceSheetYear {
            ticker: raw.symbol.clone().unwrap_or_default(),
            year: year_of(raw.date.as_deref()),
            total_debt: whole(raw.total_debt),
            total_assets: whole(raw.total_assets),
            shares_outstanding: whole(raw.common_stock_shares_outstanding),
        }
    }

    pub fn parse_quote(raw: &FmpQuote, ticker: &Ticker) -> QuoteSnapshot {
        QuoteSnapshot {
            ticker: raw
                .symbol
                .clone()
                .unwrap_or_else(|| ticker.as_str().to_owned()),
            price: raw.price.unwrap_or_default(),
            pe: raw.pe.unwrap_or_default(),
            market_cap: raw.market_cap.unwrap_or_default(),
            change_pct: raw.changes_percentage.unwrap_or_default(),
        }
    }

    /// GET `url` and decode a JSON array. A non-array body (FMP answers
    /// errors with an object) becomes an empty list.
    async fn get_list<T>(&self, endpoint: &str, url: String) -> Result<Vec<T>, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let request = HttpRequest::get(url)
            .with_header("User-Agent", concat!("IVCO-CLI/", env!("CARGO_PKG_VERSION")))
            .with_timeout_ms(self.timeout_ms);

        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(|e| UpstreamError::Transport(e.message().to_owned()))?;

        if !response.is_success() {
            return Err(UpstreamError::Status {
                endpoint: endpoint.to_owned(),
                status: response.status,
            });
        }

        let value: serde_json::Value =
            serde_json::from_str(&response.body).map_err(|e| UpstreamError::Malformed {
                endpoint: endpoint.to_owned(),
                message: e.to_string(),
            })?;

        if !value.is_array() {
            tracing::warn!(endpoint, "fmp response is not a list, treating as empty");
            return Ok(Vec::new());
        }

        serde_json::from_value(value).map_err(|e| UpstreamError::Malformed {
            endpoint: endpoint.to_owned(),
            message: e.to_string(),
        })
    }
}

impl StatementSource for FmpFetcher {
    fn id(&self) -> ProviderId {
        ProviderId::Fmp
    }

    fn income_statements<'a>(
        &'a self,
        ticker: &'a Ticker,
        limit: usize,
    ) -> SourceFuture<'a, Vec<FinancialStatementYear>> {
        Box::pin(async move {
            tracing::info!(ticker = ticker.as_str(), limit, "fetching fmp income statements");
            let url = self.build_url(ticker, "income-statement", limit);
            let raw = self
                .get_list::<FmpIncomeStatement>("income-statement", url)
                .await?;
            Ok(raw.iter().map(Self::parse_income_statement).collect())
        })
    }

    fn balance_sheets<'a>(
        &'a self,
        ticker: &'a Ticker,
        limit: usize,
    ) -> SourceFuture<'a, Vec<BalanceSheetYear>> {
        Box::pin(async move {
            tracing::info!(ticker = ticker.as_str(), limit, "fetching fmp balance sheets");
            let url = self.build_url(ticker, "balance-sheet-statement", limit);
            let raw = self
                .get_list::<FmpBalanceSheet>("balance-sheet-statement", url)
                .await?;
            Ok(raw.iter().map(Self::parse_balance_sheet).collect())
        })
    }

    fn quote<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, QuoteSnapshot> {
        Box::pin(async move {
            tracing::info!(ticker = ticker.as_str(), "fetching fmp quote");
            let raw = self
                .get_list::<FmpQuote>("quote", self.quote_url(ticker))
                .await?;
            Ok(raw
                .first()
                .map(|quote| Self::parse_quote(quote, ticker))
                .unwrap_or_else(|| QuoteSnapshot::empty(ticker.as_str())))
        })
    }
}

/// FMP `income-statement` row. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FmpIncomeStatement {
    pub symbol: Option<String>,
    pub date: Option<String>,
    pub period: Option<String>,
    pub net_income: Option<f64>,
    pub depreciation_and_amortization: Option<f64>,
    pub capital_expenditure: Option<f64>,
    pub revenue: Option<f64>,
    pub gross_profit: Option<f64>,
}

/// FMP `balance-sheet-statement` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FmpBalanceSheet {
    pub symbol: Option<String>,
    pub date: Option<String>,
    pub total_debt: Option<f64>,
    pub total_assets: Option<f64>,
    pub common_stock_shares_outstanding: Option<f64>,
}

/// FMP `quote` row.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FmpQuote {
    pub symbol: Option<String>,
    pub price: Option<f64>,
    pub pe: Option<f64>,
    pub market_cap: Option<f64>,
    pub changes_percentage: Option<f64>,
}

fn year_of(date: Option<&str>) -> i32 {
    date.and_then(|date| date.get(..4))
        .and_then(|year| year.parse().ok())
        .unwrap_or(0)
}

fn whole(value: Option<f64>) -> i64 {
    value
        .filter(|value| value.is_finite())
        .map_or(0, |value| value.round() as i64)
}
