//! Behaviour tests for the Financial Modeling Prep statement source.
//!
//! The transport is replaced by [`RoutedHttpClient`], so these run offline
//! against canned FMP payloads.

use std::sync::Arc;

use ivco_core::{
    analyze_ticker, fetch_bundle, AnalysisParameters, FmpFetcher, HttpClient, PipelineError,
    ProviderId, StatementSource, Ticker, UpstreamError,
};
use ivco_tests::RoutedHttpClient;

const BASE_URL: &str = "http://fmp.test/api/v3/";

const INCOME_STATEMENTS: &str = r#"[
    {"symbol":"TSM","date":"2022-12-31","period":"FY","netIncome":1016900515000,
     "depreciationAndAmortization":437254273000,"capitalExpenditure":-1075620698000,
     "revenue":2263891292000,"grossProfit":1348354946000},
    {"symbol":"TSM","date":"2021-12-31","period":"FY","netIncome":596540162000,
     "depreciationAndAmortization":422425530000,"capitalExpenditure":-839196223000},
    {"symbol":"TSM","date":"2020-12-31","period":"FY","netIncome":517885387000,
     "depreciationAndAmortization":331692250000,"capitalExpenditure":-507238845000}
]"#;

const BALANCE_SHEETS: &str = r#"[
    {"symbol":"TSM","date":"2022-12-31","totalDebt":916000000000,
     "totalAssets":4964907023000,"commonStockSharesOutstanding":25930380458}
]"#;

const QUOTE: &str = r#"[
    {"symbol":"TSM","price":98.42,"pe":15.1,"marketCap":510400000000,
     "changesPercentage":-1.25}
]"#;

fn tsm() -> Ticker {
    Ticker::parse("TSM").expect("valid ticker")
}

fn fetcher(client: &Arc<RoutedHttpClient>) -> FmpFetcher {
    let transport: Arc<dyn HttpClient> = client.clone();
    FmpFetcher::new(transport, "test-key")
        .expect("non-blank key")
        .with_base_url(BASE_URL)
}

fn full_client() -> Arc<RoutedHttpClient> {
    Arc::new(
        RoutedHttpClient::new()
            .route("income-statement", INCOME_STATEMENTS)
            .route("balance-sheet-statement", BALANCE_SHEETS)
            .route("quote", QUOTE),
    )
}

#[tokio::test]
async fn bundle_normalizes_fmp_payloads() {
    // Given: canned FMP responses for all three endpoints
    let client = full_client();
    let source = fetcher(&client);

    // When: a bundle is fetched
    let bundle = fetch_bundle(&source, &tsm(), 5).await.expect("fetch succeeds");

    // Then: statements keep vendor order and capex is stored as a magnitude
    assert_eq!(source.id(), ProviderId::Fmp);
    assert_eq!(bundle.income_statements.len(), 3);
    let latest = &bundle.income_statements[0];
    assert_eq!(latest.year, 2022);
    assert_eq!(latest.net_income, 1_016_900_515_000);
    assert_eq!(latest.depreciation, 437_254_273_000);
    assert_eq!(latest.amortization, 0);
    assert_eq!(latest.capex, 1_075_620_698_000);
    assert_eq!(latest.revenue, 2_263_891_292_000);

    // And: balance sheet and quote carry their figures
    assert_eq!(bundle.balance_sheet[0].shares_outstanding, 25_930_380_458);
    assert_eq!(bundle.balance_sheet[0].total_debt, 916_000_000_000);
    assert_eq!(bundle.quote.price, 98.42);
    assert_eq!(bundle.quote.change_pct, -1.25);
}

#[tokio::test]
async fn requests_carry_limit_key_and_user_agent() {
    // Given: a recording transport
    let client = full_client();
    let source = fetcher(&client);

    // When: a bundle with a 7-year history is fetched
    fetch_bundle(&source, &tsm(), 7).await.expect("fetch succeeds");

    // Then: three requests went out in order, without a doubled slash
    let requests = client.requests();
    let urls = requests.iter().map(|request| request.url.as_str()).collect::<Vec<_>>();
    assert_eq!(
        urls,
        vec![
            "http://fmp.test/api/v3/income-statement/TSM?limit=7&apikey=test-key",
            "http://fmp.test/api/v3/balance-sheet-statement/TSM?limit=7&apikey=test-key",
            "http://fmp.test/api/v3/quote/TSM?apikey=test-key",
        ]
    );
    assert!(requests.iter().all(|request| request
        .headers
        .get("user-agent")
        .is_some_and(|agent| agent.starts_with("IVCO-CLI/"))));
}

#[tokio::test]
async fn numeric_exchange_listings_are_requested_as_given() {
    // Given: the Taiwan listing of TSMC
    let client = full_client();
    let source = fetcher(&client);
    let listing = Ticker::parse("2330.tw").expect("numeric listings are valid");

    // When: its quote is fetched
    source.quote(&listing).await.expect("fetch succeeds");

    // Then: the symbol is passed through upper-cased
    let requests = client.requests();
    assert_eq!(requests[0].url, "http://fmp.test/api/v3/quote/2330.TW?apikey=test-key");
}

#[tokio::test]
async fn error_object_becomes_an_empty_series() {
    // Given: FMP answering the income endpoint with its error object
    let client = Arc::new(
        RoutedHttpClient::new()
            .route(
                "income-statement",
                r#"{"Error Message":"Invalid API KEY. Please retry or visit our documentation."}"#,
            )
            .route("balance-sheet-statement", BALANCE_SHEETS)
            .route("quote", QUOTE),
    );
    let source = fetcher(&client);

    // When: statements are fetched
    let statements = source
        .income_statements(&tsm(), 5)
        .await
        .expect("error objects are not transport failures");

    // Then: there is simply no data
    assert!(statements.is_empty());

    // And: the composed analysis reports insufficient data
    let err = analyze_ticker(&source, &tsm(), 5, &AnalysisParameters::default())
        .await
        .expect_err("no history");
    assert!(matches!(err, PipelineError::InsufficientData { .. }));
}

#[tokio::test]
async fn http_status_failures_are_upstream_errors() {
    // Given: a rate-limited balance sheet endpoint
    let client = Arc::new(
        RoutedHttpClient::new()
            .route("income-statement", INCOME_STATEMENTS)
            .route_status("balance-sheet-statement", 429)
            .route("quote", QUOTE),
    );
    let source = fetcher(&client);

    // When: the pipeline runs
    let err = analyze_ticker(&source, &tsm(), 5, &AnalysisParameters::default())
        .await
        .expect_err("status 429");

    // Then: the failure names the endpoint and status
    assert_eq!(
        err,
        PipelineError::Upstream(UpstreamError::Status {
            endpoint: String::from("balance-sheet-statement"),
            status: 429,
        })
    );
    assert_eq!(client.requests().len(), 2);
}

#[tokio::test]
async fn unreachable_host_is_a_transport_error() {
    // Given: a transport with no routes at all
    let client = Arc::new(RoutedHttpClient::new());
    let source = fetcher(&client);

    // When/Then: the first request fails at the transport layer
    let err = fetch_bundle(&source, &tsm(), 5)
        .await
        .expect_err("no route");
    assert!(matches!(err, UpstreamError::Transport(_)));
    assert_eq!(err.code(), "upstream.transport");
}

#[tokio::test]
async fn analysis_runs_end_to_end_over_fmp_data() {
    // Given: three years of TSMC statements served by FMP
    let client = full_client();
    let source = fetcher(&client);
    let params = AnalysisParameters {
        long_term_debt: Some(0),
        ..AnalysisParameters::default()
    };

    // When: the ticker is analyzed
    let report = analyze_ticker(&source, &tsm(), 3, &params)
        .await
        .expect("analysis succeeds");

    // Then: Owner Earnings match the worked example and feed the valuation
    assert_eq!(report.ticker, "TSM");
    assert_eq!(report.oe_series.last().map(|point| point.oe), Some(1_239_030_648_400));
    assert_eq!((report.cagr.start_year, report.cagr.end_year), (2020, 2022));
    assert!(report.cagr.cagr > 0.0);
    assert_eq!(report.shares_outstanding, 25_930_380_458);
    assert_eq!(report.long_term_debt, 0);
    assert_eq!(report.current_price, 98.42);
    assert!(report.valuation.iv_per_share_low > 0.0);
}

#[test]
fn blank_api_key_is_rejected_before_any_request() {
    let client = Arc::new(RoutedHttpClient::new());
    let transport: Arc<dyn HttpClient> = client.clone();

    let err = FmpFetcher::new(transport, "   ").expect_err("blank key");
    assert_eq!(err, UpstreamError::MissingApiKey);
    assert!(client.requests().is_empty());
}
