use serde::{Deserialize, Serialize};

/// One fiscal year of income and cash-flow line items in the engine's schema.
///
/// Monetary fields share a single unit within a run. `capex` is always the
/// non-negative magnitude of capital expenditure regardless of how the
/// source statement signs it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinancialStatementYear {
    pub ticker: String,
    pub year: i32,
    #[serde(default = "default_period")]
    pub period: String,
    #[serde(default)]
    pub net_income: i64,
    #[serde(default)]
    pub depreciation: i64,
    #[serde(default)]
    pub amortization: i64,
    #[serde(default)]
    pub capex: i64,
    #[serde(default)]
    pub revenue: i64,
    #[serde(default)]
    pub gross_profit: i64,
}

impl FinancialStatementYear {
    /// Year-only constructor; line items start at zero.
    pub fn new(ticker: impl Into<String>, year: i32) -> Self {
        Self {
            ticker: ticker.into(),
            year,
            period: default_period(),
            net_income: 0,
            depreciation: 0,
            amortization: 0,
            capex: 0,
            revenue: 0,
            gross_profit: 0,
        }
    }

    pub fn with_cash_items(
        mut self,
        net_income: i64,
        depreciation: i64,
        amortization: i64,
        capex: i64,
    ) -> Self {
        self.net_income = net_income;
        self.depreciation = depreciation;
        self.amortization = amortization;
        self.capex = capex.saturating_abs();
        self
    }
}

/// Balance-sheet figures the valuation needs from a fiscal year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceSheetYear {
    pub ticker: String,
    pub year: i32,
    #[serde(default)]
    pub total_debt: i64,
    #[serde(default)]
    pub total_assets: i64,
    #[serde(default)]
    pub shares_outstanding: i64,
}

/// Latest market quote for a ticker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    pub ticker: String,
    pub price: f64,
    pub pe: f64,
    pub market_cap: f64,
    pub change_pct: f64,
}

impl QuoteSnapshot {
    /// Placeholder used when the provider has nothing for the ticker.
    pub fn empty(ticker: impl Into<String>) -> Self {
        Self {
            ticker: ticker.into(),
            price: 0.0,
            pe: 0.0,
            market_cap: 0.0,
            change_pct: 0.0,
        }
    }
}

fn default_period() -> String {
    String::from("FY")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_stores_capex_as_magnitude() {
        let statement = FinancialStatementYear::new("TSM", 2022).with_cash_items(10, 2, 1, -7);
        assert_eq!(statement.capex, 7);
        assert_eq!(statement.period, "FY");
    }

    #[test]
    fn missing_line_items_deserialize_as_zero() {
        let statement: FinancialStatementYear =
            serde_json::from_str(r#"{"ticker":"TSM","year":2021,"net_income":5}"#)
                .expect("sparse record should deserialize");

        assert_eq!(statement.net_income, 5);
        assert_eq!(statement.depreciation, 0);
        assert_eq!(statement.capex, 0);
        assert_eq!(statement.period, "FY");
    }
}
