//! Load configuration.
//!
//! A JSON file maps warehouse tables to source filenames and selects the
//! referential-integrity policy. Every field has a conventional default,
//! so a missing or minimal config file still produces a full mapping.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Table name → source filename, resolved against the data directory.
    #[serde(default = "default_sources")]
    pub sources: HashMap<String, String>,

    /// When true, any post-load integrity violation fails the pipeline.
    /// When false, violations are logged and reported only.
    #[serde(default)]
    pub strict_referential: bool,

    /// Generate dim_date for this range when no date source file exists.
    #[serde(default)]
    pub date_dimension: Option<DateRangeConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateRangeConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Month the fiscal year starts in (1 = fiscal equals calendar).
    #[serde(default = "default_fiscal_start")]
    pub fiscal_year_start_month: u32,
}

fn default_fiscal_start() -> u32 {
    1
}

fn default_sources() -> HashMap<String, String> {
    [
        ("stg_call_center_logs", "call_center_logs.csv"),
        ("stg_marketing_documents", "marketing_documents.csv"),
        ("dim_geography", "geography.csv"),
        ("dim_branch", "branches.csv"),
        ("dim_private_banker", "private_bankers.csv"),
        ("dim_customer", "customers.csv"),
        ("dim_csr", "csrs.csv"),
        ("dim_account", "accounts.csv"),
        ("dim_product", "products.csv"),
        ("dim_date", "dates.csv"),
        ("fact_transactions", "transactions.csv"),
        ("fact_credit_card", "credit_card_snapshots.csv"),
        ("fact_credit_scores", "credit_scores.csv"),
        ("fact_csr_interactions", "csr_interactions.csv"),
        ("fact_loans", "loans.csv"),
    ]
    .into_iter()
    .map(|(t, f)| (t.to_string(), f.to_string()))
    .collect()
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            sources: default_sources(),
            strict_referential: false,
            date_dimension: None,
        }
    }
}

impl LoadConfig {
    /// Load from a JSON file.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Cannot read {path}: {e}"))?;
        let config: LoadConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    pub fn source_for(&self, table: &str) -> Option<&str> {
        self.sources.get(table).map(String::as_str)
    }
}
