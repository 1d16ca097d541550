//! Semantic description of the warehouse, plus the pass-through interface
//! for handing configuration documents to external services.
//!
//! The semantic model is pure data: business names, synonyms, sample
//! values, and relationships mapped onto the physical schema, serialized
//! for an external natural-language query translator. Nothing in this
//! crate interprets it. The conversational-agent specification is treated
//! the same way — an opaque, versioned document submitted through
//! [`ConfigSink`].

use crate::error::MartResult;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

pub const SEMANTIC_MODEL_VERSION: &str = "1.0";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SemanticModel {
    pub name: String,
    pub version: String,
    pub description: String,
    pub tables: Vec<TableDoc>,
    pub relationships: Vec<Relationship>,
    pub formatting_instructions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDoc {
    pub table: String,
    pub purpose: String,
    pub columns: Vec<ColumnDoc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDoc {
    pub column: String,
    pub business_name: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
    #[serde(default)]
    pub sample_values: Vec<String>,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub from_table: String,
    pub from_column: String,
    pub to_table: String,
    pub to_column: String,
}

impl SemanticModel {
    pub fn to_json(&self) -> MartResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn table(&self, name: &str) -> Option<&TableDoc> {
        self.tables.iter().find(|t| t.table == name)
    }
}

fn col(
    column: &str,
    business_name: &str,
    synonyms: &[&str],
    sample_values: &[&str],
    description: &str,
) -> ColumnDoc {
    ColumnDoc {
        column: column.to_string(),
        business_name: business_name.to_string(),
        synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
        sample_values: sample_values.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
    }
}

fn table(name: &str, purpose: &str, columns: Vec<ColumnDoc>) -> TableDoc {
    TableDoc {
        table: name.to_string(),
        purpose: purpose.to_string(),
        columns,
    }
}

fn rel(name: &str, from: (&str, &str), to: (&str, &str)) -> Relationship {
    Relationship {
        name: name.to_string(),
        from_table: from.0.to_string(),
        from_column: from.1.to_string(),
        to_table: to.0.to_string(),
        to_column: to.1.to_string(),
    }
}

/// The static semantic description of the warehouse, mirroring the
/// physical schema in `schema::TABLES` plus the reporting views.
pub fn warehouse_semantic_model() -> SemanticModel {
    SemanticModel {
        name: "bankmart".to_string(),
        version: SEMANTIC_MODEL_VERSION.to_string(),
        description: "Retail banking analytics mart: customers, accounts, branches, \
                      transactions, credit cards, credit scores, service interactions, \
                      and loans, in a star schema with reporting views."
            .to_string(),
        tables: vec![
            table(
                "dim_geography",
                "City/state/region/country hierarchy for branch locations.",
                vec![
                    col("geography_key", "Geography Key", &[], &[], "Surrogate key."),
                    col(
                        "region",
                        "Region",
                        &["area", "territory"],
                        &["Northeast", "Southwest"],
                        "Sales region the city belongs to.",
                    ),
                    col("state", "State", &["province"], &["NY", "TX"], "State code."),
                ],
            ),
            table(
                "dim_branch",
                "Physical bank branches, including ATM-only locations.",
                vec![
                    col("branch_key", "Branch Key", &[], &[], "Surrogate key."),
                    col(
                        "branch_id",
                        "Branch Number",
                        &["branch code", "location id"],
                        &["BR-0041"],
                        "Business identifier, unique per branch.",
                    ),
                    col(
                        "branch_type",
                        "Branch Type",
                        &["location type"],
                        &["full_service", "limited_service", "atm"],
                        "Service level of the location.",
                    ),
                ],
            ),
            table(
                "dim_private_banker",
                "Private banking professionals with employment history tracking.",
                vec![
                    col("banker_id", "Banker ID", &["advisor id"], &[], "Business identifier."),
                    col(
                        "specialization",
                        "Specialization",
                        &["focus area"],
                        &["wealth_management", "estate_planning"],
                        "Area of expertise.",
                    ),
                    col(
                        "is_current",
                        "Current Record Flag",
                        &["active record"],
                        &["1", "0"],
                        "Marks the active version of this banker's record.",
                    ),
                ],
            ),
            table(
                "dim_customer",
                "Bank customers with demographic and contact attributes; \
                 versioned so history is preserved.",
                vec![
                    col(
                        "customer_id",
                        "Customer Number",
                        &["client id", "member id"],
                        &["CUST-100042"],
                        "Business identifier, unique among current rows.",
                    ),
                    col(
                        "customer_segment",
                        "Segment",
                        &["tier", "client category"],
                        &["retail", "premium", "private"],
                        "Commercial segment the customer belongs to.",
                    ),
                    col(
                        "banker_key",
                        "Assigned Private Banker",
                        &["advisor"],
                        &[],
                        "Optional reference to the customer's private banker.",
                    ),
                ],
            ),
            table(
                "dim_csr",
                "Customer-service representatives staffing the call center.",
                vec![
                    col("csr_id", "CSR ID", &["agent id", "rep id"], &[], "Business identifier."),
                    col(
                        "department",
                        "Department",
                        &["team"],
                        &["cards", "loans", "general"],
                        "Call-center department.",
                    ),
                ],
            ),
            table(
                "dim_account",
                "Customer bank accounts (current and savings).",
                vec![
                    col(
                        "account_id",
                        "Account Number",
                        &["acct no"],
                        &["ACC-778210"],
                        "Business identifier.",
                    ),
                    col(
                        "account_type",
                        "Account Type",
                        &["product type"],
                        &["current", "savings"],
                        "Kind of deposit account.",
                    ),
                ],
            ),
            table(
                "dim_product",
                "Catalog of loan, credit-card, and account products.",
                vec![
                    col("product_id", "Product Code", &["sku"], &["PRD-GOLD-CC"], "Business identifier."),
                    col(
                        "product_category",
                        "Product Category",
                        &["product line"],
                        &["loan", "credit_card", "account"],
                        "Product family.",
                    ),
                    col(
                        "min_credit_score",
                        "Minimum Credit Score",
                        &["eligibility score"],
                        &["680"],
                        "Lowest credit score eligible for the product.",
                    ),
                ],
            ),
            table(
                "dim_date",
                "Calendar with pre-computed calendar and fiscal attributes, one row per day.",
                vec![
                    col("date_key", "Date Key", &[], &["20230315"], "yyyymmdd surrogate key."),
                    col("fiscal_quarter", "Fiscal Quarter", &["FQ"], &["1", "4"], "Quarter of the fiscal year."),
                    col("is_weekend", "Weekend Flag", &[], &["1", "0"], "Saturday or Sunday."),
                ],
            ),
            table(
                "fact_transactions",
                "Monetary movements against accounts, one row per transaction, \
                 with the post-transaction balance and an anomaly indicator.",
                vec![
                    col(
                        "transaction_type",
                        "Transaction Type",
                        &["txn type"],
                        &["DEPOSIT", "WITHDRAWAL", "TRANSFER"],
                        "Kind of movement; matched case-insensitively in reporting.",
                    ),
                    col("amount", "Amount", &["value", "txn amount"], &["250.00"], "Transaction amount."),
                    col(
                        "balance_after",
                        "Balance After Transaction",
                        &["running balance"],
                        &[],
                        "Account balance immediately after this transaction.",
                    ),
                    col(
                        "is_anomalous",
                        "Anomaly Flag",
                        &["suspicious", "flagged"],
                        &["1", "0"],
                        "Set by upstream monitoring when the transaction looks unusual.",
                    ),
                ],
            ),
            table(
                "fact_credit_card",
                "Periodic balance/limit/rewards snapshots per customer and card product.",
                vec![
                    col("card_balance", "Card Balance", &["outstanding balance"], &[], "Balance at snapshot time."),
                    col(
                        "credit_limit",
                        "Credit Limit",
                        &["limit"],
                        &["5000"],
                        "Limit at snapshot time; utilization is undefined when 0.",
                    ),
                ],
            ),
            table(
                "fact_credit_scores",
                "Point-in-time credit scores and derived risk categories.",
                vec![
                    col("credit_score", "Credit Score", &["FICO"], &["712"], "Bureau score."),
                    col(
                        "risk_category",
                        "Risk Category",
                        &["risk band"],
                        &["low", "medium", "high"],
                        "Category derived from the score.",
                    ),
                ],
            ),
            table(
                "fact_csr_interactions",
                "One row per customer-service call with aggregated sentiment counts \
                 and a label from an external classification step.",
                vec![
                    col(
                        "sentiment_label",
                        "Sentiment",
                        &["call sentiment", "tone"],
                        &["positive", "neutral", "negative"],
                        "Overall label assigned by the external classifier.",
                    ),
                    col(
                        "sentiment_detail",
                        "Sentiment Detail",
                        &[],
                        &[],
                        "Opaque structured payload from the classifier; not interpreted here.",
                    ),
                ],
            ),
            table(
                "fact_loans",
                "One row per loan agreement with amount, rate, term, and decision outcome.",
                vec![
                    col("loan_amount", "Loan Amount", &["principal"], &["25000"], "Agreed principal."),
                    col(
                        "loan_status",
                        "Loan Status",
                        &["decision"],
                        &["approved", "rejected", "pending"],
                        "Outcome of the application.",
                    ),
                ],
            ),
        ],
        relationships: vec![
            rel("branch_geography", ("dim_branch", "geography_key"), ("dim_geography", "geography_key")),
            rel("banker_branch", ("dim_private_banker", "branch_key"), ("dim_branch", "branch_key")),
            rel("customer_banker", ("dim_customer", "banker_key"), ("dim_private_banker", "banker_key")),
            rel("account_customer", ("dim_account", "customer_key"), ("dim_customer", "customer_key")),
            rel("txn_account", ("fact_transactions", "account_key"), ("dim_account", "account_key")),
            rel("txn_customer", ("fact_transactions", "customer_key"), ("dim_customer", "customer_key")),
            rel("txn_branch", ("fact_transactions", "branch_key"), ("dim_branch", "branch_key")),
            rel("txn_date", ("fact_transactions", "transaction_date_key"), ("dim_date", "date_key")),
            rel("card_customer", ("fact_credit_card", "customer_key"), ("dim_customer", "customer_key")),
            rel("card_product", ("fact_credit_card", "product_key"), ("dim_product", "product_key")),
            rel("card_date", ("fact_credit_card", "snapshot_date_key"), ("dim_date", "date_key")),
            rel("score_customer", ("fact_credit_scores", "customer_key"), ("dim_customer", "customer_key")),
            rel("interaction_csr", ("fact_csr_interactions", "csr_key"), ("dim_csr", "csr_key")),
            rel("interaction_customer", ("fact_csr_interactions", "customer_key"), ("dim_customer", "customer_key")),
            rel("loan_customer", ("fact_loans", "customer_key"), ("dim_customer", "customer_key")),
            rel("loan_product", ("fact_loans", "product_key"), ("dim_product", "product_key")),
        ],
        formatting_instructions: vec![
            "Format currency amounts with two decimal places.".to_string(),
            "Percentages are already scaled 0-100; do not rescale.".to_string(),
            "Date keys are yyyymmdd integers; render them as ISO dates.".to_string(),
        ],
    }
}

// ── Config pass-through ────────────────────────────────────────

/// Acknowledgment returned when a configuration document is submitted
/// to an external service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigHandle {
    pub handle_id: String,
    pub kind: String,
    pub version: String,
}

/// Narrow interface for handing opaque configuration documents
/// (semantic model, agent specification) to an external service.
pub trait ConfigSink {
    fn submit(
        &self,
        kind: &str,
        version: &str,
        payload: &serde_json::Value,
    ) -> MartResult<ConfigHandle>;
}

/// Writes each submitted document to a directory and returns a fresh
/// handle. Stands in for the hosted service's config endpoint.
pub struct DirectoryConfigSink {
    dir: PathBuf,
}

impl DirectoryConfigSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl ConfigSink for DirectoryConfigSink {
    fn submit(
        &self,
        kind: &str,
        version: &str,
        payload: &serde_json::Value,
    ) -> MartResult<ConfigHandle> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!("{kind}-{version}.json"));
        std::fs::write(&path, serde_json::to_string_pretty(payload)?)?;
        let handle = ConfigHandle {
            handle_id: Uuid::new_v4().to_string(),
            kind: kind.to_string(),
            version: version.to_string(),
        };
        log::info!("submitted {kind} v{version} -> {}", path.display());
        Ok(handle)
    }
}
