//! Typed readers over the reporting views.
//!
//! Each reader returns one struct per view row. The views themselves are
//! defined in migrations/views.sql and recomputed by SQLite on read;
//! nothing here caches or writes back.

use super::WarehouseStore;
use crate::error::MartResult;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceRow {
    pub account_category: String,
    pub account_ref: Option<String>,
    pub customer_id: Option<String>,
    pub current_balance: Option<f64>,
    pub as_of_date_key: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DailyAnomalyRow {
    pub activity_date: Option<String>,
    pub total_transactions: i64,
    pub anomalous_transactions: i64,
    pub anomaly_pct: Option<f64>,
    pub avg_anomalous_amount: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BranchPerformanceRow {
    pub branch_id: String,
    pub branch_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub transaction_count: i64,
    pub total_amount: Option<f64>,
    pub avg_amount: Option<f64>,
    pub distinct_customers: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegionalAnalysisRow {
    pub region: Option<String>,
    pub state: Option<String>,
    pub transaction_count: i64,
    pub total_amount: Option<f64>,
    pub avg_amount: Option<f64>,
    pub distinct_customers: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CreditCardMetricsRow {
    pub customer_id: Option<String>,
    pub product_id: Option<String>,
    pub snapshot_date_key: Option<i64>,
    pub card_balance: Option<f64>,
    pub credit_limit: Option<f64>,
    pub rewards_points: Option<i64>,
    pub credit_utilization_ratio: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CustomerTransactionSummaryRow {
    pub customer_id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub total_transactions: i64,
    pub total_amount: Option<f64>,
    pub avg_transaction_amount: Option<f64>,
    pub last_transaction_date_key: Option<i64>,
    pub total_deposits: f64,
    pub total_withdrawals: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MonthlyTrendRow {
    pub calendar_year: i64,
    pub calendar_month: i64,
    pub transaction_count: i64,
    pub total_amount: Option<f64>,
    pub avg_amount: Option<f64>,
    pub distinct_customers: i64,
}

impl WarehouseStore {
    pub fn account_balances(&self) -> MartResult<Vec<AccountBalanceRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT account_category, account_ref, customer_id,
                    current_balance, as_of_date_key
             FROM vw_account_balances",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(AccountBalanceRow {
                    account_category: row.get(0)?,
                    account_ref: row.get(1)?,
                    customer_id: row.get(2)?,
                    current_balance: row.get(3)?,
                    as_of_date_key: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn daily_anomaly_stats(&self) -> MartResult<Vec<DailyAnomalyRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT activity_date, total_transactions, anomalous_transactions,
                    anomaly_pct, avg_anomalous_amount
             FROM vw_transaction_anomalies",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(DailyAnomalyRow {
                    activity_date: row.get(0)?,
                    total_transactions: row.get(1)?,
                    anomalous_transactions: row.get(2)?,
                    anomaly_pct: row.get(3)?,
                    avg_anomalous_amount: row.get(4)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn branch_performance(&self) -> MartResult<Vec<BranchPerformanceRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT branch_id, branch_name, city, state, transaction_count,
                    total_amount, avg_amount, distinct_customers
             FROM vw_branch_performance",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(BranchPerformanceRow {
                    branch_id: row.get(0)?,
                    branch_name: row.get(1)?,
                    city: row.get(2)?,
                    state: row.get(3)?,
                    transaction_count: row.get(4)?,
                    total_amount: row.get(5)?,
                    avg_amount: row.get(6)?,
                    distinct_customers: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn regional_analysis(&self) -> MartResult<Vec<RegionalAnalysisRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT region, state, transaction_count, total_amount,
                    avg_amount, distinct_customers
             FROM vw_regional_analysis",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(RegionalAnalysisRow {
                    region: row.get(0)?,
                    state: row.get(1)?,
                    transaction_count: row.get(2)?,
                    total_amount: row.get(3)?,
                    avg_amount: row.get(4)?,
                    distinct_customers: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn credit_card_metrics(&self) -> MartResult<Vec<CreditCardMetricsRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, product_id, snapshot_date_key, card_balance,
                    credit_limit, rewards_points, credit_utilization_ratio
             FROM vw_credit_card_metrics",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CreditCardMetricsRow {
                    customer_id: row.get(0)?,
                    product_id: row.get(1)?,
                    snapshot_date_key: row.get(2)?,
                    card_balance: row.get(3)?,
                    credit_limit: row.get(4)?,
                    rewards_points: row.get(5)?,
                    credit_utilization_ratio: row.get(6)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn customer_transaction_summary(
        &self,
    ) -> MartResult<Vec<CustomerTransactionSummaryRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT customer_id, first_name, last_name, total_transactions,
                    total_amount, avg_transaction_amount,
                    last_transaction_date_key, total_deposits, total_withdrawals
             FROM vw_customer_transaction_summary",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(CustomerTransactionSummaryRow {
                    customer_id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    total_transactions: row.get(3)?,
                    total_amount: row.get(4)?,
                    avg_transaction_amount: row.get(5)?,
                    last_transaction_date_key: row.get(6)?,
                    total_deposits: row.get(7)?,
                    total_withdrawals: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn monthly_trends(&self) -> MartResult<Vec<MonthlyTrendRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT calendar_year, calendar_month, transaction_count,
                    total_amount, avg_amount, distinct_customers
             FROM vw_monthly_transaction_trends",
        )?;
        let rows = stmt
            .query_map([], |row| {
                Ok(MonthlyTrendRow {
                    calendar_year: row.get(0)?,
                    calendar_month: row.get(1)?,
                    transaction_count: row.get(2)?,
                    total_amount: row.get(3)?,
                    avg_amount: row.get(4)?,
                    distinct_customers: row.get(5)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
