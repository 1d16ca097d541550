//! SQLite persistence layer.
//!
//! RULE: Only the store talks to the database.
//! Loader, pipeline, integrity checks, and tests call store methods —
//! they never execute SQL directly.

mod views;

pub use views::{
    AccountBalanceRow, BranchPerformanceRow, CreditCardMetricsRow, CustomerTransactionSummaryRow,
    DailyAnomalyRow, MonthlyTrendRow, RegionalAnalysisRow,
};

use crate::{
    error::{MartError, MartResult},
    schema::{self, TableDef},
};
use rusqlite::{params, params_from_iter, types::Value, Connection};

/// Names of the reporting views, in definition order.
pub static VIEW_NAMES: &[&str] = &[
    "vw_account_balances",
    "vw_transaction_anomalies",
    "vw_branch_performance",
    "vw_regional_analysis",
    "vw_credit_card_metrics",
    "vw_customer_transaction_summary",
    "vw_monthly_transaction_trends",
];

pub struct WarehouseStore {
    conn: Connection,
    path: Option<String>, // None for :memory:, Some(path) for file
}

impl WarehouseStore {
    pub fn open(path: &str) -> MartResult<Self> {
        let conn = Connection::open_with_flags(
            path,
            rusqlite::OpenFlags::SQLITE_OPEN_READ_WRITE
                | rusqlite::OpenFlags::SQLITE_OPEN_CREATE
                | rusqlite::OpenFlags::SQLITE_OPEN_URI,
        )?;
        // WAL mode only for real files (:memory: ignores it). Readers on
        // sibling connections see each table replace atomically at commit.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        // Foreign keys stay off so replace-style loads are order-tolerant;
        // referential integrity is enforced by the post-load checker.
        conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
        Ok(Self {
            conn,
            path: Some(path.to_string()),
        })
    }

    /// Open an in-memory database (used in tests).
    pub fn in_memory() -> MartResult<Self> {
        let conn = Connection::open(":memory:")?;
        // Foreign keys stay off so replace-style loads are order-tolerant;
        // referential integrity is enforced by the post-load checker.
        conn.execute_batch("PRAGMA foreign_keys=OFF;")?;
        Ok(Self { conn, path: None })
    }

    /// Reopen a new connection to the same database.
    /// For in-memory databases this returns a new, isolated database.
    pub fn reopen(&self) -> MartResult<Self> {
        match &self.path {
            Some(p) => Self::open(p),
            None => Self::in_memory(),
        }
    }

    // ── Schema ─────────────────────────────────────────────────

    /// Create every registered table that does not exist yet, in
    /// dependency order. Existing tables (and their contents) are left
    /// alone; the loader handles replacement.
    pub fn create_tables(&self) -> MartResult<()> {
        for def in schema::TABLES {
            if !self.table_exists(def.name)? {
                self.conn.execute_batch(&def.create_sql(def.name))?;
            }
        }
        Ok(())
    }

    /// (Re)define all reporting views. Tables must already exist.
    pub fn define_views(&self) -> MartResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/views.sql"))?;
        Ok(())
    }

    /// Drop all reporting views. Called before table swaps so no view is
    /// left dangling while its base table is replaced.
    pub fn drop_views(&self) -> MartResult<()> {
        for view in VIEW_NAMES {
            self.conn
                .execute_batch(&format!("DROP VIEW IF EXISTS {view};"))?;
        }
        Ok(())
    }

    pub fn table_exists(&self, name: &str) -> MartResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![name],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ── Bulk replace ───────────────────────────────────────────

    /// Replace `def`'s table with the given rows in one transaction:
    /// build a shadow table, insert every row, then drop the old table
    /// and rename the shadow into place. Readers observe either the
    /// fully-old or fully-new table, never a partial rebuild.
    ///
    /// Rows whose insert fails are counted as skipped, not fatal.
    /// Returns `(rows_loaded, rows_skipped_at_insert)`.
    pub fn replace_table(
        &self,
        def: &TableDef,
        rows: &[Vec<Option<String>>],
    ) -> MartResult<(u64, u64)> {
        let shadow = def.shadow_name();
        self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        let result = self.rebuild_into_shadow(def, &shadow, rows);
        match result {
            Ok(counts) => {
                self.conn.execute_batch("COMMIT;")?;
                Ok(counts)
            }
            Err(e) => {
                let _ = self.conn.execute_batch("ROLLBACK;");
                Err(e)
            }
        }
    }

    fn rebuild_into_shadow(
        &self,
        def: &TableDef,
        shadow: &str,
        rows: &[Vec<Option<String>>],
    ) -> MartResult<(u64, u64)> {
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {shadow};"))?;
        self.conn.execute_batch(&def.create_sql(shadow))?;

        let mut loaded = 0u64;
        let mut skipped = 0u64;
        {
            let mut stmt = self.conn.prepare(&def.insert_sql(shadow))?;
            for row in rows {
                match stmt.execute(params_from_iter(row.iter())) {
                    Ok(_) => loaded += 1,
                    Err(e) => {
                        skipped += 1;
                        log::warn!("{}: dropping row ({e})", def.name);
                    }
                }
            }
        }

        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {};", def.name))?;
        self.conn
            .execute_batch(&format!("ALTER TABLE {shadow} RENAME TO {};", def.name))?;
        Ok((loaded, skipped))
    }

    // ── Row access ─────────────────────────────────────────────

    pub fn table_row_count(&self, name: &str) -> MartResult<i64> {
        let def = schema::table_def(name).ok_or_else(|| MartError::UnknownTable {
            name: name.to_string(),
        })?;
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", def.name),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    /// Dump a table's loadable columns in rowid order, values rendered as
    /// text. Used to compare table contents across reloads.
    pub fn dump_rows(&self, name: &str) -> MartResult<Vec<Vec<Option<String>>>> {
        let def = schema::table_def(name).ok_or_else(|| MartError::UnknownTable {
            name: name.to_string(),
        })?;
        let sql = format!(
            "SELECT {} FROM {} ORDER BY rowid",
            def.load_columns.join(", "),
            def.name
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let ncols = def.load_columns.len();
        let rows = stmt
            .query_map([], |row| {
                let mut values = Vec::with_capacity(ncols);
                for i in 0..ncols {
                    let rendered = match row.get::<_, Value>(i)? {
                        Value::Null => None,
                        Value::Integer(v) => Some(v.to_string()),
                        Value::Real(v) => Some(v.to_string()),
                        Value::Text(v) => Some(v),
                        Value::Blob(v) => Some(format!("{v:?}")),
                    };
                    values.push(rendered);
                }
                Ok(values)
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Load audit ─────────────────────────────────────────────

    #[allow(clippy::too_many_arguments)]
    pub fn insert_audit(
        &self,
        run_id: &str,
        table_name: &str,
        source_file: Option<&str>,
        rows_loaded: u64,
        rows_skipped: u64,
        status: &str,
        error: Option<&str>,
    ) -> MartResult<()> {
        self.conn.execute(
            "INSERT INTO load_audit (run_id, table_name, source_file, rows_loaded,
                                     rows_skipped, status, error)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                run_id,
                table_name,
                source_file,
                rows_loaded as i64,
                rows_skipped as i64,
                status,
                error,
            ],
        )?;
        Ok(())
    }

    pub fn audit_count(&self, run_id: &str) -> MartResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM load_audit WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    // ── Raw text exposure ──────────────────────────────────────
    //
    // The staging text columns are what an external search indexer
    // consumes. The warehouse only hands the text over.

    pub fn call_transcripts(&self) -> MartResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT log_id, transcript FROM stg_call_center_logs
             WHERE transcript IS NOT NULL ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn document_chunks(&self) -> MartResult<Vec<(String, String)>> {
        let mut stmt = self.conn.prepare(
            "SELECT document_name, chunk_text FROM stg_marketing_documents
             WHERE chunk_text IS NOT NULL ORDER BY rowid",
        )?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Integrity queries ──────────────────────────────────────
    //
    // Table and column names come from the static schema registry,
    // never from caller input.

    /// Count fact rows whose non-null `fact_col` has no match in the
    /// referenced dimension.
    pub fn orphan_count(
        &self,
        fact: &str,
        fact_col: &str,
        dim: &str,
        dim_key: &str,
    ) -> MartResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {fact} f
             LEFT JOIN {dim} d ON d.{dim_key} = f.{fact_col}
             WHERE f.{fact_col} IS NOT NULL AND d.{dim_key} IS NULL"
        );
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }

    /// Natural keys of an SCD dimension that carry more than one current
    /// row. A row is current when `is_current` is truthy or null.
    pub fn duplicated_current_keys(
        &self,
        dim: &str,
        natural_key: &str,
    ) -> MartResult<Vec<(String, i64)>> {
        let sql = format!(
            "SELECT {natural_key}, COUNT(*) FROM {dim}
             WHERE COALESCE(is_current, 1) = 1
             GROUP BY {natural_key}
             HAVING COUNT(*) > 1"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Count SCD rows whose validity interval is inverted.
    pub fn inverted_span_count(&self, dim: &str) -> MartResult<i64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {dim}
             WHERE effective_date IS NOT NULL
               AND expiry_date IS NOT NULL
               AND effective_date > expiry_date"
        );
        let count: i64 = self.conn.query_row(&sql, [], |row| row.get(0))?;
        Ok(count)
    }
}
