//! Bulk loader: replace-then-load ingestion of delimited source files.
//!
//! Column order of the source file is authoritative and must match the
//! table's load-column list. The first row is a header and is always
//! skipped. Rows with the wrong column count are skipped and logged,
//! never aborting the table. Each table load is independent: a missing
//! source fails that table only, and `load_all` carries on with the rest.

use crate::{
    config::LoadConfig,
    error::{MartError, MartResult},
    schema::{self, TableDef},
    store::WarehouseStore,
    types::RunId,
};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize)]
pub struct TableLoadReport {
    pub table: String,
    pub source: PathBuf,
    pub rows_loaded: u64,
    pub rows_skipped: u64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableOutcome {
    Loaded(TableLoadReport),
    Failed {
        table: String,
        source: PathBuf,
        error: String,
    },
}

impl TableOutcome {
    pub fn table(&self) -> &str {
        match self {
            TableOutcome::Loaded(report) => &report.table,
            TableOutcome::Failed { table, .. } => table,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, TableOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoadRunReport {
    pub run_id: RunId,
    pub tables: Vec<TableOutcome>,
}

impl LoadRunReport {
    pub fn failure_count(&self) -> usize {
        self.tables.iter().filter(|t| t.is_failed()).count()
    }

    pub fn total_rows_loaded(&self) -> u64 {
        self.tables
            .iter()
            .map(|t| match t {
                TableOutcome::Loaded(r) => r.rows_loaded,
                TableOutcome::Failed { .. } => 0,
            })
            .sum()
    }
}

pub struct BulkLoader<'a> {
    store: &'a WarehouseStore,
    data_dir: PathBuf,
    config: LoadConfig,
}

impl<'a> BulkLoader<'a> {
    pub fn new(store: &'a WarehouseStore, data_dir: impl Into<PathBuf>, config: LoadConfig) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
            config,
        }
    }

    /// Load one table from its configured source file.
    pub fn load_table(&self, table: &str) -> MartResult<TableLoadReport> {
        let def = schema::table_def(table).ok_or_else(|| MartError::UnknownTable {
            name: table.to_string(),
        })?;
        let path = self.source_path(def)?;
        self.load_file(def, &path)
    }

    /// Load every configured table, one independent step per table.
    /// dim_date is skipped here when its file is absent and a generated
    /// range is configured; the pipeline builds it instead.
    pub fn load_all(&self, run_id: &str) -> LoadRunReport {
        let mut tables = Vec::new();
        for def in schema::loadable_tables() {
            let path = match self.source_path(def) {
                Ok(p) => p,
                Err(e) => {
                    tables.push(TableOutcome::Failed {
                        table: def.name.to_string(),
                        source: self.data_dir.join(def.name),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            if def.name == "dim_date" && !path.is_file() && self.config.date_dimension.is_some() {
                log::debug!("dim_date: no source file, deferring to the date builder");
                continue;
            }

            match self.load_file(def, &path) {
                Ok(report) => tables.push(TableOutcome::Loaded(report)),
                Err(e) => {
                    log::error!("{}: load failed: {e}", def.name);
                    tables.push(TableOutcome::Failed {
                        table: def.name.to_string(),
                        source: path,
                        error: e.to_string(),
                    });
                }
            }
        }
        LoadRunReport {
            run_id: run_id.to_string(),
            tables,
        }
    }

    /// Ingest `path` into `def`'s table with replace semantics.
    ///
    /// Reporting views are dropped before the swap; callers redefine them
    /// once all loads have finished (see the pipeline).
    pub fn load_file(&self, def: &TableDef, path: &Path) -> MartResult<TableLoadReport> {
        if !path.is_file() {
            return Err(MartError::SourceUnavailable {
                table: def.name.to_string(),
                path: path.to_path_buf(),
            });
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let expected = def.load_columns.len();
        let mut rows: Vec<Vec<Option<String>>> = Vec::new();
        let mut skipped = 0u64;

        for (idx, record) in reader.records().enumerate() {
            // Line number in the file: header is line 1.
            let line = idx + 2;
            let record = match record {
                Ok(r) => r,
                Err(e) => {
                    skipped += 1;
                    log::warn!("{}: line {line} unreadable ({e}) — skipped", def.name);
                    continue;
                }
            };
            if record.len() != expected {
                skipped += 1;
                log::warn!(
                    "{}: line {line} has {} columns, expected {expected} — skipped",
                    def.name,
                    record.len()
                );
                continue;
            }
            rows.push(
                record
                    .iter()
                    .map(|field| {
                        if field.is_empty() {
                            None
                        } else {
                            Some(field.to_string())
                        }
                    })
                    .collect(),
            );
        }

        self.store.drop_views()?;
        let (loaded, insert_skipped) = self.store.replace_table(def, &rows)?;
        let report = TableLoadReport {
            table: def.name.to_string(),
            source: path.to_path_buf(),
            rows_loaded: loaded,
            rows_skipped: skipped + insert_skipped,
        };
        log::info!(
            "{}: loaded {} rows ({} skipped) from {}",
            report.table,
            report.rows_loaded,
            report.rows_skipped,
            path.display()
        );
        Ok(report)
    }

    fn source_path(&self, def: &TableDef) -> MartResult<PathBuf> {
        let file = self
            .config
            .source_for(def.name)
            .ok_or_else(|| MartError::SourceUnavailable {
                table: def.name.to_string(),
                path: self.data_dir.join(def.name),
            })?;
        Ok(self.data_dir.join(file))
    }
}
