//! Provisioning pipeline.
//!
//! One run, strictly sequential: create tables, load every configured
//! source (each table an independent step), fill the date dimension,
//! redefine the reporting views, write the audit trail, then sweep for
//! integrity violations. Failures in one table never abort its siblings;
//! the report carries every outcome back to the operator.

use crate::{
    config::LoadConfig,
    dates::DateDimensionBuilder,
    error::MartResult,
    integrity::{IntegrityChecker, IntegrityViolation},
    loader::{BulkLoader, LoadRunReport, TableOutcome},
    store::WarehouseStore,
    types::RunId,
};
use serde::Serialize;
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct ProvisionReport {
    pub run_id: RunId,
    pub load: LoadRunReport,
    pub date_rows_generated: Option<u64>,
    pub violations: Vec<IntegrityViolation>,
}

pub struct Provisioner<'a> {
    store: &'a WarehouseStore,
    data_dir: PathBuf,
    config: LoadConfig,
}

impl<'a> Provisioner<'a> {
    pub fn new(
        store: &'a WarehouseStore,
        data_dir: impl Into<PathBuf>,
        config: LoadConfig,
    ) -> Self {
        Self {
            store,
            data_dir: data_dir.into(),
            config,
        }
    }

    pub fn run(&self) -> MartResult<ProvisionReport> {
        let run_id: RunId = Uuid::new_v4().to_string();
        log::info!("provisioning run {run_id} from {}", self.data_dir.display());

        self.store.create_tables()?;
        self.store.drop_views()?;

        let loader = BulkLoader::new(self.store, &self.data_dir, self.config.clone());
        let load = loader.load_all(&run_id);

        let mut date_rows_generated = None;
        if let Some(range) = &self.config.date_dimension {
            let loaded_from_file = load
                .tables
                .iter()
                .any(|t| t.table() == "dim_date" && !t.is_failed());
            if !loaded_from_file {
                let rows = DateDimensionBuilder::new(range.start_date, range.end_date)
                    .fiscal_start(range.fiscal_year_start_month)
                    .populate(self.store)?;
                date_rows_generated = Some(rows);
            }
        }

        // Views come back only after every table exists in final form.
        self.store.define_views()?;

        for outcome in &load.tables {
            match outcome {
                TableOutcome::Loaded(r) => self.store.insert_audit(
                    &run_id,
                    &r.table,
                    r.source.to_str(),
                    r.rows_loaded,
                    r.rows_skipped,
                    "loaded",
                    None,
                )?,
                TableOutcome::Failed {
                    table,
                    source,
                    error,
                } => self.store.insert_audit(
                    &run_id,
                    table,
                    source.to_str(),
                    0,
                    0,
                    "failed",
                    Some(error),
                )?,
            }
        }
        if let Some(rows) = date_rows_generated {
            self.store
                .insert_audit(&run_id, "dim_date", None, rows, 0, "loaded", None)?;
        }

        let violations =
            IntegrityChecker::new(self.store).enforce(self.config.strict_referential)?;

        Ok(ProvisionReport {
            run_id,
            load,
            date_rows_generated,
            violations,
        })
    }
}
