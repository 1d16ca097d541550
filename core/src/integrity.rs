//! Post-load integrity checker.
//!
//! Referential integrity is not enforced while loading (loads are
//! order-tolerant by design), so every load cycle ends with an explicit
//! sweep: fact keys must resolve to dimension rows, and SCD dimensions
//! must keep one current row per natural key with sane validity spans.

use crate::{
    error::{MartError, MartResult},
    schema,
    store::WarehouseStore,
};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IntegrityViolation {
    OrphanReference {
        fact: String,
        column: String,
        dimension: String,
        orphans: i64,
    },
    DuplicateCurrentRow {
        dimension: String,
        natural_key: String,
        value: String,
        rows: i64,
    },
    InvertedValiditySpan {
        dimension: String,
        rows: i64,
    },
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrityViolation::OrphanReference {
                fact,
                column,
                dimension,
                orphans,
            } => write!(
                f,
                "{fact}.{column}: {orphans} row(s) with no match in {dimension}"
            ),
            IntegrityViolation::DuplicateCurrentRow {
                dimension,
                natural_key,
                value,
                rows,
            } => write!(
                f,
                "{dimension}: natural key {natural_key}={value} has {rows} current rows"
            ),
            IntegrityViolation::InvertedValiditySpan { dimension, rows } => {
                write!(f, "{dimension}: {rows} row(s) with effective_date > expiry_date")
            }
        }
    }
}

pub struct IntegrityChecker<'a> {
    store: &'a WarehouseStore,
}

impl<'a> IntegrityChecker<'a> {
    pub fn new(store: &'a WarehouseStore) -> Self {
        Self { store }
    }

    /// Run every check and collect the violations.
    pub fn check_all(&self) -> MartResult<Vec<IntegrityViolation>> {
        let mut violations = Vec::new();

        for (fact, fact_col, dim, dim_key) in schema::FACT_REFERENCES {
            let orphans = self.store.orphan_count(fact, fact_col, dim, dim_key)?;
            if orphans > 0 {
                violations.push(IntegrityViolation::OrphanReference {
                    fact: fact.to_string(),
                    column: fact_col.to_string(),
                    dimension: dim.to_string(),
                    orphans,
                });
            }
        }

        for (dim, natural_key) in schema::SCD_DIMENSIONS {
            for (value, rows) in self.store.duplicated_current_keys(dim, natural_key)? {
                violations.push(IntegrityViolation::DuplicateCurrentRow {
                    dimension: dim.to_string(),
                    natural_key: natural_key.to_string(),
                    value,
                    rows,
                });
            }
            let inverted = self.store.inverted_span_count(dim)?;
            if inverted > 0 {
                violations.push(IntegrityViolation::InvertedValiditySpan {
                    dimension: dim.to_string(),
                    rows: inverted,
                });
            }
        }

        Ok(violations)
    }

    /// Check and apply the configured policy: in strict mode any
    /// violation is an error, otherwise violations are logged.
    pub fn enforce(&self, strict: bool) -> MartResult<Vec<IntegrityViolation>> {
        let violations = self.check_all()?;
        for v in &violations {
            log::warn!("integrity: {v}");
        }
        if strict && !violations.is_empty() {
            return Err(MartError::IntegrityCheckFailed {
                violations: violations.len(),
            });
        }
        Ok(violations)
    }
}
