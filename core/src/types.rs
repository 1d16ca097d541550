//! Shared primitive types used across the whole warehouse.

/// A date-dimension key in `yyyymmdd` form (e.g. `20230315`).
pub type DateKey = i64;

/// A system-generated surrogate key, stable across reloads of the same data.
pub type SurrogateKey = i64;

/// The canonical identifier for one provisioning/load run.
pub type RunId = String;
