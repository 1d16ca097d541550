//! BankMart — a star-schema warehouse loader and reporting layer for a
//! retail banking analytics mart.
//!
//! External delimited exports land in staging, dimension, and fact
//! tables through replace-then-load bulk ingestion; six reporting views
//! are recomputed on read. Search indexing, natural-language query
//! translation, agent orchestration, and email transport are external
//! collaborators reached through the narrow boundaries in [`semantic`]
//! and [`notify`].

pub mod config;
pub mod dates;
pub mod error;
pub mod integrity;
pub mod loader;
pub mod notify;
pub mod pipeline;
pub mod schema;
pub mod semantic;
pub mod store;
pub mod types;
