//! Core library for dbsummary.
//!
//! Connects to a PostgreSQL server, inspects every non-template database
//! through a fixed set of read-only catalog queries, and renders the results
//! as a plain-text report.
//!
//! # Pipeline
//! - [`connector`]: opens scoped connections and enumerates databases
//! - [`inspector`]: turns one connection into one [`DatabaseRecord`]
//! - [`report`]: sorts records, renders text tables, writes the report file
//! - [`survey`]: drives the three stages and applies the skip policy
//!
//! # Security Guarantees
//! - All database operations are read-only
//! - Passwords live in zeroizing containers and never reach logs or errors
//! - Catalog lookups bind schema and database names as parameters

pub mod connector;
pub mod credentials;
pub mod error;
pub mod inspector;
pub mod logging;
pub mod models;
pub mod report;
pub mod survey;

#[cfg(test)]
pub(crate) mod testing;

// Re-export commonly used types
pub use connector::{ConnectionSettings, Connector, PgConnector, PgSession};
pub use credentials::Credentials;
pub use error::{DbSummaryError, Result};
pub use inspector::{MetadataSource, inspect};
pub use logging::init_logging;
pub use models::{DatabaseRecord, Extension, Routine, RoutineKind, SchemaInventory};
pub use report::{SortKey, render};
pub use survey::{SkipReason, SkippedDatabase, SurveyOptions, SurveyOutcome, run_survey};
