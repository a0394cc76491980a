//! Scoped database connections and database enumeration.
//!
//! # Module Structure
//! - `settings`: validated connection parameters
//! - `postgres`: the PostgreSQL connector used by the binary
//! - `helpers`: row decoding and SQLSTATE classification shared with the inspector
//!
//! The [`Connector`] trait is the seam between the survey loop and the
//! server. Every session it hands out must be given back through
//! [`Connector::release`], which the survey does on every exit path.

pub(crate) mod helpers;
mod postgres;
mod settings;

use crate::{Result, inspector::MetadataSource};
use async_trait::async_trait;

pub use postgres::{PgConnector, PgSession};
pub use settings::{ConnectionSettings, DEFAULT_STATEMENT_TIMEOUT};

/// Opens, enumerates and releases database sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Session type, inspectable through [`MetadataSource`].
    type Session: MetadataSource + Send;

    /// Name of the database the control connection goes to.
    fn control_database(&self) -> &str;

    /// Opens an exclusively owned session on `database`.
    ///
    /// # Errors
    /// Returns `DbSummaryError::Connection` on network or authentication failure.
    async fn connect(&self, database: &str) -> Result<Self::Session>;

    /// Lists every non-template database visible through `session`, in server order.
    ///
    /// # Errors
    /// Returns an error if `pg_database` cannot be queried.
    async fn list_databases(&self, session: &mut Self::Session) -> Result<Vec<String>>;

    /// Closes a session. Failures to close are logged, never returned.
    async fn release(&self, session: Self::Session);
}
