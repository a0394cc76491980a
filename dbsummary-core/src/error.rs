//! Error types for the inspection pipeline.
//!
//! No variant carries a password or a full connection string. Database
//! names, host names and catalog resource names are the only identifying
//! details that reach error messages.

use std::path::PathBuf;
use thiserror::Error;

/// Boxed source error shared by the variants that wrap driver failures.
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync>;

/// Main error type for dbsummary operations.
#[derive(Debug, Error)]
pub enum DbSummaryError {
    /// The control database could not be reached or enumerated. Fatal.
    #[error("Error connecting to the main database '{database}': {source}")]
    ControlConnection {
        database: String,
        #[source]
        source: BoxedSource,
    },

    /// A target database could not be opened. The database is skipped.
    #[error("Error connecting to database {database}: {source}")]
    Connection {
        database: String,
        #[source]
        source: BoxedSource,
    },

    /// Authenticated, but the catalog refused access. The database is skipped.
    #[error("Insufficient privileges for database {database}: cannot access {resource}")]
    InsufficientPrivilege { database: String, resource: String },

    /// Any other catalog query failure. The database is skipped.
    #[error("Query failed for database {database}: {context}: {source}")]
    Query {
        database: String,
        context: String,
        #[source]
        source: BoxedSource,
    },

    /// The report destination could not be written. Fatal.
    #[error("Failed to write report to {}", .path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Other I/O failure, such as reading the written report back.
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid settings or logging setup. Fatal.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Convenience type alias for Results with `DbSummaryError`
pub type Result<T> = std::result::Result<T, DbSummaryError>;

impl DbSummaryError {
    /// Creates a per-database connection error
    pub fn connection_failed<E>(database: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            database: database.into(),
            source: Box::new(error),
        }
    }

    /// Promotes any error raised while talking to the control database
    /// into the fatal `ControlConnection` variant.
    pub fn control_connection(database: impl Into<String>, error: Self) -> Self {
        let source: BoxedSource = match error {
            Self::Connection { source, .. } => source,
            other => Box::new(other),
        };
        Self::ControlConnection {
            database: database.into(),
            source,
        }
    }

    /// Creates an insufficient privileges error
    pub fn insufficient_privilege(
        database: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self::InsufficientPrivilege {
            database: database.into(),
            resource: resource.into(),
        }
    }

    /// Creates a query error with context
    pub fn query_failed<E>(
        database: impl Into<String>,
        context: impl Into<String>,
        error: E,
    ) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Query {
            database: database.into(),
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error should end the run rather than skip one database.
    pub const fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ControlConnection { .. }
                | Self::OutputWrite { .. }
                | Self::Io { .. }
                | Self::Configuration { .. }
        )
    }
}
