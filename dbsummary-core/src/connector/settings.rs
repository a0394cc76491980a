//! Database connection settings.
//!
//! Connection parameters stay as discrete fields all the way to the driver,
//! so no connection URL is ever assembled from user input.

use crate::Credentials;
use sqlx::postgres::PgConnectOptions;
use std::time::Duration;

/// Statement timeout applied to every session unless overridden.
pub const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Longest statement timeout accepted.
const MAX_STATEMENT_TIMEOUT: Duration = Duration::from_secs(300);

/// PostgreSQL identifier length limit (NAMEDATALEN - 1).
const MAX_IDENTIFIER_LEN: usize = 63;

/// Parameters for reaching one PostgreSQL server.
///
/// `database` names the control database; per-database sessions are derived
/// with [`ConnectionSettings::for_database`].
///
/// # Example
/// ```rust
/// use dbsummary_core::{ConnectionSettings, Credentials};
///
/// let settings = ConnectionSettings::new(
///     "localhost".to_string(),
///     5432,
///     "postgres".to_string(),
///     Credentials::new("admin".to_string(), "secret".to_string()),
/// );
///
/// assert!(settings.validate().is_ok());
/// assert_eq!(settings.to_string(), "localhost:5432/postgres");
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionSettings {
    /// Server host name or address
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database to connect to
    pub database: String,
    /// Login credentials
    pub credentials: Credentials,
    /// Per-statement timeout set on every session
    pub statement_timeout: Duration,
}

impl std::fmt::Display for ConnectionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
        // Intentionally omit username and never include credentials
    }
}

impl ConnectionSettings {
    /// Creates settings with the default statement timeout.
    pub const fn new(host: String, port: u16, database: String, credentials: Credentials) -> Self {
        Self {
            host,
            port,
            database,
            credentials,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    /// Builder method to set the statement timeout.
    #[must_use]
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Same server and credentials, different database.
    #[must_use]
    pub fn for_database(&self, database: &str) -> Self {
        Self {
            database: database.to_string(),
            ..self.clone()
        }
    }

    /// Validates connection parameters.
    ///
    /// # Errors
    /// Returns a configuration error if any parameter is empty or out of range
    pub fn validate(&self) -> crate::Result<()> {
        if self.host.trim().is_empty() {
            return Err(crate::error::DbSummaryError::configuration(
                "host cannot be empty",
            ));
        }

        if self.port == 0 {
            return Err(crate::error::DbSummaryError::configuration(
                "port must be greater than 0",
            ));
        }

        if self.credentials.username().is_empty() {
            return Err(crate::error::DbSummaryError::configuration(
                "user cannot be empty",
            ));
        }

        if self.database.is_empty() {
            return Err(crate::error::DbSummaryError::configuration(
                "database name cannot be empty",
            ));
        }

        if self.database.len() > MAX_IDENTIFIER_LEN {
            return Err(crate::error::DbSummaryError::configuration(
                "database name too long: maximum 63 characters",
            ));
        }

        if self.statement_timeout.is_zero() {
            return Err(crate::error::DbSummaryError::configuration(
                "statement timeout must be greater than 0",
            ));
        }

        if self.statement_timeout > MAX_STATEMENT_TIMEOUT {
            return Err(crate::error::DbSummaryError::configuration(
                "statement timeout should not exceed 300 seconds",
            ));
        }

        Ok(())
    }

    /// Driver options for these settings.
    ///
    /// Sessions are read-only, bounded by the statement timeout, and tagged
    /// with an application name for `pg_stat_activity`.
    pub(crate) fn connect_options(&self) -> PgConnectOptions {
        let app_name = format!("dbsummary-{}", env!("CARGO_PKG_VERSION"));
        let timeout_ms = self.statement_timeout.as_millis().to_string();

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(self.credentials.username())
            .password(self.credentials.password())
            .database(&self.database)
            .application_name(&app_name)
            .options([
                ("default_transaction_read_only", "on"),
                ("statement_timeout", timeout_ms.as_str()),
                ("lock_timeout", "30s"),
            ])
    }
}
