//! PostgreSQL connector.
//!
//! Each session is a single `PgConnection`, not a pool: the survey inspects
//! one database at a time and releases the connection before opening the
//! next one.
//!
//! # Security
//! - Sessions run with `default_transaction_read_only = on`
//! - Only the host, port and database name reach the logs

use super::ConnectionSettings;
use super::helpers::{QueryResultExt, RowExt};
use crate::Result;
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};

/// Lists non-template databases in the order the server returns them.
const LIST_DATABASES_QUERY: &str =
    "SELECT datname::text AS datname FROM pg_database WHERE NOT datistemplate";

/// Opens PostgreSQL sessions from one set of settings.
#[derive(Debug, Clone)]
pub struct PgConnector {
    settings: ConnectionSettings,
}

impl PgConnector {
    /// Creates a connector after validating the settings.
    ///
    /// # Errors
    /// Returns a configuration error if the settings are invalid
    pub fn new(settings: ConnectionSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self { settings })
    }

    /// Settings this connector was built from.
    pub const fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }
}

/// One open connection to one database.
pub struct PgSession {
    pub(crate) database: String,
    pub(crate) conn: PgConnection,
}

impl std::fmt::Debug for PgSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgSession")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl super::Connector for PgConnector {
    type Session = PgSession;

    fn control_database(&self) -> &str {
        &self.settings.database
    }

    async fn connect(&self, database: &str) -> Result<PgSession> {
        let target = self.settings.for_database(database);
        tracing::debug!("Opening connection to {}", target);

        let conn = PgConnection::connect_with(&target.connect_options())
            .await
            .map_err(|e| crate::error::DbSummaryError::connection_failed(database, e))?;

        tracing::debug!("Connected to {}", target);
        Ok(PgSession {
            database: database.to_string(),
            conn,
        })
    }

    async fn list_databases(&self, session: &mut PgSession) -> Result<Vec<String>> {
        let rows = sqlx::query(LIST_DATABASES_QUERY)
            .fetch_all(&mut session.conn)
            .await
            .for_resource(&session.database, "pg_database")?;

        let mut databases = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.get_field("datname", &session.database, "pg_database")?;
            databases.push(name);
        }

        tracing::info!("Found {} non-template databases", databases.len());
        Ok(databases)
    }

    async fn release(&self, session: PgSession) {
        let PgSession { database, conn } = session;
        match conn.close().await {
            Ok(()) => tracing::debug!("Closed connection to database {}", database),
            Err(e) => tracing::debug!(
                "Connection to database {} did not close cleanly: {}",
                database,
                e
            ),
        }
    }
}
