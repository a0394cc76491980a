//! Helper utilities shared by the connector and the inspector.
//!
//! Provides consistent decoding of catalog rows and classification of driver
//! errors into the skip/abort taxonomy.

use crate::{Result, error::DbSummaryError};
use sqlx::{Row, postgres::PgRow};

/// SQLSTATE raised when the role lacks a privilege on a catalog object.
pub(crate) const INSUFFICIENT_PRIVILEGE: &str = "42501";

/// Extension trait for extracting typed values from catalog rows
/// with consistent error handling.
///
/// # Example
/// ```rust,ignore
/// let name: String = row.get_field("routine_name", "app", "information_schema.routines")?;
/// ```
pub(crate) trait RowExt {
    /// Extracts a typed field from the row, naming the database and
    /// catalog resource in the error.
    fn get_field<'r, T>(&'r self, field_name: &str, database: &str, resource: &str) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>;
}

impl RowExt for PgRow {
    fn get_field<'r, T>(&'r self, field_name: &str, database: &str, resource: &str) -> Result<T>
    where
        T: sqlx::Decode<'r, sqlx::Postgres> + sqlx::Type<sqlx::Postgres>,
    {
        self.try_get(field_name).map_err(|e| {
            DbSummaryError::query_failed(
                database,
                format!("Failed to parse field '{}' from {}", field_name, resource),
                e,
            )
        })
    }
}

/// Whether a driver error is the server refusing access to an object.
pub(crate) fn is_insufficient_privilege(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Database(db_err) if db_err.code().as_deref() == Some(INSUFFICIENT_PRIVILEGE)
    )
}

/// Extension trait mapping driver results onto the error taxonomy.
pub(crate) trait QueryResultExt<T> {
    /// Maps a privilege refusal to `InsufficientPrivilege` and anything
    /// else to `Query`, naming the catalog resource that was read.
    fn for_resource(self, database: &str, resource: &str) -> Result<T>;
}

impl<T> QueryResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn for_resource(self, database: &str, resource: &str) -> Result<T> {
        self.map_err(|e| {
            if is_insufficient_privilege(&e) {
                DbSummaryError::insufficient_privilege(database, resource)
            } else {
                DbSummaryError::query_failed(database, format!("Failed to query {}", resource), e)
            }
        })
    }
}

/// Converts a non-negative catalog count to `u64`.
///
/// Counts and sizes from the catalog are never negative; a negative value is
/// clamped to zero rather than wrapped.
pub(crate) fn non_negative(value: i64) -> u64 {
    u64::try_from(value).unwrap_or_default()
}
