//! Per-database catalog inspection.
//!
//! [`inspect`] runs a fixed sequence of metadata lookups over one open
//! session and assembles a [`DatabaseRecord`]. The record is only built once
//! every lookup has succeeded.
//!
//! # Failure policy
//! - Insufficient privilege at any step: warning logged, `Ok(None)` returned
//! - Any other error: returned to the caller unchanged
//! - No retries

mod postgres;

use crate::{
    Result,
    error::DbSummaryError,
    models::{DatabaseRecord, Extension, Routine, SchemaInventory},
};
use async_trait::async_trait;

/// The catalog lookups one inspection needs, in the order they are issued.
#[async_trait]
pub trait MetadataSource: Send {
    /// Total on-disk size of `database` in bytes.
    async fn database_size(&mut self, database: &str) -> Result<u64>;

    /// Number of tables in the `public` schema.
    async fn public_table_count(&mut self) -> Result<u64>;

    /// Sum of live-tuple estimates over user tables; `None` when the
    /// statistics view has nothing to sum.
    async fn live_row_estimate(&mut self) -> Result<Option<u64>>;

    /// Schema names, excluding `pg_*` and `information_schema`.
    async fn user_schemas(&mut self) -> Result<Vec<String>>;

    /// Table names in `schema`.
    async fn tables_in_schema(&mut self, schema: &str) -> Result<Vec<String>>;

    /// Routines in `schema`.
    async fn routines_in_schema(&mut self, schema: &str) -> Result<Vec<Routine>>;

    /// Server version string.
    async fn server_version(&mut self) -> Result<String>;

    /// Installed extensions.
    async fn extensions(&mut self) -> Result<Vec<Extension>>;
}

/// Inspects one database.
///
/// # Returns
/// `Ok(Some(record))` when every lookup succeeded, `Ok(None)` when the
/// server refused catalog access for this database.
///
/// # Errors
/// Any error other than insufficient privilege is returned as-is.
///
/// # Example
/// ```rust,ignore
/// let mut session = connector.connect("inventory").await?;
/// let record = inspect(&mut session, "inventory").await;
/// connector.release(session).await;
/// ```
pub async fn inspect<S>(source: &mut S, name: &str) -> Result<Option<DatabaseRecord>>
where
    S: MetadataSource + ?Sized,
{
    match collect_record(source, name).await {
        Ok(record) => Ok(Some(record)),
        Err(DbSummaryError::InsufficientPrivilege { resource, .. }) => {
            tracing::warn!(
                "Insufficient privileges for database: {} (cannot access {})",
                name,
                resource
            );
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

async fn collect_record<S>(source: &mut S, name: &str) -> Result<DatabaseRecord>
where
    S: MetadataSource + ?Sized,
{
    let size_bytes = source.database_size(name).await?;
    tracing::info!("Retrieved size for database: {}", name);

    let table_count = source.public_table_count().await?;
    tracing::info!("Retrieved table count for database: {}", name);

    let row_count = source.live_row_estimate().await?;
    tracing::info!("Retrieved row count for database: {}", name);

    let schema_names = source.user_schemas().await?;
    tracing::info!("Retrieved schemas for database: {}", name);

    let mut schemas: Vec<SchemaInventory> =
        schema_names.into_iter().map(SchemaInventory::new).collect();

    for schema in &mut schemas {
        schema.tables = source.tables_in_schema(&schema.name).await?;
    }
    tracing::info!("Retrieved tables for database: {}", name);

    for schema in &mut schemas {
        schema.routines = source.routines_in_schema(&schema.name).await?;
    }
    tracing::info!("Retrieved routines for database: {}", name);

    let server_version = source.server_version().await?;
    tracing::info!("Retrieved PostgreSQL version for database: {}", name);

    let extensions = source.extensions().await?;
    tracing::info!("Retrieved extensions for database: {}", name);

    Ok(DatabaseRecord {
        name: name.to_string(),
        size_bytes,
        table_count,
        row_count,
        schemas,
        server_version,
        extensions,
    })
}
