//! Catalog lookups over a live PostgreSQL session.
//!
//! Identifiers are always bound as parameters. Catalog columns of type
//! `name` or `sql_identifier` are cast to `text` so they decode as `String`.

use crate::{
    Result,
    connector::{
        PgSession,
        helpers::{QueryResultExt, RowExt, non_negative},
    },
    inspector::MetadataSource,
    models::{Extension, Routine, RoutineKind},
};
use async_trait::async_trait;

const DATABASE_SIZE_QUERY: &str = "SELECT pg_database_size($1::name)";

const PUBLIC_TABLE_COUNT_QUERY: &str = r#"
    SELECT count(*)
    FROM information_schema.tables
    WHERE table_schema = 'public'
"#;

const LIVE_ROW_ESTIMATE_QUERY: &str = r#"
    SELECT sum(n_live_tup)::bigint
    FROM pg_stat_user_tables
"#;

const USER_SCHEMAS_QUERY: &str = r#"
    SELECT schema_name::text
    FROM information_schema.schemata
    WHERE schema_name NOT LIKE 'pg_%' AND schema_name <> 'information_schema'
"#;

const TABLES_IN_SCHEMA_QUERY: &str = r#"
    SELECT table_name::text
    FROM information_schema.tables
    WHERE table_schema = $1
"#;

const ROUTINES_IN_SCHEMA_QUERY: &str = r#"
    SELECT routine_name::text AS routine_name, routine_type::text AS routine_type
    FROM information_schema.routines
    WHERE specific_schema = $1
"#;

const SERVER_VERSION_QUERY: &str = "SELECT version()";

const EXTENSIONS_QUERY: &str = r#"
    SELECT extname::text AS extname, extversion
    FROM pg_extension
"#;

#[async_trait]
impl MetadataSource for PgSession {
    async fn database_size(&mut self, database: &str) -> Result<u64> {
        let size: i64 = sqlx::query_scalar(DATABASE_SIZE_QUERY)
            .bind(database)
            .fetch_one(&mut self.conn)
            .await
            .for_resource(&self.database, "pg_database_size()")?;
        Ok(non_negative(size))
    }

    async fn public_table_count(&mut self) -> Result<u64> {
        let count: i64 = sqlx::query_scalar(PUBLIC_TABLE_COUNT_QUERY)
            .fetch_one(&mut self.conn)
            .await
            .for_resource(&self.database, "information_schema.tables")?;
        Ok(non_negative(count))
    }

    async fn live_row_estimate(&mut self) -> Result<Option<u64>> {
        let estimate: Option<i64> = sqlx::query_scalar(LIVE_ROW_ESTIMATE_QUERY)
            .fetch_one(&mut self.conn)
            .await
            .for_resource(&self.database, "pg_stat_user_tables")?;
        Ok(estimate.map(non_negative))
    }

    async fn user_schemas(&mut self) -> Result<Vec<String>> {
        let schemas: Vec<String> = sqlx::query_scalar(USER_SCHEMAS_QUERY)
            .fetch_all(&mut self.conn)
            .await
            .for_resource(&self.database, "information_schema.schemata")?;
        Ok(schemas)
    }

    async fn tables_in_schema(&mut self, schema: &str) -> Result<Vec<String>> {
        let tables: Vec<String> = sqlx::query_scalar(TABLES_IN_SCHEMA_QUERY)
            .bind(schema)
            .fetch_all(&mut self.conn)
            .await
            .for_resource(&self.database, "information_schema.tables")?;
        tracing::debug!("Schema '{}' holds {} tables", schema, tables.len());
        Ok(tables)
    }

    async fn routines_in_schema(&mut self, schema: &str) -> Result<Vec<Routine>> {
        const RESOURCE: &str = "information_schema.routines";

        let rows = sqlx::query(ROUTINES_IN_SCHEMA_QUERY)
            .bind(schema)
            .fetch_all(&mut self.conn)
            .await
            .for_resource(&self.database, RESOURCE)?;

        let mut routines = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.get_field("routine_name", &self.database, RESOURCE)?;
            let kind: Option<String> = row.get_field("routine_type", &self.database, RESOURCE)?;
            routines.push(Routine::new(name, RoutineKind::from_reported(kind.as_deref())));
        }

        tracing::debug!("Schema '{}' holds {} routines", schema, routines.len());
        Ok(routines)
    }

    async fn server_version(&mut self) -> Result<String> {
        let version: String = sqlx::query_scalar(SERVER_VERSION_QUERY)
            .fetch_one(&mut self.conn)
            .await
            .for_resource(&self.database, "version()")?;
        Ok(version)
    }

    async fn extensions(&mut self) -> Result<Vec<Extension>> {
        const RESOURCE: &str = "pg_extension";

        let rows = sqlx::query(EXTENSIONS_QUERY)
            .fetch_all(&mut self.conn)
            .await
            .for_resource(&self.database, RESOURCE)?;

        let mut extensions = Vec::with_capacity(rows.len());
        for row in &rows {
            let name: String = row.get_field("extname", &self.database, RESOURCE)?;
            let version: String = row.get_field("extversion", &self.database, RESOURCE)?;
            extensions.push(Extension::new(name, version));
        }
        Ok(extensions)
    }
}
