//! In-memory server used by the inspector and survey tests.

use crate::{
    Result,
    connector::Connector,
    error::DbSummaryError,
    inspector::MetadataSource,
    models::{Extension, Routine, RoutineKind},
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Lookup steps in inspection order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Step {
    Size,
    TableCount,
    Rows,
    Schemas,
    Tables,
    Routines,
    Version,
    Extensions,
}

#[derive(Debug, Clone, Copy)]
enum Failure {
    Denied(Step),
    Broken(Step),
}

/// Canned catalog contents for one database.
#[derive(Debug, Clone)]
pub(crate) struct FakeDatabase {
    size_bytes: u64,
    table_count: u64,
    rows: Option<u64>,
    schemas: Vec<(String, Vec<String>, Vec<Routine>)>,
    extensions: Vec<Extension>,
    failure: Option<Failure>,
}

impl FakeDatabase {
    pub(crate) const fn new(size_bytes: u64) -> Self {
        Self {
            size_bytes,
            table_count: 0,
            rows: None,
            schemas: Vec::new(),
            extensions: Vec::new(),
            failure: None,
        }
    }

    pub(crate) fn with_table_count(mut self, count: u64) -> Self {
        self.table_count = count;
        self
    }

    pub(crate) fn with_rows(mut self, rows: Option<u64>) -> Self {
        self.rows = rows;
        self
    }

    pub(crate) fn with_schema(
        mut self,
        name: &str,
        tables: &[&str],
        routines: &[(&str, &str)],
    ) -> Self {
        let tables = tables.iter().map(|t| (*t).to_string()).collect();
        let routines = routines
            .iter()
            .map(|(n, k)| Routine::new((*n).to_string(), RoutineKind::from_reported(Some(*k))))
            .collect();
        self.schemas.push((name.to_string(), tables, routines));
        self
    }

    pub(crate) fn with_extension(mut self, name: &str, version: &str) -> Self {
        self.extensions
            .push(Extension::new(name.to_string(), version.to_string()));
        self
    }

    pub(crate) fn denied_at(mut self, step: Step) -> Self {
        self.failure = Some(Failure::Denied(step));
        self
    }

    pub(crate) fn failing_at(mut self, step: Step) -> Self {
        self.failure = Some(Failure::Broken(step));
        self
    }
}

/// A session on one fake database that records every lookup.
#[derive(Debug)]
pub(crate) struct FakeSource {
    name: String,
    database: FakeDatabase,
    pub(crate) calls: Vec<String>,
}

impl FakeSource {
    pub(crate) fn new(name: &str, database: FakeDatabase) -> Self {
        Self {
            name: name.to_string(),
            database,
            calls: Vec::new(),
        }
    }

    fn step(&mut self, step: Step, call: String) -> Result<()> {
        self.calls.push(call);
        match self.database.failure {
            Some(Failure::Denied(s)) if s == step => Err(DbSummaryError::insufficient_privilege(
                &self.name,
                format!("{:?}", step),
            )),
            Some(Failure::Broken(s)) if s == step => Err(DbSummaryError::query_failed(
                &self.name,
                format!("Failed to query {:?}", step),
                std::io::Error::other("server closed the connection unexpectedly"),
            )),
            _ => Ok(()),
        }
    }

    fn schema(&self, schema: &str) -> Option<&(String, Vec<String>, Vec<Routine>)> {
        self.database.schemas.iter().find(|(name, _, _)| name == schema)
    }
}

#[async_trait]
impl MetadataSource for FakeSource {
    async fn database_size(&mut self, database: &str) -> Result<u64> {
        self.step(Step::Size, format!("database_size({})", database))?;
        Ok(self.database.size_bytes)
    }

    async fn public_table_count(&mut self) -> Result<u64> {
        self.step(Step::TableCount, "public_table_count".to_string())?;
        Ok(self.database.table_count)
    }

    async fn live_row_estimate(&mut self) -> Result<Option<u64>> {
        self.step(Step::Rows, "live_row_estimate".to_string())?;
        Ok(self.database.rows)
    }

    async fn user_schemas(&mut self) -> Result<Vec<String>> {
        self.step(Step::Schemas, "user_schemas".to_string())?;
        Ok(self.database.schemas.iter().map(|(n, _, _)| n.clone()).collect())
    }

    async fn tables_in_schema(&mut self, schema: &str) -> Result<Vec<String>> {
        self.step(Step::Tables, format!("tables_in_schema({})", schema))?;
        Ok(self.schema(schema).map(|(_, t, _)| t.clone()).unwrap_or_default())
    }

    async fn routines_in_schema(&mut self, schema: &str) -> Result<Vec<Routine>> {
        self.step(Step::Routines, format!("routines_in_schema({})", schema))?;
        Ok(self.schema(schema).map(|(_, _, r)| r.clone()).unwrap_or_default())
    }

    async fn server_version(&mut self) -> Result<String> {
        self.step(Step::Version, "server_version".to_string())?;
        Ok("PostgreSQL 16.4".to_string())
    }

    async fn extensions(&mut self) -> Result<Vec<Extension>> {
        self.step(Step::Extensions, "extensions".to_string())?;
        Ok(self.database.extensions.clone())
    }
}

/// A server holding fake databases, counting opened and released sessions.
#[derive(Debug)]
pub(crate) struct FakeServer {
    control: String,
    databases: Vec<(String, FakeDatabase)>,
    unreachable: Vec<String>,
    listing_fails: bool,
    pub(crate) opened: AtomicUsize,
    pub(crate) released: AtomicUsize,
    pub(crate) connect_log: Mutex<Vec<String>>,
    released_calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeServer {
    pub(crate) fn new(control: &str) -> Self {
        Self {
            control: control.to_string(),
            databases: Vec::new(),
            unreachable: Vec::new(),
            listing_fails: false,
            opened: AtomicUsize::new(0),
            released: AtomicUsize::new(0),
            connect_log: Mutex::new(Vec::new()),
            released_calls: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_database(mut self, name: &str, database: FakeDatabase) -> Self {
        self.databases.push((name.to_string(), database));
        self
    }

    /// Listed by the server, but every connection attempt is refused.
    pub(crate) fn with_unreachable(mut self, name: &str) -> Self {
        self.databases.push((name.to_string(), FakeDatabase::new(0)));
        self.unreachable.push(name.to_string());
        self
    }

    pub(crate) fn with_failing_listing(mut self) -> Self {
        self.listing_fails = true;
        self
    }

    pub(crate) fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub(crate) fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Lookups issued on every released session of `database`, in order.
    pub(crate) fn calls_for(&self, database: &str) -> Vec<String> {
        self.released_calls
            .lock()
            .map(|log| {
                log.iter()
                    .filter(|(name, _)| name == database)
                    .flat_map(|(_, calls)| calls.iter().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl Connector for FakeServer {
    type Session = FakeSource;

    fn control_database(&self) -> &str {
        &self.control
    }

    async fn connect(&self, database: &str) -> Result<FakeSource> {
        if let Ok(mut log) = self.connect_log.lock() {
            log.push(database.to_string());
        }

        if self.unreachable.iter().any(|n| n == database) {
            return Err(DbSummaryError::connection_failed(
                database,
                std::io::Error::from(std::io::ErrorKind::ConnectionRefused),
            ));
        }

        let listed = self
            .databases
            .iter()
            .find(|(name, _)| name == database)
            .map(|(_, db)| db.clone());

        let contents = match listed {
            Some(db) => db,
            None if database == self.control => FakeDatabase::new(0),
            None => {
                return Err(DbSummaryError::connection_failed(
                    database,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        format!("database \"{}\" does not exist", database),
                    ),
                ));
            }
        };

        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok(FakeSource::new(database, contents))
    }

    async fn list_databases(&self, _session: &mut FakeSource) -> Result<Vec<String>> {
        if self.listing_fails {
            return Err(DbSummaryError::insufficient_privilege(
                &self.control,
                "pg_database",
            ));
        }
        Ok(self.databases.iter().map(|(name, _)| name.clone()).collect())
    }

    async fn release(&self, session: FakeSource) {
        self.released.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut log) = self.released_calls.lock() {
            log.push((session.name, session.calls));
        }
    }
}
