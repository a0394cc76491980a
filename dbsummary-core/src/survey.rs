//! Survey orchestration.
//!
//! Drives enumeration, per-database inspection and report output, and owns
//! the skip/abort policy:
//!
//! | Failure                               | Effect                |
//! |---------------------------------------|-----------------------|
//! | control connection or enumeration     | run aborted           |
//! | per-database connection               | database skipped      |
//! | insufficient privilege                | database skipped      |
//! | any other per-database query error    | database skipped      |
//! | report write                          | run aborted           |
//!
//! Databases are inspected one after another on a single connection at a
//! time. Every session is released before the next one is opened.

use crate::{
    Result,
    connector::Connector,
    error::DbSummaryError,
    inspector::inspect,
    models::DatabaseRecord,
    report::{self, SortKey, output},
};
use std::path::PathBuf;

/// What the caller asked for.
#[derive(Debug, Clone, Default)]
pub struct SurveyOptions {
    /// Report ordering
    pub sort_key: SortKey,
    /// Requested report file; `None` uses the timestamped default
    pub output_file: Option<PathBuf>,
}

/// Why a listed database is missing from the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The per-database connection could not be opened
    ConnectionFailed(String),
    /// The server refused catalog access
    InsufficientPrivilege,
    /// A catalog query failed for another reason
    QueryFailed(String),
}

/// A listed database that produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDatabase {
    /// Database name
    pub name: String,
    /// Cause
    pub reason: SkipReason,
}

/// Result of a completed run.
#[derive(Debug, Clone)]
pub struct SurveyOutcome {
    /// Inspected databases in report order
    pub records: Vec<DatabaseRecord>,
    /// Listed databases that were left out
    pub skipped: Vec<SkippedDatabase>,
    /// Rendered report text
    pub report: String,
    /// Absolute path of the written report
    pub output_path: PathBuf,
    /// File contents read back after writing
    pub echoed: String,
}

/// Records and skips gathered from one pass over the server.
#[derive(Debug, Default)]
pub struct Collected {
    /// Inspected databases in enumeration order
    pub records: Vec<DatabaseRecord>,
    /// Databases that produced no record
    pub skipped: Vec<SkippedDatabase>,
}

/// Enumerates databases through the control database and inspects each one.
///
/// # Errors
/// Returns `ControlConnection` if the control database cannot be reached or
/// enumerated. Per-database failures are logged and recorded as skips.
pub async fn collect_records<C: Connector>(connector: &C) -> Result<Collected> {
    let control = connector.control_database().to_string();
    tracing::info!("Connecting to the main database...");

    let mut session = connector
        .connect(&control)
        .await
        .map_err(|e| DbSummaryError::control_connection(&control, e))?;

    let listed = connector.list_databases(&mut session).await;
    connector.release(session).await;
    let databases = listed.map_err(|e| DbSummaryError::control_connection(&control, e))?;

    let mut collected = Collected::default();
    for name in databases {
        tracing::info!("Processing database: {}", name);

        let mut session = match connector.connect(&name).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!("{}", e);
                collected.skipped.push(SkippedDatabase {
                    name,
                    reason: SkipReason::ConnectionFailed(e.to_string()),
                });
                continue;
            }
        };

        let inspected = inspect(&mut session, &name).await;
        connector.release(session).await;

        match inspected {
            Ok(Some(record)) => collected.records.push(record),
            Ok(None) => collected.skipped.push(SkippedDatabase {
                name,
                reason: SkipReason::InsufficientPrivilege,
            }),
            Err(e) => {
                tracing::error!("Error getting info for database {}: {}", name, e);
                collected.skipped.push(SkippedDatabase {
                    name,
                    reason: SkipReason::QueryFailed(e.to_string()),
                });
            }
        }
    }

    tracing::info!(
        "Inspected {} databases, skipped {}",
        collected.records.len(),
        collected.skipped.len()
    );
    Ok(collected)
}

/// Runs a full survey: collect, render, write, read back.
///
/// # Errors
/// Returns `ControlConnection` when enumeration fails, `OutputWrite` when the
/// report cannot be written and `Io` when it cannot be read back.
pub async fn run_survey<C: Connector>(
    connector: &C,
    options: &SurveyOptions,
) -> Result<SurveyOutcome> {
    let Collected { mut records, skipped } = collect_records(connector).await?;

    let report = report::render(&records, options.sort_key);
    report::sort_records(&mut records, options.sort_key);

    let path = output::resolve_output_path(options.output_file.as_deref(), chrono::Local::now());
    output::write_report(&path, &report).await?;

    let output_path = std::path::absolute(&path).map_err(|e| DbSummaryError::Io {
        context: format!("Failed to resolve {}", path.display()),
        source: e,
    })?;
    let echoed = output::read_report(&output_path).await?;

    Ok(SurveyOutcome {
        records,
        skipped,
        report,
        output_path,
        echoed,
    })
}
