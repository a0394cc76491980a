//! Report destination handling.
//!
//! The report is written verbatim, then read back so the caller can echo
//! exactly what landed on disk.

use crate::{Result, error::DbSummaryError};
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// File name used when no usable destination was given.
pub fn default_report_path(now: DateTime<Local>) -> PathBuf {
    PathBuf::from(format!("db_summary_{}.txt", now.format("%Y%m%d_%H%M%S")))
}

/// Picks the file the report goes to.
///
/// A requested path is used as given when its parent directory exists; a bare
/// file name counts as the current directory. Otherwise the timestamped
/// default in the current directory is used.
pub fn resolve_output_path(requested: Option<&Path>, now: DateTime<Local>) -> PathBuf {
    let Some(path) = requested else {
        return default_report_path(now);
    };

    let parent_exists = match path.parent() {
        None => false,
        Some(parent) if parent.as_os_str().is_empty() => true,
        Some(parent) => parent.is_dir(),
    };

    if parent_exists && path.file_name().is_some() {
        return path.to_path_buf();
    }

    let fallback = default_report_path(now);
    tracing::warn!(
        "Cannot write to {}: directory does not exist, using {} instead",
        path.display(),
        fallback.display()
    );
    fallback
}

/// Writes the report text to `path`, replacing any existing file.
///
/// # Errors
/// Returns `OutputWrite` if the file cannot be created or written.
pub async fn write_report(path: &Path, text: &str) -> Result<()> {
    let to_error = |source| DbSummaryError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    let file = tokio::fs::File::create(path).await.map_err(to_error)?;
    let mut writer = tokio::io::BufWriter::new(file);
    writer
        .write_all(text.as_bytes())
        .await
        .map_err(to_error)?;
    writer.flush().await.map_err(to_error)?;

    tracing::info!("Report written to {}", path.display());
    Ok(())
}

/// Reads a written report back.
///
/// # Errors
/// Returns `Io` if the file cannot be read as UTF-8.
pub async fn read_report(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| DbSummaryError::Io {
            context: format!("Failed to read back {}", path.display()),
            source: e,
        })
}
