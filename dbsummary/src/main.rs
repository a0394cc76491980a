//! PostgreSQL server summary tool.
//!
//! Connects to one server, inspects every non-template database and writes
//! a plain-text report: a summary table followed by a detail block per
//! database. The written report is echoed to stdout.
//!
//! # Security Guarantees
//! - Read-only catalog queries only
//! - The password is never logged and never written to the report

use clap::{Args, Parser, ValueEnum};
use dbsummary_core::{
    ConnectionSettings, Credentials, DbSummaryError, PgConnector, SortKey, SurveyOptions,
    connector::DEFAULT_STATEMENT_TIMEOUT, init_logging, run_survey,
};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "dbsummary")]
#[command(about = "Summarize every database on a PostgreSQL server")]
#[command(version)]
#[command(long_about = "
dbsummary - PostgreSQL server inventory report

Lists every non-template database on the server and reports, per database:
- Size, public table count and live row estimate
- Schemas with their tables and routines
- Server version and installed extensions

EXAMPLES:
  dbsummary --db_host localhost --db_port 5432 --db_user admin --db_name postgres
  dbsummary --db_host db --db_port 5432 --db_user admin --db_name postgres --sort_by size
")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Server host
    #[arg(long = "db_host", help = "PostgreSQL server host")]
    db_host: String,

    /// Server port
    #[arg(long = "db_port", help = "PostgreSQL server port")]
    db_port: u16,

    /// Login user
    #[arg(long = "db_user", help = "User to connect as")]
    db_user: String,

    /// Login password
    #[arg(
        long = "db_password",
        env = "PGPASSWORD",
        hide_env_values = true,
        required = true,
        help = "Password for the user (never logged)"
    )]
    db_password: String,

    /// Control database
    #[arg(long = "db_name", help = "Database used to list the others")]
    db_name: String,

    /// Report ordering
    #[arg(long = "sort_by", value_enum, default_value_t = SortBy::Alphabet)]
    sort_by: SortBy,

    /// Report destination
    #[arg(
        long = "output_file",
        help = "Report file (defaults to db_summary_<timestamp>.txt)"
    )]
    output_file: Option<PathBuf>,

    /// Per-statement timeout
    #[arg(
        long = "statement_timeout_secs",
        default_value_t = DEFAULT_STATEMENT_TIMEOUT.as_secs(),
        help = "Statement timeout in seconds (1-300)"
    )]
    statement_timeout_secs: u64,
}

#[derive(Args)]
struct GlobalArgs {
    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv)"
    )]
    verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SortBy {
    /// Database name, ascending
    Alphabet,
    /// Size, largest first
    Size,
    /// Public table count, largest first
    Tables,
    /// Live row estimate, largest first
    Rows,
}

impl From<SortBy> for SortKey {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Alphabet => Self::Alphabetical,
            SortBy::Size => Self::Size,
            SortBy::Tables => Self::Tables,
            SortBy::Rows => Self::Rows,
        }
    }
}

/// Process exit status for a failed run.
const fn exit_code_for(error: &DbSummaryError) -> u8 {
    match error {
        DbSummaryError::Configuration { .. } => 2,
        DbSummaryError::OutputWrite { .. } | DbSummaryError::Io { .. } => 3,
        _ => 1,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.global.verbose, cli.global.quiet) {
        eprintln!("{}", e);
        return ExitCode::from(exit_code_for(&e));
    }

    let status = match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(exit_code_for(&e))
        }
    };

    info!("Database listing completed");
    status
}

async fn run(cli: Cli) -> dbsummary_core::Result<()> {
    info!("Starting database listing script");

    let settings = ConnectionSettings::new(
        cli.db_host,
        cli.db_port,
        cli.db_name,
        Credentials::new(cli.db_user, cli.db_password),
    )
    .with_statement_timeout(Duration::from_secs(cli.statement_timeout_secs));
    let connector = PgConnector::new(settings)?;

    let options = SurveyOptions {
        sort_key: cli.sort_by.into(),
        output_file: cli.output_file,
    };
    let outcome = run_survey(&connector, &options).await?;

    println!("Output saved to file: {}", outcome.output_path.display());
    println!("\nFile Content:\n");
    println!("{}", outcome.echoed);
    Ok(())
}
