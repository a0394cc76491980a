//! Report rendering: sorting, summary table and per-database detail blocks.
//!
//! # Module Structure
//! - `table`: ASCII grid tables
//! - `output`: destination resolution, file writing and read-back

pub mod output;
pub mod table;

use crate::models::DatabaseRecord;
use std::cmp::Ordering;
use table::TextTable;

/// Shown wherever a row count is absent.
pub const ROW_COUNT_PLACEHOLDER: &str = "N/A";

const RULE_WIDTH: usize = 60;

/// Order in which databases appear in the report.
///
/// All sorts are stable: ties keep enumeration order. An absent row count
/// ranks below every present count, including zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Name ascending
    #[default]
    Alphabetical,
    /// Size descending
    Size,
    /// Public table count descending
    Tables,
    /// Row estimate descending, absent last
    Rows,
}

impl SortKey {
    /// Compares two records under this key.
    pub fn compare(self, a: &DatabaseRecord, b: &DatabaseRecord) -> Ordering {
        match self {
            Self::Alphabetical => a.name.cmp(&b.name),
            Self::Size => b.size_bytes.cmp(&a.size_bytes),
            Self::Tables => b.table_count.cmp(&a.table_count),
            // Option orders None below Some, so descending puts None last
            Self::Rows => b.row_count.cmp(&a.row_count),
        }
    }

    /// Short description used in the run log.
    pub const fn describe(self) -> &'static str {
        match self {
            Self::Alphabetical => "alphabetically",
            Self::Size => "by size",
            Self::Tables => "by table count",
            Self::Rows => "by row count",
        }
    }
}

/// Returns the records in report order without moving them.
pub fn sorted_records(records: &[DatabaseRecord], sort_key: SortKey) -> Vec<&DatabaseRecord> {
    let mut sorted: Vec<&DatabaseRecord> = records.iter().collect();
    sorted.sort_by(|a, b| sort_key.compare(a, b));
    sorted
}

/// Sorts records in place into report order.
pub fn sort_records(records: &mut [DatabaseRecord], sort_key: SortKey) {
    records.sort_by(|a, b| sort_key.compare(a, b));
}

fn row_count_cell(record: &DatabaseRecord) -> String {
    record
        .row_count
        .map_or_else(|| ROW_COUNT_PLACEHOLDER.to_string(), |n| n.to_string())
}

/// Renders the full report: summary block followed by one detail block per
/// record, both in `sort_key` order.
///
/// Zero records render an empty summary table and no detail blocks.
pub fn render(records: &[DatabaseRecord], sort_key: SortKey) -> String {
    tracing::info!("Sorting databases {}", sort_key.describe());
    let sorted = sorted_records(records, sort_key);

    let details: Vec<String> = sorted.iter().copied().map(render_detail).collect();
    format!("{}\n{}", render_summary(&sorted), details.join("\n"))
}

/// Summary block: heading plus one row per record.
pub fn render_summary(records: &[&DatabaseRecord]) -> String {
    let mut table = TextTable::new(["Database", "Size (MB)", "Table Count", "Row Count"]);
    for record in records {
        table.add_row([
            record.name.clone(),
            record.size_megabytes_display(),
            record.table_count.to_string(),
            row_count_cell(record),
        ]);
    }
    format!("\nSummary of Databases:\n{}", table)
}

/// Detail block for one database: header lines, then the table, routine
/// and extension grids, framed by rules.
pub fn render_detail(record: &DatabaseRecord) -> String {
    let heavy_rule = "=".repeat(RULE_WIDTH);
    let light_rule = "-".repeat(RULE_WIDTH);
    let schemas: Vec<&str> = record.schema_names().collect();

    let mut tables = TextTable::new(["Database", "Schema", "Table"]);
    for (schema, names) in record.tables_by_schema() {
        for table_name in names {
            tables.add_row([record.name.as_str(), schema, table_name.as_str()]);
        }
    }

    let mut routines = TextTable::new(["Database", "Schema", "Routine Type", "Routine Name"]);
    for (schema, entries) in record.routines_by_schema() {
        for routine in entries {
            routines.add_row([
                record.name.clone(),
                schema.to_string(),
                routine.kind.to_string(),
                routine.name.clone(),
            ]);
        }
    }

    let mut extensions = TextTable::new(["Extension Name", "Version"]);
    for extension in &record.extensions {
        extensions.add_row([extension.name.as_str(), extension.version.as_str()]);
    }

    format!(
        "\n{heavy}\nDatabase: {name}\n{light}\nSize: {size} MB\nTable Count: {tables_count}\n\
         Row Count: {rows}\nSchemas: {schemas}\nPostgreSQL Version: {version}\n\
         {tables}\n{routines}\n{extensions}\n{heavy}",
        heavy = heavy_rule,
        light = light_rule,
        name = record.name,
        size = record.size_megabytes_display(),
        tables_count = record.table_count,
        rows = row_count_cell(record),
        schemas = schemas.join(", "),
        version = record.server_version,
        tables = tables,
        routines = routines,
        extensions = extensions,
    )
}
