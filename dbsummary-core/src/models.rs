//! Per-database inventory records.
//!
//! A [`DatabaseRecord`] is only ever built from a complete inspection; there
//! is no partially filled state. Tables and routines are grouped per schema
//! in [`SchemaInventory`], so every listed schema carries both sequences,
//! empty or not.

/// Bytes per megabyte used for every size shown in the report.
pub const BYTES_PER_MEGABYTE: f64 = 1_048_576.0;

/// Everything collected for one database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRecord {
    /// Database name, unique within a run
    pub name: String,
    /// Total on-disk size from `pg_database_size`
    pub size_bytes: u64,
    /// Number of tables in the `public` schema
    pub table_count: u64,
    /// Sum of live-tuple estimates; `None` when statistics are unavailable
    pub row_count: Option<u64>,
    /// Non-system schemas in server order, with their tables and routines
    pub schemas: Vec<SchemaInventory>,
    /// Free-form `version()` string
    pub server_version: String,
    /// Installed extensions in server order
    pub extensions: Vec<Extension>,
}

impl DatabaseRecord {
    /// Size converted to megabytes (`size_bytes / 1024²`).
    #[allow(clippy::cast_precision_loss)]
    pub fn size_megabytes(&self) -> f64 {
        self.size_bytes as f64 / BYTES_PER_MEGABYTE
    }

    /// Size in megabytes formatted with two decimals, e.g. `"1.50"`.
    pub fn size_megabytes_display(&self) -> String {
        format!("{:.2}", self.size_megabytes())
    }

    /// Schema names in server order.
    pub fn schema_names(&self) -> impl Iterator<Item = &str> {
        self.schemas.iter().map(|s| s.name.as_str())
    }

    /// Table names keyed by schema, one entry per schema.
    pub fn tables_by_schema(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.schemas
            .iter()
            .map(|s| (s.name.as_str(), s.tables.as_slice()))
    }

    /// Routines keyed by schema, one entry per schema.
    pub fn routines_by_schema(&self) -> impl Iterator<Item = (&str, &[Routine])> {
        self.schemas
            .iter()
            .map(|s| (s.name.as_str(), s.routines.as_slice()))
    }
}

/// Tables and routines found in one schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaInventory {
    /// Schema name
    pub name: String,
    /// Table names in server order
    pub tables: Vec<String>,
    /// Routines in server order
    pub routines: Vec<Routine>,
}

impl SchemaInventory {
    /// Creates an empty inventory for a schema.
    pub const fn new(name: String) -> Self {
        Self {
            name,
            tables: Vec::new(),
            routines: Vec::new(),
        }
    }
}

/// A stored function or procedure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    /// Routine name
    pub name: String,
    /// Kind as reported by `information_schema.routines.routine_type`
    pub kind: RoutineKind,
}

impl Routine {
    /// Creates a routine entry.
    pub const fn new(name: String, kind: RoutineKind) -> Self {
        Self { name, kind }
    }
}

/// Routine kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineKind {
    /// `FUNCTION`
    Function,
    /// `PROCEDURE`
    Procedure,
    /// Any other value the server reports, kept verbatim
    Other(String),
}

impl RoutineKind {
    /// Maps a `routine_type` column value. A NULL becomes `UNKNOWN`.
    pub fn from_reported(value: Option<&str>) -> Self {
        match value {
            Some("FUNCTION") => Self::Function,
            Some("PROCEDURE") => Self::Procedure,
            Some(other) => Self::Other(other.to_string()),
            None => Self::Other("UNKNOWN".to_string()),
        }
    }
}

impl std::fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Function => write!(f, "FUNCTION"),
            Self::Procedure => write!(f, "PROCEDURE"),
            Self::Other(kind) => write!(f, "{}", kind),
        }
    }
}

/// An installed extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    /// `pg_extension.extname`
    pub name: String,
    /// `pg_extension.extversion`
    pub version: String,
}

impl Extension {
    /// Creates an extension entry.
    pub const fn new(name: String, version: String) -> Self {
        Self { name, version }
    }
}
