//! Plain ASCII grid tables.
//!
//! Every column is left-aligned with one space of padding on each side and
//! is as wide as its widest cell, header included. Width is counted in
//! characters. A table without rows renders its header block only.
//!
//! ```text
//! +----------+-----------+
//! | Database | Size (MB) |
//! +----------+-----------+
//! | app      | 1.50      |
//! +----------+-----------+
//! ```

use std::fmt;

/// A table of string cells with a fixed header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    /// Creates an empty table with the given column headers.
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    /// Appends a row. Missing cells render empty; cells beyond the header
    /// count are dropped.
    pub fn add_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let mut row: Vec<String> = cells
            .into_iter()
            .take(self.headers.len())
            .map(|c| c.to_string())
            .collect();
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
    }

    fn column_widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .map(|row| row[i].chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or_default()
            })
            .collect()
    }
}

fn write_border(f: &mut fmt::Formatter<'_>, widths: &[usize]) -> fmt::Result {
    f.write_str("+")?;
    for width in widths {
        write!(f, "{}+", "-".repeat(width.saturating_add(2)))?;
    }
    Ok(())
}

fn write_cells(f: &mut fmt::Formatter<'_>, cells: &[String], widths: &[usize]) -> fmt::Result {
    f.write_str("|")?;
    for (cell, width) in cells.iter().zip(widths) {
        let pad = width.saturating_sub(cell.chars().count());
        write!(f, " {}{} |", cell, " ".repeat(pad))?;
    }
    Ok(())
}

impl fmt::Display for TextTable {
    /// Renders the grid without a trailing newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let widths = self.column_widths();

        write_border(f, &widths)?;
        f.write_str("\n")?;
        write_cells(f, &self.headers, &widths)?;
        f.write_str("\n")?;
        write_border(f, &widths)?;

        if self.rows.is_empty() {
            return Ok(());
        }

        for row in &self.rows {
            f.write_str("\n")?;
            write_cells(f, row, &widths)?;
        }
        f.write_str("\n")?;
        write_border(f, &widths)
    }
}
