#[cfg(feature = "full")]
pub mod csv_sheet;
pub mod memory;

use std::fmt;

use anyhow::Result;
use serde::Serialize;

use crate::records::PublishedRecordSet;

#[cfg(feature = "full")]
pub use csv_sheet::CsvSheetSink;
pub use memory::{MemorySheet, SheetOp};

/// First sheet row (1-based) of the data block.
pub const DATA_START_ROW: usize = 3;

// ── Cells ───────────────────────────────────────────────────────────

/// One sheet cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Text(String),
    Number(f64),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => f.write_str(s),
            Cell::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for Cell {
    fn from(s: &str) -> Self {
        Cell::Text(s.to_string())
    }
}

impl From<String> for Cell {
    fn from(s: String) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(n: f64) -> Self {
        Cell::Number(n)
    }
}

// ── Grid ────────────────────────────────────────────────────────────

/// Row-major sheet contents with spreadsheet write semantics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Grid {
    rows: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn clear(&mut self) {
        self.rows.clear();
    }

    /// Append below the last row that holds any cell.
    pub fn append_row(&mut self, row: Vec<Cell>) {
        while self.rows.last().is_some_and(|r| r.is_empty()) {
            self.rows.pop();
        }
        self.rows.push(row);
    }

    /// Overwrite rows starting at 1-based `start_row`, growing the sheet as needed.
    pub fn update(&mut self, start_row: usize, rows: Vec<Vec<Cell>>) {
        let first = start_row.saturating_sub(1);
        if self.rows.len() < first {
            self.rows.resize_with(first, Vec::new);
        }
        for (offset, row) in rows.into_iter().enumerate() {
            let idx = first + offset;
            if idx < self.rows.len() {
                self.rows[idx] = row;
            } else {
                self.rows.push(row);
            }
        }
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ── Sink trait ──────────────────────────────────────────────────────

/// Destination surface the record set is written to.
///
/// Writes are staged; `commit` makes them visible. A sink that fails before
/// `commit` keeps showing its previous contents.
pub trait Sink {
    fn clear(&mut self) -> Result<()>;

    fn append_row(&mut self, row: Vec<Cell>) -> Result<()>;

    /// Write a block of rows starting at 1-based `start_row`.
    fn update(&mut self, start_row: usize, rows: Vec<Vec<Cell>>) -> Result<()>;

    fn commit(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Write a record set as a full replace: clear, metadata row, header row,
/// data block at [`DATA_START_ROW`], commit.
pub fn publish<S: Sink + ?Sized>(sink: &mut S, set: &PublishedRecordSet) -> Result<()> {
    sink.clear()?;
    sink.append_row(set.metadata_cells())?;
    sink.append_row(set.header_cells())?;
    sink.update(DATA_START_ROW, set.data_cells())?;
    sink.commit()
}
