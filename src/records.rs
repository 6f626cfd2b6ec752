//! Fixed-schema record set handed to the sink.

use anyhow::{Result, bail};
use serde::Serialize;

use crate::chain::{Field, LegField, StrikeRow};
use crate::greeks::GreekResult;
use crate::sinks::Cell;

/// Number of columns in a published record.
pub const RECORD_WIDTH: usize = 23;

/// Where a published column takes its value from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColumnValue {
    Chain(Field),
    CallDelta,
    PutDelta,
}

/// One published column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RecordColumn {
    pub name: &'static str,
    pub value: ColumnValue,
}

const fn call(name: &'static str, f: LegField) -> RecordColumn {
    RecordColumn {
        name,
        value: ColumnValue::Chain(Field::Call(f)),
    }
}

const fn put(name: &'static str, f: LegField) -> RecordColumn {
    RecordColumn {
        name,
        value: ColumnValue::Chain(Field::Put(f)),
    }
}

/// Published column order. The header row is the `name` of each entry.
pub const RECORD_COLUMNS: [RecordColumn; RECORD_WIDTH] = [
    call("Call OI", LegField::OpenInterest),
    call("Call Chng OI", LegField::ChangeInOi),
    call("Call Vol", LegField::Volume),
    call("Call IV", LegField::ImpliedVolatility),
    RecordColumn {
        name: "Call Delta",
        value: ColumnValue::CallDelta,
    },
    call("Call LTP", LegField::Ltp),
    call("Call Chng", LegField::Change),
    call("Call Bid Qty", LegField::BidQty),
    call("Call Bid", LegField::Bid),
    call("Call Ask", LegField::Ask),
    call("Call Ask Qty", LegField::AskQty),
    RecordColumn {
        name: "Strike Price",
        value: ColumnValue::Chain(Field::Strike),
    },
    put("Put Bid Qty", LegField::BidQty),
    put("Put Bid", LegField::Bid),
    put("Put Ask", LegField::Ask),
    put("Put Ask Qty", LegField::AskQty),
    put("Put Chng", LegField::Change),
    put("Put LTP", LegField::Ltp),
    put("Put IV", LegField::ImpliedVolatility),
    RecordColumn {
        name: "Put Delta",
        value: ColumnValue::PutDelta,
    },
    put("Put Vol", LegField::Volume),
    put("Put Chng OI", LegField::ChangeInOi),
    put("Put OI", LegField::OpenInterest),
];

pub fn header_names() -> [&'static str; RECORD_WIDTH] {
    RECORD_COLUMNS.map(|c| c.name)
}

// ── Records ─────────────────────────────────────────────────────────

/// One published row, values in [`RECORD_COLUMNS`] order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PublishedRecord {
    pub values: [f64; RECORD_WIDTH],
}

impl PublishedRecord {
    pub fn new(row: &StrikeRow, greeks: &GreekResult) -> Self {
        let values = RECORD_COLUMNS.map(|c| match c.value {
            ColumnValue::Chain(field) => row.get(field),
            ColumnValue::CallDelta => greeks.call_delta,
            ColumnValue::PutDelta => greeks.put_delta,
        });
        PublishedRecord { values }
    }

    /// Value of the column named `name`.
    pub fn value(&self, name: &str) -> Option<f64> {
        RECORD_COLUMNS
            .iter()
            .position(|c| c.name == name)
            .map(|i| self.values[i])
    }

    pub fn cells(&self) -> Vec<Cell> {
        self.values.iter().map(|v| Cell::Number(*v)).collect()
    }
}

/// Free-text cells of the first sheet row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub symbol: String,
    /// Label for how the snapshot was retrieved.
    pub mode: String,
    pub spot: f64,
    /// Wall-clock time of the cycle, `HH:MM:SS`.
    pub updated: String,
}

impl Metadata {
    pub fn cells(&self) -> [String; 4] {
        [
            format!("Symbol: {}", self.symbol),
            format!("Mode: {}", self.mode),
            format!("Spot: {:?}", self.spot),
            format!("Last Updated: {}", self.updated),
        ]
    }
}

/// Everything one cycle publishes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PublishedRecordSet {
    pub metadata: Metadata,
    pub records: Vec<PublishedRecord>,
}

impl PublishedRecordSet {
    pub fn new(metadata: Metadata, records: Vec<PublishedRecord>) -> Self {
        PublishedRecordSet { metadata, records }
    }

    pub fn metadata_cells(&self) -> Vec<Cell> {
        self.metadata.cells().into_iter().map(Cell::Text).collect()
    }

    pub fn header_cells(&self) -> Vec<Cell> {
        header_names().into_iter().map(Cell::from).collect()
    }

    pub fn data_cells(&self) -> Vec<Vec<Cell>> {
        self.records.iter().map(PublishedRecord::cells).collect()
    }
}

/// Pair each strike row with its deltas, in parser order.
pub fn assemble(
    rows: &[StrikeRow],
    greeks: &[GreekResult],
    metadata: Metadata,
) -> Result<PublishedRecordSet> {
    if rows.len() != greeks.len() {
        bail!(
            "{} strike rows but {} delta results",
            rows.len(),
            greeks.len()
        );
    }
    let records = rows
        .iter()
        .zip(greeks)
        .map(|(row, g)| PublishedRecord::new(row, g))
        .collect();
    Ok(PublishedRecordSet::new(metadata, records))
}
