//! Positional layout of the raw option-chain table.
//!
//! The upstream table has no stable header names, only a stable column order:
//! a label column, ten call columns, the strike, then ten put columns in
//! mirrored order. Every position the parser reads comes from [`COLUMNS`].

use serde::Serialize;

/// Number of cells a complete raw row carries.
pub const RAW_WIDTH: usize = 22;

/// A per-leg quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LegField {
    OpenInterest,
    ChangeInOi,
    Volume,
    ImpliedVolatility,
    Ltp,
    Change,
    BidQty,
    Bid,
    Ask,
    AskQty,
}

/// A value extracted from one raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Call(LegField),
    Strike,
    Put(LegField),
}

/// Extractor for one raw column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    /// Zero-based position in the raw row.
    pub index: usize,
    pub field: Field,
    /// Label the exchange page shows above the column.
    pub label: &'static str,
}

const fn col(index: usize, field: Field, label: &'static str) -> Column {
    Column { index, field, label }
}

use Field::{Call, Put, Strike};
use LegField::*;

/// Raw column 0 holds a row label and is never read.
pub const COLUMNS: [Column; 21] = [
    col(1, Call(OpenInterest), "OI"),
    col(2, Call(ChangeInOi), "CHNG IN OI"),
    col(3, Call(Volume), "VOLUME"),
    col(4, Call(ImpliedVolatility), "IV"),
    col(5, Call(Ltp), "LTP"),
    col(6, Call(Change), "CHNG"),
    col(7, Call(BidQty), "BID QTY"),
    col(8, Call(Bid), "BID"),
    col(9, Call(Ask), "ASK"),
    col(10, Call(AskQty), "ASK QTY"),
    col(11, Strike, "STRIKE"),
    col(12, Put(BidQty), "BID QTY"),
    col(13, Put(Bid), "BID"),
    col(14, Put(Ask), "ASK"),
    col(15, Put(AskQty), "ASK QTY"),
    col(16, Put(Change), "CHNG"),
    col(17, Put(Ltp), "LTP"),
    col(18, Put(ImpliedVolatility), "IV"),
    col(19, Put(Volume), "VOLUME"),
    col(20, Put(ChangeInOi), "CHNG IN OI"),
    col(21, Put(OpenInterest), "OI"),
];

/// The two label rows the exchange page renders above the data, in the
/// layout [`COLUMNS`] describes. Sources that build a raw table themselves
/// prepend these so the default header skip applies unchanged.
pub fn label_rows() -> [Vec<String>; 2] {
    let mut banner = vec![String::new(); RAW_WIDTH];
    banner[1] = "CALLS".to_string();
    banner[12] = "PUTS".to_string();

    let mut labels = vec![String::new(); RAW_WIDTH];
    for c in &COLUMNS {
        labels[c.index] = c.label.to_string();
    }
    [banner, labels]
}
