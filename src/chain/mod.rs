pub mod parser;
pub mod schema;

use serde::Serialize;
use thiserror::Error;

pub use parser::{ParseSummary, ParsedChain, RowRejection, parse_row, parse_snapshot};
pub use schema::{COLUMNS, Column, Field, LegField, RAW_WIDTH};

// ── Cell coercion ───────────────────────────────────────────────────

/// A raw cell that is neither a placeholder nor a finite number.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("`{0}` is not a number")]
pub struct CellError(pub String);

/// Why a snapshot row was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RowError {
    #[error("row has no column {index}")]
    MissingColumn { index: usize },

    #[error("column {index}: {source}")]
    Cell {
        index: usize,
        #[source]
        source: CellError,
    },

    #[error("strike {strike} is not positive")]
    NonPositiveStrike { strike: f64 },
}

/// Coerce a raw snapshot cell to a number.
///
/// Empty cells and the `-` placeholder read as `0`. Thousands separators are
/// stripped before parsing. NaN and infinities are rejected so every parsed
/// value is finite.
pub fn parse_cell(raw: &str) -> Result<f64, CellError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "-" {
        return Ok(0.0);
    }
    let cleaned = trimmed.replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CellError(raw.to_string())),
    }
}

// ── Parsed chain types ──────────────────────────────────────────────

/// Call or put.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Call,
    Put,
}

/// One side of one strike row. Implied volatility stays in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct OptionLeg {
    pub open_interest: f64,
    pub change_in_oi: f64,
    pub volume: f64,
    pub implied_volatility: f64,
    pub ltp: f64,
    pub change: f64,
    pub bid_qty: f64,
    pub bid: f64,
    pub ask: f64,
    pub ask_qty: f64,
}

impl OptionLeg {
    pub fn get(&self, field: LegField) -> f64 {
        match field {
            LegField::OpenInterest => self.open_interest,
            LegField::ChangeInOi => self.change_in_oi,
            LegField::Volume => self.volume,
            LegField::ImpliedVolatility => self.implied_volatility,
            LegField::Ltp => self.ltp,
            LegField::Change => self.change,
            LegField::BidQty => self.bid_qty,
            LegField::Bid => self.bid,
            LegField::Ask => self.ask,
            LegField::AskQty => self.ask_qty,
        }
    }

    fn set(&mut self, field: LegField, value: f64) {
        let slot = match field {
            LegField::OpenInterest => &mut self.open_interest,
            LegField::ChangeInOi => &mut self.change_in_oi,
            LegField::Volume => &mut self.volume,
            LegField::ImpliedVolatility => &mut self.implied_volatility,
            LegField::Ltp => &mut self.ltp,
            LegField::Change => &mut self.change,
            LegField::BidQty => &mut self.bid_qty,
            LegField::Bid => &mut self.bid,
            LegField::Ask => &mut self.ask,
            LegField::AskQty => &mut self.ask_qty,
        };
        *slot = value;
    }
}

/// One row of the chain: a strike with both legs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StrikeRow {
    pub strike: f64,
    pub call: OptionLeg,
    pub put: OptionLeg,
}

impl StrikeRow {
    pub fn leg(&self, side: Side) -> &OptionLeg {
        match side {
            Side::Call => &self.call,
            Side::Put => &self.put,
        }
    }

    pub fn get(&self, field: Field) -> f64 {
        match field {
            Field::Call(f) => self.call.get(f),
            Field::Strike => self.strike,
            Field::Put(f) => self.put.get(f),
        }
    }

    pub(crate) fn set(&mut self, field: Field, value: f64) {
        match field {
            Field::Call(f) => self.call.set(f, value),
            Field::Strike => self.strike = value,
            Field::Put(f) => self.put.set(f, value),
        }
    }
}
