//! One snapshot in, one record set out: parse, compute deltas, assemble.

use anyhow::Result;

use crate::chain::{ParseSummary, RowRejection, parse_snapshot};
use crate::config::FeedConfig;
use crate::greeks::GreekResult;
use crate::records::{Metadata, PublishedRecordSet, assemble};

/// One retrieved option-chain table plus the underlying's spot price.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSnapshot {
    /// Rows of raw cells, header rows included.
    pub table: Vec<Vec<String>>,
    /// `0.0` when the source could not read it.
    pub spot: f64,
}

/// Result of processing one snapshot.
#[derive(Debug, Clone)]
pub struct Processed {
    pub record_set: PublishedRecordSet,
    pub summary: ParseSummary,
    pub rejections: Vec<RowRejection>,
}

/// Run a snapshot through the pipeline.
///
/// `mode` and `updated` only reach the metadata row; the records depend on
/// nothing but the snapshot and `config`.
pub fn process(
    snapshot: &RawSnapshot,
    config: &FeedConfig,
    mode: &str,
    updated: &str,
) -> Result<Processed> {
    let chain = parse_snapshot(&snapshot.table, config.header_rows);
    let inputs = config.greek_inputs();
    let greeks: Vec<GreekResult> = chain
        .rows
        .iter()
        .map(|row| GreekResult::for_row(snapshot.spot, row, &inputs))
        .collect();

    let metadata = Metadata {
        symbol: config.symbol.clone(),
        mode: mode.to_string(),
        spot: snapshot.spot,
        updated: updated.to_string(),
    };
    let record_set = assemble(&chain.rows, &greeks, metadata)?;

    Ok(Processed {
        record_set,
        summary: ParseSummary::from(&chain),
        rejections: chain.discarded,
    })
}
