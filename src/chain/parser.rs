use serde::Serialize;

use super::schema::COLUMNS;
use super::{RowError, StrikeRow, parse_cell};

/// A data row the parser dropped, with its position in the raw table.
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    pub row_index: usize,
    pub reason: RowError,
}

/// Parser output for one snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedChain {
    /// Retained rows, in raw table order.
    pub rows: Vec<StrikeRow>,
    /// Leading rows skipped as headers.
    pub skipped_headers: usize,
    /// Data rows that failed coercion or the strike check.
    pub discarded: Vec<RowRejection>,
}

impl ParsedChain {
    pub fn discarded_count(&self) -> usize {
        self.discarded.len()
    }
}

/// Serializable summary of a parse, for logs and the `process` command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseSummary {
    pub retained: usize,
    pub skipped_headers: usize,
    pub discarded: usize,
}

impl From<&ParsedChain> for ParseSummary {
    fn from(chain: &ParsedChain) -> Self {
        ParseSummary {
            retained: chain.rows.len(),
            skipped_headers: chain.skipped_headers,
            discarded: chain.discarded.len(),
        }
    }
}

/// Parse a raw snapshot table into strike rows.
///
/// The first `header_rows` rows are skipped whatever they contain. A data row
/// that fails on any column is dropped and recorded in
/// [`ParsedChain::discarded`]; parsing itself never fails.
pub fn parse_snapshot<R, S>(table: &[R], header_rows: usize) -> ParsedChain
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut chain = ParsedChain {
        skipped_headers: header_rows.min(table.len()),
        ..Default::default()
    };

    for (row_index, raw) in table.iter().enumerate().skip(header_rows) {
        match parse_row(raw.as_ref()) {
            Ok(row) => chain.rows.push(row),
            Err(reason) => chain.discarded.push(RowRejection { row_index, reason }),
        }
    }

    chain
}

/// Parse one raw row through the column schema.
pub fn parse_row<S: AsRef<str>>(cells: &[S]) -> Result<StrikeRow, RowError> {
    let mut row = StrikeRow::default();
    for column in &COLUMNS {
        let raw = cells
            .get(column.index)
            .ok_or(RowError::MissingColumn {
                index: column.index,
            })?;
        let value = parse_cell(raw.as_ref()).map_err(|source| RowError::Cell {
            index: column.index,
            source,
        })?;
        row.set(column.field, value);
    }

    if row.strike <= 0.0 {
        return Err(RowError::NonPositiveStrike { strike: row.strike });
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [&str; 22] = [
        "", "12500", "-50", "300", "15.2", "120.5", "-5", "50", "120", "121", "60", "22000", "40",
        "85", "86", "70", "3", "88", "16.1", "500", "30", "7000",
    ];

    fn with_strike(strike: &str) -> Vec<String> {
        let mut row: Vec<String> = SAMPLE.iter().map(|s| s.to_string()).collect();
        row[11] = strike.to_string();
        row
    }

    fn headers() -> Vec<Vec<String>> {
        vec![
            vec!["CALLS".to_string(), "PUTS".to_string()],
            vec!["OI".to_string(); 22],
        ]
    }

    #[test]
    fn test_parse_sample_row() {
        let row = parse_row(&SAMPLE).unwrap();
        assert_eq!(row.strike, 22000.0);
        assert_eq!(row.call.open_interest, 12500.0);
        assert_eq!(row.call.change_in_oi, -50.0);
        assert_eq!(row.call.implied_volatility, 15.2);
        assert_eq!(row.call.ask_qty, 60.0);
        assert_eq!(row.put.bid_qty, 40.0);
        assert_eq!(row.put.ltp, 88.0);
        assert_eq!(row.put.implied_volatility, 16.1);
        assert_eq!(row.put.open_interest, 7000.0);
    }

    #[test]
    fn test_headers_skipped_and_order_kept() {
        let mut table = headers();
        for strike in ["21900", "22000", "22,100"] {
            table.push(with_strike(strike));
        }

        let chain = parse_snapshot(&table, 2);
        let strikes: Vec<f64> = chain.rows.iter().map(|r| r.strike).collect();
        assert_eq!(strikes, vec![21900.0, 22000.0, 22100.0]);
        assert_eq!(chain.skipped_headers, 2);
        assert_eq!(chain.discarded_count(), 0);
    }

    #[test]
    fn test_placeholder_strike_dropped_later_rows_kept() {
        let mut table = headers();
        table.push(with_strike("-"));
        table.push(with_strike("22050"));

        let chain = parse_snapshot(&table, 2);
        assert_eq!(chain.rows.len(), 1);
        assert_eq!(chain.rows[0].strike, 22050.0);
        assert_eq!(chain.discarded.len(), 1);
        assert_eq!(chain.discarded[0].row_index, 2);
        assert_eq!(
            chain.discarded[0].reason,
            RowError::NonPositiveStrike { strike: 0.0 }
        );
    }

    #[test]
    fn test_bad_cell_and_short_row_dropped() {
        let mut bad = with_strike("22000");
        bad[4] = "n/a".to_string();
        let short: Vec<String> = SAMPLE[..12].iter().map(|s| s.to_string()).collect();

        let mut table = headers();
        table.push(bad);
        table.push(short);
        table.push(with_strike("22100"));

        let chain = parse_snapshot(&table, 2);
        assert_eq!(chain.rows.len(), 1);
        assert!(matches!(
            chain.discarded[0].reason,
            RowError::Cell { index: 4, .. }
        ));
        assert_eq!(
            chain.discarded[1].reason,
            RowError::MissingColumn { index: 12 }
        );
    }

    #[test]
    fn test_empty_and_header_only_tables() {
        let empty: Vec<Vec<String>> = Vec::new();
        let chain = parse_snapshot(&empty, 2);
        assert!(chain.rows.is_empty());
        assert_eq!(chain.skipped_headers, 0);

        let chain = parse_snapshot(&headers(), 2);
        assert!(chain.rows.is_empty());
        assert!(chain.discarded.is_empty());
    }

    #[test]
    fn test_extra_trailing_cells_ignored() {
        let mut row = with_strike("22000");
        row.push("trailing".to_string());
        assert_eq!(parse_row(&row).unwrap().strike, 22000.0);
    }
}
