use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::FeedConfig;
use crate::pipeline::{self, RawSnapshot};
use crate::sinks::{Grid, MemorySheet, publish};
use crate::sources::file::read_table;

/// Run one saved snapshot through the pipeline and write the resulting sheet
/// as CSV to `out`. Returns the in-memory sheet for inspection.
pub fn process_file<W: Write>(
    snapshot_path: &Path,
    spot: f64,
    config: &FeedConfig,
    updated: &str,
    out: W,
) -> Result<MemorySheet> {
    let snapshot = RawSnapshot {
        table: read_table(snapshot_path)?,
        spot,
    };
    let processed = pipeline::process(&snapshot, config, "Snapshot File", updated)?;

    eprintln!(
        "{}: {} strikes, {} header rows skipped, {} rows discarded",
        snapshot_path.display(),
        processed.summary.retained,
        processed.summary.skipped_headers,
        processed.summary.discarded,
    );
    for rejection in &processed.rejections {
        eprintln!("  row {}: {}", rejection.row_index, rejection.reason);
    }

    let mut sheet = MemorySheet::new();
    publish(&mut sheet, &processed.record_set)?;
    write_csv(sheet.visible(), out)?;
    Ok(sheet)
}

/// CLI entry point for the `process` subcommand.
pub fn run(snapshot_path: &Path, spot: f64, config: &FeedConfig) -> Result<()> {
    let updated = chrono::Local::now().format("%H:%M:%S").to_string();
    let stdout = std::io::stdout();
    process_file(snapshot_path, spot, config, &updated, stdout.lock())?;
    Ok(())
}

fn write_csv<W: Write>(grid: &Grid, out: W) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(out);
    for row in grid.rows() {
        wtr.write_record(row.iter().map(|c| c.to_string()))
            .context("writing sheet row")?;
    }
    wtr.flush()?;
    Ok(())
}
