use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;

use super::{RawSnapshot, SnapshotSource};

/// Reads a saved option-chain table from a CSV file.
///
/// The file is the raw table as the exchange page lays it out, label rows
/// included. It is re-read every cycle, so another process can keep
/// overwriting it.
pub struct FileSource {
    path: PathBuf,
    spot: f64,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>, spot: f64) -> Self {
        FileSource {
            path: path.into(),
            spot,
        }
    }
}

#[async_trait]
impl SnapshotSource for FileSource {
    fn mode_label(&self) -> &str {
        "Snapshot File"
    }

    async fn fetch(&mut self) -> Result<RawSnapshot> {
        let table = read_table(&self.path)?;
        Ok(RawSnapshot {
            table,
            spot: self.spot,
        })
    }
}

/// Load every record of a headerless CSV file as strings. Rows may differ in
/// width.
pub fn read_table(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("opening snapshot {}", path.display()))?;
    let mut table = Vec::new();
    for record in rdr.records() {
        let record = record.with_context(|| format!("reading snapshot {}", path.display()))?;
        table.push(record.iter().map(|c| c.to_string()).collect());
    }
    Ok(table)
}
