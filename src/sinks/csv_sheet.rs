use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::{Cell, Grid, Sink};

/// Sheet backed by a CSV file. Writes are buffered and land on disk in one
/// rename at `commit`, so readers never see a half-written sheet.
pub struct CsvSheetSink {
    path: PathBuf,
    staged: Grid,
}

impl CsvSheetSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CsvSheetSink {
            path: path.into(),
            staged: Grid::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl Sink for CsvSheetSink {
    fn clear(&mut self) -> Result<()> {
        self.staged.clear();
        Ok(())
    }

    fn append_row(&mut self, row: Vec<Cell>) -> Result<()> {
        self.staged.append_row(row);
        Ok(())
    }

    fn update(&mut self, start_row: usize, rows: Vec<Vec<Cell>>) -> Result<()> {
        self.staged.update(start_row, rows);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        let tmp = self.temp_path();
        let replaced = write_grid(&tmp, &self.staged).and_then(|()| {
            std::fs::rename(&tmp, &self.path)
                .with_context(|| format!("replacing {}", self.path.display()))
        });
        if replaced.is_err() {
            let _ = std::fs::remove_file(&tmp);
        }
        replaced
    }
}

fn write_grid(path: &Path, grid: &Grid) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("creating CSV file {}", path.display()))?;
    for row in grid.rows() {
        if row.is_empty() {
            // csv refuses zero-field records
            wtr.write_record([""])?;
        } else {
            wtr.write_record(row.iter().map(|c| c.to_string()))?;
        }
    }
    wtr.flush()?;
    Ok(())
}
