use anyhow::Result;

use super::{Cell, Grid, Sink};

/// A write as the sink received it.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetOp {
    Clear,
    AppendRow(Vec<Cell>),
    Update { start_row: usize, rows: usize },
    Commit,
}

/// In-memory sheet. Keeps the staged grid, the committed grid and a log of
/// every write.
#[derive(Debug, Default)]
pub struct MemorySheet {
    staged: Grid,
    visible: Grid,
    ops: Vec<SheetOp>,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents as of the last commit.
    pub fn visible(&self) -> &Grid {
        &self.visible
    }

    pub fn ops(&self) -> &[SheetOp] {
        &self.ops
    }

    pub fn commits(&self) -> usize {
        self.ops.iter().filter(|op| **op == SheetOp::Commit).count()
    }
}

impl Sink for MemorySheet {
    fn clear(&mut self) -> Result<()> {
        self.staged.clear();
        self.ops.push(SheetOp::Clear);
        Ok(())
    }

    fn append_row(&mut self, row: Vec<Cell>) -> Result<()> {
        self.ops.push(SheetOp::AppendRow(row.clone()));
        self.staged.append_row(row);
        Ok(())
    }

    fn update(&mut self, start_row: usize, rows: Vec<Vec<Cell>>) -> Result<()> {
        self.ops.push(SheetOp::Update {
            start_row,
            rows: rows.len(),
        });
        self.staged.update(start_row, rows);
        Ok(())
    }

    fn commit(&mut self) -> Result<()> {
        self.visible = self.staged.clone();
        self.ops.push(SheetOp::Commit);
        Ok(())
    }
}
