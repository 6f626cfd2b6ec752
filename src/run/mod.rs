pub mod cycle;
pub mod scheduler;

use std::path::PathBuf;

use anyhow::{Context, Result};
use tokio::sync::watch;

use crate::config::FeedConfig;
use crate::sinks::CsvSheetSink;
use crate::sources::{FileSource, NseSource, SnapshotSource};

pub use cycle::{CycleOutcome, CycleReport, CycleRunner};
pub use scheduler::{Clock, Cycle, CycleScheduler, SystemClock};

/// Where `run` reads snapshots from.
#[derive(Debug, Clone)]
pub enum SourceChoice {
    Nse,
    File { path: PathBuf, spot: f64 },
}

/// Entry point for the `run` command.
pub fn run(config: FeedConfig, source: SourceChoice, once: bool) -> Result<()> {
    println!("=== optchain-feed run ===");
    println!("Symbol:         {}", config.symbol);
    println!("Source:         {:?}", source);
    println!("Destination:    {}", config.destination);
    println!("Refresh:        {}s", config.refresh_seconds);
    println!("Headless:       {}", config.headless);
    println!("Days to expiry: {}", config.days_to_expiry);
    println!("Risk-free rate: {}", config.risk_free_rate);
    println!("Once:           {}", once);
    println!("Press Ctrl+C to stop.");
    println!();

    let rt = tokio::runtime::Runtime::new().context("creating tokio runtime")?;
    rt.block_on(async move {
        match source {
            SourceChoice::Nse => {
                let nse = NseSource::new(&config.symbol)?;
                drive(config, nse, once).await
            }
            SourceChoice::File { path, spot } => drive(config, FileSource::new(path, spot), once).await,
        }
    })
}

async fn drive<S: SnapshotSource>(config: FeedConfig, source: S, once: bool) -> Result<()> {
    let sink = CsvSheetSink::new(config.destination_path());
    let mut runner = CycleRunner::new(config, source, sink, SystemClock);

    let (stop_tx, stop_rx) = watch::channel(false);
    ctrlc::set_handler(move || {
        let _ = stop_tx.send(true);
    })
    .context("installing Ctrl+C handler")?;

    let cycles = runner.run(stop_rx, once.then_some(1)).await;
    println!("Stopped after {cycles} cycle(s).");
    Ok(())
}
