use anyhow::Result;
use tokio::sync::watch;

use super::scheduler::{Clock, Cycle, CycleScheduler};
use crate::chain::ParseSummary;
use crate::config::FeedConfig;
use crate::pipeline;
use crate::sinks::{Sink, publish};
use crate::sources::SnapshotSource;

/// What one cycle did.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// Snapshot processed and the sink fully replaced.
    Published(CycleReport),
    /// The source had nothing for us; the sink was not touched.
    RetrievalFailed { error: String },
    /// Processing or publishing failed after retrieval.
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    pub cycle: u64,
    pub spot: f64,
    pub summary: ParseSummary,
}

/// Drives fetch → parse → compute → assemble → publish, one cycle at a time.
pub struct CycleRunner<Src, Snk, C> {
    config: FeedConfig,
    source: Src,
    sink: Snk,
    clock: C,
    scheduler: CycleScheduler,
}

impl<Src, Snk, C> CycleRunner<Src, Snk, C>
where
    Src: SnapshotSource,
    Snk: Sink,
    C: Clock,
{
    pub fn new(config: FeedConfig, source: Src, sink: Snk, clock: C) -> Self {
        let scheduler = CycleScheduler::new(config.refresh_interval());
        CycleRunner {
            config,
            source,
            sink,
            clock,
            scheduler,
        }
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    pub fn sink(&self) -> &Snk {
        &self.sink
    }

    /// Run one cycle. Never returns an error: every failure is reported in
    /// the outcome and the next cycle starts clean.
    pub async fn run_cycle(&mut self, cycle: &Cycle) -> CycleOutcome {
        tracing::info!(cycle = cycle.index, "starting update cycle");

        let snapshot = match self.source.fetch().await {
            Ok(s) => s,
            Err(e) => {
                let error = format!("{e:#}");
                tracing::warn!(cycle = cycle.index, %error, "retrieval failed, retrying next cycle");
                return CycleOutcome::RetrievalFailed { error };
            }
        };
        tracing::info!(
            cycle = cycle.index,
            spot = snapshot.spot,
            rows = snapshot.table.len(),
            "snapshot fetched"
        );

        match self.process_and_publish(&snapshot) {
            Ok(summary) => {
                tracing::info!(
                    cycle = cycle.index,
                    strikes = summary.retained,
                    discarded = summary.discarded,
                    "published"
                );
                CycleOutcome::Published(CycleReport {
                    cycle: cycle.index,
                    spot: snapshot.spot,
                    summary,
                })
            }
            Err(e) => {
                let error = format!("{e:#}");
                tracing::error!(cycle = cycle.index, %error, "processing error");
                CycleOutcome::Failed { error }
            }
        }
    }

    fn process_and_publish(&mut self, snapshot: &pipeline::RawSnapshot) -> Result<ParseSummary> {
        let updated = self.clock.now().format("%H:%M:%S").to_string();
        let processed = pipeline::process(
            snapshot,
            &self.config,
            self.source.mode_label(),
            &updated,
        )?;
        for rejection in &processed.rejections {
            tracing::debug!(row = rejection.row_index, reason = %rejection.reason, "row discarded");
        }
        publish(&mut self.sink, &processed.record_set)?;
        Ok(processed.summary)
    }

    /// Run cycles until `shutdown` flips to `true` (or its sender is dropped),
    /// or until `max_cycles` have run. The signal is honoured between cycles
    /// and while waiting, never in the middle of one. Returns the number of
    /// cycles run.
    pub async fn run(&mut self, mut shutdown: watch::Receiver<bool>, max_cycles: Option<u64>) -> u64 {
        let mut cycle = self.scheduler.first(self.clock.now());
        let mut completed = 0u64;

        loop {
            if *shutdown.borrow() {
                break;
            }

            self.run_cycle(&cycle).await;
            completed += 1;
            if max_cycles.is_some_and(|max| completed >= max) {
                break;
            }

            let finished_at = self.clock.now();
            cycle = self.scheduler.next(&cycle, finished_at);
            let wait = self.scheduler.wait_for(&cycle, finished_at);
            tracing::info!(seconds = wait.as_secs(), "waiting for next cycle");

            tokio::select! {
                biased;
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = self.clock.sleep(wait) => {}
            }
        }

        tracing::info!(cycles = completed, "feed stopped");
        completed
    }
}
