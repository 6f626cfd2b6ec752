#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};

use optchain_feed::run::Clock;
use optchain_feed::sinks::{Cell, MemorySheet, Sink};
use optchain_feed::sources::{RawSnapshot, SnapshotSource};

// ── Snapshots ───────────────────────────────────────────────────────

pub const SPOT: f64 = 22050.0;

/// Label rows, one valid strike, one unparseable strike, one short row.
pub fn sample_table() -> Vec<Vec<String>> {
    let rows: [&[&str]; 5] = [
        &["", "CALLS", "", "", "", "", "", "", "", "", "", "", "PUTS"],
        &["", "OI", "CHNG IN OI", "VOLUME", "IV", "LTP", "CHNG", "BID QTY", "BID", "ASK", "ASK QTY", "STRIKE"],
        &[
            "", "12,500", "-50", "300", "15.2", "120.5", "-5", "50", "120", "121", "60",
            "22,000.00", "40", "85", "86", "70", "3", "88", "16.1", "500", "30", "7,000",
        ],
        &[
            "", "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "abc", "1", "2", "3", "4",
            "5", "6", "7", "8", "9", "10",
        ],
        &["", "1", "2", "3"],
    ];
    rows.iter()
        .map(|r| r.iter().map(|c| c.to_string()).collect())
        .collect()
}

pub fn sample_snapshot() -> RawSnapshot {
    RawSnapshot {
        table: sample_table(),
        spot: SPOT,
    }
}

// ── Sources ─────────────────────────────────────────────────────────

/// Replays a scripted list of fetch results, then keeps failing.
pub struct ScriptedSource {
    script: VecDeque<Result<RawSnapshot>>,
    pub fetches: usize,
}

impl ScriptedSource {
    pub fn new(script: Vec<Result<RawSnapshot>>) -> Self {
        ScriptedSource {
            script: script.into(),
            fetches: 0,
        }
    }

    pub fn always(snapshot: RawSnapshot, times: usize) -> Self {
        Self::new((0..times).map(|_| Ok(snapshot.clone())).collect())
    }
}

#[async_trait]
impl SnapshotSource for ScriptedSource {
    fn mode_label(&self) -> &str {
        "Scripted"
    }

    async fn fetch(&mut self) -> Result<RawSnapshot> {
        self.fetches += 1;
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(anyhow::anyhow!("script exhausted")))
    }
}

// ── Sinks ───────────────────────────────────────────────────────────

/// Memory sheet whose `update` fails while `failing` is set.
pub struct FlakySheet {
    pub inner: MemorySheet,
    pub failing: Arc<AtomicBool>,
}

impl FlakySheet {
    pub fn new() -> (Self, Arc<AtomicBool>) {
        let failing = Arc::new(AtomicBool::new(false));
        let sheet = FlakySheet {
            inner: MemorySheet::new(),
            failing: failing.clone(),
        };
        (sheet, failing)
    }
}

impl Sink for FlakySheet {
    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }

    fn append_row(&mut self, row: Vec<Cell>) -> Result<()> {
        self.inner.append_row(row)
    }

    fn update(&mut self, start_row: usize, rows: Vec<Vec<Cell>>) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("sheet unavailable");
        }
        self.inner.update(start_row, rows)
    }

    fn commit(&mut self) -> Result<()> {
        self.inner.commit()
    }
}

// ── Clock ───────────────────────────────────────────────────────────

/// Clock that only moves when slept on. Records every sleep.
#[derive(Clone)]
pub struct FakeClock {
    now: Arc<Mutex<DateTime<Local>>>,
    pub sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        let start = Local
            .with_ymd_and_hms(2026, 10, 19, 9, 15, 0)
            .single()
            .unwrap();
        FakeClock {
            now: Arc::new(Mutex::new(start)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps.lock().unwrap().push(duration);
        let mut now = self.now.lock().unwrap();
        *now += chrono::TimeDelta::from_std(duration).unwrap();
    }
}
